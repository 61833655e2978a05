use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "hex-presence.log";
const KEEP_DAYS: u64 = 7;

/// Installs console and rolling-file logging; keep the guard alive for the whole session.
pub fn init_logging(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    let log_dir = log_dir.unwrap_or_else(get_log_directory);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(file_writer);

    // The host may already have installed a subscriber
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!("Logging initialized, log directory: {}", log_dir.display());
    tracing::info!("hex-presence version: {}", env!("CARGO_PKG_VERSION"));

    cleanup_old_logs(&log_dir, KEEP_DAYS);

    Some(guard)
}

fn get_log_directory() -> PathBuf {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hex-presence")
        .join("logs");

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    log_dir
}

fn cleanup_old_logs(log_dir: &Path, keep_days: u64) {
    let Some(cutoff) =
        SystemTime::now().checked_sub(Duration::from_secs(keep_days.saturating_mul(24 * 60 * 60)))
    else {
        return;
    };

    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to read log directory for cleanup: {}", e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with(LOG_FILE_PREFIX) && name != LOG_FILE_PREFIX => {}
            _ => continue,
        }

        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };

        if modified < cutoff {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to remove old log file {:?}: {}", path, e);
            } else {
                tracing::debug!("Removed old log file: {:?}", path);
            }
        }
    }
}
