use std::path::PathBuf;
use std::time::Duration;

use crate::localization::DEFAULT_LANGUAGE;

pub const DEFAULT_CLIENT_ID: i64 = 1_400_779_994_891_944_026;
pub const DEFAULT_LARGE_IMAGE: &str = "icon_1024";
pub const DEFAULT_HOST_NAME: &str = "ImHex";

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

pub fn get_client_id() -> i64 {
    match option_env!("PRESENCE_CLIENT_ID") {
        Some(env) => env.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid PRESENCE_CLIENT_ID {:?}, using default", env);
            DEFAULT_CLIENT_ID
        }),
        None => DEFAULT_CLIENT_ID,
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hex-presence").join(SETTINGS_FILE))
}

#[derive(Debug, Clone)]
pub struct PresenceConfig {
    pub client_id: i64,
    pub large_image: String,
    pub host_name: String,
    pub language: String,
    /// Where settings are persisted after each change; `None` disables persistence
    pub settings_path: Option<PathBuf>,
    pub flush_timeout: Duration,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            client_id: get_client_id(),
            large_image: DEFAULT_LARGE_IMAGE.to_string(),
            host_name: DEFAULT_HOST_NAME.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            settings_path: default_settings_path(),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }
}

impl PresenceConfig {
    pub fn large_text(&self, version: &str) -> String {
        format!("{} [{}]", self.host_name, version)
    }
}
