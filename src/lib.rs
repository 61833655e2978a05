pub mod config;
#[cfg(feature = "discord")]
pub mod discord;
pub mod error;
pub mod host;
pub mod localization;
pub mod logging;
pub mod presence;
pub mod settings;
pub mod status;

#[cfg(test)]
mod testing;

pub use config::PresenceConfig;
pub use error::PresenceError;
pub use host::{HostEvent, HostSession};
pub use presence::{PresenceBackend, PresenceManager, PresencePayload, PresenceRequest};
pub use settings::{PresenceSettings, SettingChange, SettingKey};
pub use status::{ActivityStatus, StatusRequest};

/// Sets up presence for a host session.
///
/// Settings are loaded from the configured path. If the presence service
/// cannot be initialized the manager is still returned, but it runs without a
/// backend for the rest of the session and every request becomes a no-op.
pub fn init(config: &PresenceConfig, host: Box<dyn HostSession>) -> PresenceManager {
    let settings = config
        .settings_path
        .as_deref()
        .map(settings::load_settings)
        .unwrap_or_default();

    #[allow(unused_mut)]
    let mut manager = PresenceManager::new(config, host, settings);

    #[cfg(feature = "discord")]
    {
        use std::sync::Arc;

        match discord::DiscordState::init(config) {
            Ok(discord_state) => {
                let discord_presence = discord::DiscordPresence::new(Arc::new(discord_state));
                manager.set_backend(Box::new(discord_presence));
            }
            Err(e) => {
                tracing::error!("Failed to initialize Discord: {}", e);
            }
        }
    }

    tracing::debug!("Presence initialized with settings {:?}", manager.settings());
    manager
}
