use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PresenceError;

/// User-facing visibility toggles for the presence display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub show_project: bool,
    #[serde(default)]
    pub show_provider: bool,
    #[serde(default)]
    pub show_status: bool,
    #[serde(default)]
    pub show_timestamp: bool,
    #[serde(default)]
    pub use_relative_time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Enabled,
    ShowProject,
    ShowProvider,
    ShowStatus,
    ShowTimestamp,
    UseRelativeTime,
}

impl SettingKey {
    pub const ALL: [SettingKey; 6] = [
        SettingKey::Enabled,
        SettingKey::ShowProject,
        SettingKey::ShowProvider,
        SettingKey::ShowStatus,
        SettingKey::ShowTimestamp,
        SettingKey::UseRelativeTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Enabled => "enabled",
            SettingKey::ShowProject => "showProject",
            SettingKey::ShowProvider => "showProvider",
            SettingKey::ShowStatus => "showStatus",
            SettingKey::ShowTimestamp => "showTimestamp",
            SettingKey::UseRelativeTime => "useRelativeTime",
        }
    }

    /// Localization key for the checkbox label of this setting
    pub fn label_key(self) -> String {
        format!("presence.settings.{}", self.as_str())
    }
}

/// A single settings-changed notification from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingChange {
    pub key: SettingKey,
    pub value: bool,
}

impl SettingChange {
    pub fn new(key: SettingKey, value: bool) -> Self {
        Self { key, value }
    }
}

impl PresenceSettings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Enabled => self.enabled,
            SettingKey::ShowProject => self.show_project,
            SettingKey::ShowProvider => self.show_provider,
            SettingKey::ShowStatus => self.show_status,
            SettingKey::ShowTimestamp => self.show_timestamp,
            SettingKey::UseRelativeTime => self.use_relative_time,
        }
    }

    /// Applies a change, returning whether the stored value actually changed.
    pub fn apply(&mut self, change: SettingChange) -> bool {
        let slot = match change.key {
            SettingKey::Enabled => &mut self.enabled,
            SettingKey::ShowProject => &mut self.show_project,
            SettingKey::ShowProvider => &mut self.show_provider,
            SettingKey::ShowStatus => &mut self.show_status,
            SettingKey::ShowTimestamp => &mut self.show_timestamp,
            SettingKey::UseRelativeTime => &mut self.use_relative_time,
        };

        let changed = *slot != change.value;
        *slot = change.value;
        changed
    }
}

pub fn load_settings(path: &Path) -> PresenceSettings {
    tracing::debug!("Loading settings from {}", path.display());

    if !path.exists() {
        return PresenceSettings::default();
    }

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read settings file, using defaults: {}", e);
            return PresenceSettings::default();
        }
    };

    if contents.trim().is_empty() {
        tracing::warn!("Settings file is empty, using defaults");
        return PresenceSettings::default();
    }

    match serde_json::from_str(&contents) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            PresenceSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &PresenceSettings) -> Result<(), PresenceError> {
    tracing::debug!("Saving settings to {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    Ok(())
}
