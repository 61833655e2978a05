//! The boundary between the presence module and the host application

use std::path::PathBuf;

use crate::settings::SettingChange;

/// Notifications the host forwards to the presence module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    ProviderOpened,
    ProviderClosed,
    ProviderChanged,
    PanelVisibility { panel: String, open: bool },
    /// End of a host frame; drives the completion pump
    FrameEnd,
    WindowClosing,
    SettingChanged(SettingChange),
}

impl HostEvent {
    pub fn panel(panel: impl Into<String>, open: bool) -> Self {
        HostEvent::PanelVisibility {
            panel: panel.into(),
            open,
        }
    }
}

/// Read-only view of the host's session state
pub trait HostSession {
    fn is_provider_valid(&self) -> bool;

    /// Display name of the active provider
    fn provider_name(&self) -> Option<String>;

    fn project_path(&self) -> Option<PathBuf>;

    fn host_version(&self) -> String;
}
