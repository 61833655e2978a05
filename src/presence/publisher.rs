//! Builds the presence payload from settings, status and host session

use std::path::Path;

use super::anchor::{Clock, TimestampAnchor};
use super::traits::{ActivityKind, PresencePayload};
use crate::config::PresenceConfig;
use crate::host::HostSession;
use crate::localization::Localization;
use crate::settings::PresenceSettings;
use crate::status::ActivityStatus;

/// Project file name without its extension
pub fn project_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Resolves the primary and secondary text lines.
pub fn compose_lines(
    settings: &PresenceSettings,
    status: ActivityStatus,
    project: Option<&str>,
    provider: Option<&str>,
    localization: &Localization,
) -> (String, String) {
    let project = project.filter(|_| settings.show_project);
    let provider = provider.filter(|_| settings.show_provider);

    let mut details = match (project, provider) {
        (Some(project), _) => project.to_string(),
        (None, Some(provider)) => provider.to_string(),
        (None, None) => String::new(),
    };

    let mut state = match (project, provider) {
        (Some(_), Some(provider)) => provider.to_string(),
        _ if settings.show_status && status != ActivityStatus::None => {
            localization.get(status.localization_key())
        }
        _ => String::new(),
    };

    // A subtitle must never show under an empty title
    if details.is_empty() {
        details = std::mem::take(&mut state);
    }

    (details, state)
}

pub struct PresencePublisher {
    anchor: TimestampAnchor,
    clock: Box<dyn Clock>,
    large_image: String,
    host_name: String,
}

impl PresencePublisher {
    pub fn new(config: &PresenceConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            anchor: TimestampAnchor::new(),
            clock,
            large_image: config.large_image.clone(),
            host_name: config.host_name.clone(),
        }
    }

    pub fn anchor(&self) -> &TimestampAnchor {
        &self.anchor
    }

    pub fn mark_anchor_dirty(&mut self) {
        self.anchor.mark_dirty();
    }

    pub fn build(
        &mut self,
        settings: &PresenceSettings,
        status: ActivityStatus,
        host: &dyn HostSession,
        localization: &Localization,
    ) -> PresencePayload {
        let project = host.project_path().as_deref().and_then(project_name);
        let provider = if host.is_provider_valid() {
            host.provider_name()
        } else {
            None
        };

        let (details, state) = compose_lines(
            settings,
            status,
            project.as_deref(),
            provider.as_deref(),
            localization,
        );

        PresencePayload {
            details,
            state,
            start: self.anchor.resolve(settings.show_timestamp, self.clock.as_ref()),
            large_image: self.large_image.clone(),
            large_text: format!("{} [{}]", self.host_name, host.host_version()),
            kind: ActivityKind::Playing,
        }
    }
}
