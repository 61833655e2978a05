//! Owns all presence state and reacts to host events

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use super::anchor::{Clock, SystemClock};
use super::publisher::PresencePublisher;
use super::traits::{
    Completion, CompletionReceiver, CompletionSender, PresenceBackend, PresenceRequest,
    RequestKind,
};
use crate::config::PresenceConfig;
use crate::error::PresenceError;
use crate::host::{HostEvent, HostSession};
use crate::localization::Localization;
use crate::settings::{save_settings, PresenceSettings, SettingChange, SettingKey};
use crate::status::{ActivityStatus, StatusRequest, StatusTracker};

/// Presence state for one host session, driven from the host's event thread
pub struct PresenceManager {
    settings: PresenceSettings,
    tracker: StatusTracker,
    publisher: PresencePublisher,
    localization: Localization,
    host: Box<dyn HostSession>,
    backend: Option<Box<dyn PresenceBackend>>,
    completion_tx: CompletionSender,
    completion_rx: CompletionReceiver,
    next_request_id: u64,
    settings_path: Option<PathBuf>,
    flush_timeout: Duration,
    warned_no_backend: bool,
    failed_requests: u64,
}

impl PresenceManager {
    pub fn new(
        config: &PresenceConfig,
        host: Box<dyn HostSession>,
        settings: PresenceSettings,
    ) -> Self {
        Self::with_clock(config, host, settings, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: &PresenceConfig,
        host: Box<dyn HostSession>,
        settings: PresenceSettings,
        clock: Box<dyn Clock>,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        Self {
            settings,
            tracker: StatusTracker::new(),
            publisher: PresencePublisher::new(config, clock),
            localization: Localization::new(&config.language),
            host,
            backend: None,
            completion_tx,
            completion_rx,
            next_request_id: 0,
            settings_path: config.settings_path.clone(),
            flush_timeout: config.flush_timeout,
            warned_no_backend: false,
            failed_requests: 0,
        }
    }

    pub fn set_backend(&mut self, backend: Box<dyn PresenceBackend>) {
        tracing::info!("Using presence backend: {}", backend.name());
        self.backend = Some(backend);
        self.warned_no_backend = false;
        self.publish();
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn settings(&self) -> &PresenceSettings {
        &self.settings
    }

    pub fn status(&self) -> ActivityStatus {
        self.tracker.current()
    }

    /// Number of requests the service has reported as failed so far
    pub fn failed_requests(&self) -> u64 {
        self.failed_requests
    }

    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ProviderOpened | HostEvent::ProviderClosed | HostEvent::ProviderChanged => {
                tracing::debug!("Provider event: {:?}", event);
                // The provider now has focus, so no panel status applies
                self.tracker.apply(StatusRequest::Set(ActivityStatus::None));
                if self.settings.use_relative_time {
                    self.publisher.mark_anchor_dirty();
                }
                self.publish();
            }
            HostEvent::PanelVisibility { panel, open } => {
                if self
                    .tracker
                    .on_panel_visibility(&panel, open, self.settings.show_status)
                {
                    self.publish();
                }
            }
            HostEvent::FrameEnd => {
                self.pump();
            }
            HostEvent::WindowClosing => {
                self.clear_presence();
                if let Some(backend) = self.backend.take() {
                    backend.shutdown();
                }
            }
            HostEvent::SettingChanged(change) => self.on_setting_changed(change),
        }
    }

    pub fn set_status(&mut self, request: StatusRequest) {
        let request = if self.settings.show_status {
            request
        } else {
            StatusRequest::Set(ActivityStatus::None)
        };

        if self.tracker.apply(request) {
            self.publish();
        }
    }

    fn on_setting_changed(&mut self, change: SettingChange) {
        if !self.settings.apply(change) {
            return;
        }
        tracing::debug!("Setting {} changed to {}", change.key.as_str(), change.value);

        if let Some(path) = &self.settings_path {
            if let Err(e) = save_settings(path, &self.settings) {
                tracing::warn!("Failed to save presence settings: {}", e);
            }
        }

        match (change.key, change.value) {
            (SettingKey::Enabled, false) => {
                self.clear_presence();
                return;
            }
            (SettingKey::Enabled, true) | (SettingKey::ShowTimestamp, false) => {
                self.publisher.mark_anchor_dirty();
            }
            (SettingKey::ShowStatus, false) => {
                self.tracker.apply(StatusRequest::Set(ActivityStatus::None));
            }
            _ => {}
        }

        self.publish();
    }

    fn next_id(&mut self) -> u64 {
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.next_request_id
    }

    fn backend_ready(&mut self) -> bool {
        if self.backend.is_some() {
            return true;
        }
        if !self.warned_no_backend {
            tracing::warn!("Presence backend is not initialized, skipping request");
            self.warned_no_backend = true;
        }
        false
    }

    /// Sends the current activity to the presence service.
    pub fn publish(&mut self) {
        if !self.settings.enabled || !self.backend_ready() {
            return;
        }

        let payload = self.publisher.build(
            &self.settings,
            self.tracker.current(),
            self.host.as_ref(),
            &self.localization,
        );
        let id = self.next_id();

        if let Some(backend) = &self.backend {
            tracing::debug!("Submitting presence update #{}: {:?}", id, payload);
            backend.submit(id, PresenceRequest::Update(payload), self.completion_tx.clone());
        }
    }

    /// Clears the activity and waits for the backend to deliver it.
    pub fn clear_presence(&mut self) {
        if !self.backend_ready() {
            return;
        }
        let id = self.next_id();

        if let Some(backend) = &self.backend {
            tracing::debug!("Submitting presence clear #{}", id);
            backend.submit(id, PresenceRequest::Clear, self.completion_tx.clone());

            if !backend.flush(self.flush_timeout) {
                tracing::warn!(
                    "Timed out after {:?} flushing {} presence requests",
                    self.flush_timeout,
                    backend.name()
                );
            }
        }

        self.pump();
    }

    /// Logs the outcome of every request that has completed since the last call.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0usize;
        while let Ok(completion) = self.completion_rx.try_recv() {
            if matches!(
                completion.result,
                Err(PresenceError::Rejected(_) | PresenceError::ChannelClosed)
            ) {
                self.failed_requests = self.failed_requests.saturating_add(1);
            }
            log_completion(&completion);
            handled = handled.saturating_add(1);
        }
        handled
    }

    pub fn shutdown(mut self) {
        self.handle_event(HostEvent::WindowClosing);
    }
}

fn log_completion(completion: &Completion) {
    match (&completion.result, completion.kind) {
        (Ok(()), RequestKind::Update) => {
            tracing::info!("Presence activity updated (#{})", completion.id);
        }
        (Ok(()), RequestKind::Clear) => {
            tracing::info!("Cleared presence activity (#{})", completion.id);
        }
        (Err(PresenceError::Superseded), _) => {
            tracing::debug!("Presence request #{} superseded", completion.id);
        }
        // The backend warns once when it loses the connection
        (Err(PresenceError::NotConnected), _) => {
            tracing::debug!("Presence request #{} skipped, not connected", completion.id);
        }
        (Err(e), RequestKind::Update) => {
            tracing::error!("Failed to update presence activity (#{}): {}", completion.id, e);
        }
        (Err(e), RequestKind::Clear) => {
            tracing::error!("Failed to clear presence activity (#{}): {}", completion.id, e);
        }
    }
}
