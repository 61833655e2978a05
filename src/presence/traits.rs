use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::PresenceError;

/// The kind of activity shown on the profile; always a plain "playing" entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityKind {
    #[default]
    Playing,
}

/// The activity to display, rebuilt on every publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresencePayload {
    /// Primary line: project or provider name
    pub details: String,
    /// Secondary line: provider name or status text
    pub state: String,
    /// Activity start; `None` hides the elapsed time
    pub start: Option<DateTime<Utc>>,
    pub large_image: String,
    pub large_text: String,
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceRequest {
    Update(PresencePayload),
    /// Presence should be cleared/hidden
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Update,
    Clear,
}

impl PresenceRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            PresenceRequest::Update(_) => RequestKind::Update,
            PresenceRequest::Clear => RequestKind::Clear,
        }
    }
}

/// Outcome of a submitted request, delivered back to the manager's pump
#[derive(Debug)]
pub struct Completion {
    pub id: u64,
    pub kind: RequestKind,
    pub result: Result<(), PresenceError>,
}

pub type CompletionSender = mpsc::UnboundedSender<Completion>;
pub type CompletionReceiver = mpsc::UnboundedReceiver<Completion>;

/// Trait for presence services (Discord, etc.)
pub trait PresenceBackend: Send + Sync {
    /// Returns the name of this presence backend (for logging)
    fn name(&self) -> &'static str;

    /// Queue a request; the outcome is sent on `completions` once known.
    fn submit(&self, id: u64, request: PresenceRequest, completions: CompletionSender);

    /// Block until everything submitted so far has been delivered, or the timeout passes.
    fn flush(&self, timeout: Duration) -> bool;

    /// Disconnect from the service
    fn shutdown(&self) {}
}
