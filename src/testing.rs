//! Test doubles for the host, the clock and the presence backend

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::PresenceError;
use crate::host::HostSession;
use crate::presence::{
    Clock, Completion, CompletionSender, PresenceBackend, PresencePayload, PresenceRequest,
};

#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now += ChronoDuration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[derive(Default)]
struct HostState {
    provider: Option<String>,
    provider_valid: bool,
    project: Option<PathBuf>,
}

#[derive(Clone)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState::default())),
        }
    }

    pub fn with_provider(self, name: &str) -> Self {
        self.open_provider(name);
        self
    }

    pub fn open_provider(&self, name: &str) {
        let mut state = self.state.lock();
        state.provider = Some(name.to_string());
        state.provider_valid = true;
    }

    pub fn set_provider_valid(&self, valid: bool) {
        self.state.lock().provider_valid = valid;
    }

    pub fn set_project(&self, path: &str) {
        self.state.lock().project = Some(PathBuf::from(path));
    }
}

impl HostSession for FakeHost {
    fn is_provider_valid(&self) -> bool {
        self.state.lock().provider_valid
    }

    fn provider_name(&self) -> Option<String> {
        self.state.lock().provider.clone()
    }

    fn project_path(&self) -> Option<PathBuf> {
        self.state.lock().project.clone()
    }

    fn host_version(&self) -> String {
        "1.37.4".to_string()
    }
}

#[derive(Default)]
struct Recorded {
    requests: Vec<PresenceRequest>,
    flushes: usize,
    fail_next: Option<PresenceError>,
    shut_down: bool,
}

/// Completes every request immediately and remembers what it was sent
#[derive(Clone, Default)]
pub struct RecordingBackend {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&self) {
        *self.recorded.lock() = Recorded::default();
    }

    pub fn fail_next(&self, error: PresenceError) {
        self.recorded.lock().fail_next = Some(error);
    }

    pub fn requests(&self) -> Vec<PresenceRequest> {
        self.recorded.lock().requests.clone()
    }

    pub fn update_count(&self) -> usize {
        self.recorded
            .lock()
            .requests
            .iter()
            .filter(|r| matches!(r, PresenceRequest::Update(_)))
            .count()
    }

    pub fn last_update(&self) -> Option<PresencePayload> {
        self.recorded
            .lock()
            .requests
            .iter()
            .rev()
            .find_map(|r| match r {
                PresenceRequest::Update(payload) => Some(payload.clone()),
                PresenceRequest::Clear => None,
            })
    }

    pub fn flush_count(&self) -> usize {
        self.recorded.lock().flushes
    }

    pub fn is_shut_down(&self) -> bool {
        self.recorded.lock().shut_down
    }
}

impl PresenceBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "Recording"
    }

    fn submit(&self, id: u64, request: PresenceRequest, completions: CompletionSender) {
        let mut recorded = self.recorded.lock();
        let kind = request.kind();
        recorded.requests.push(request);

        let result = match recorded.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        };
        let _ = completions.send(Completion { id, kind, result });
    }

    fn flush(&self, _timeout: Duration) -> bool {
        let mut recorded = self.recorded.lock();
        recorded.flushes = recorded.flushes.saturating_add(1);
        true
    }

    fn shutdown(&self) {
        self.recorded.lock().shut_down = true;
    }
}
