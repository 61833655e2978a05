use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorState {
    /// Anchor is valid and reused as-is
    Fresh,
    /// Anchor must be recaptured before the next send
    Dirty,
}

/// The "activity start" instant used for the elapsed-time display
#[derive(Debug, Clone)]
pub struct TimestampAnchor {
    start: Option<DateTime<Utc>>,
    state: AnchorState,
}

impl Default for TimestampAnchor {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampAnchor {
    pub fn new() -> Self {
        Self {
            start: None,
            state: AnchorState::Dirty,
        }
    }

    pub fn state(&self) -> AnchorState {
        self.state
    }

    pub fn mark_dirty(&mut self) {
        if self.state == AnchorState::Fresh {
            tracing::debug!("Timestamp anchor marked dirty");
        }
        self.state = AnchorState::Dirty;
    }

    /// Resolves the start time to send with the next payload.
    pub fn resolve(&mut self, show_timestamp: bool, clock: &dyn Clock) -> Option<DateTime<Utc>> {
        if !show_timestamp {
            self.mark_dirty();
            return None;
        }

        match (self.state, self.start) {
            (AnchorState::Fresh, Some(start)) => Some(start),
            _ => {
                let now = clock.now();
                tracing::debug!("Captured new timestamp anchor: {}", now);
                self.start = Some(now);
                self.state = AnchorState::Fresh;
                Some(now)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;

    #[test]
    fn test_starts_dirty() {
        assert_eq!(TimestampAnchor::new().state(), AnchorState::Dirty);
    }

    #[test]
    fn test_capture_then_reuse() {
        let clock = ManualClock::new();
        let mut anchor = TimestampAnchor::new();

        let first = anchor.resolve(true, &clock);
        assert_eq!(first, Some(clock.now()));
        assert_eq!(anchor.state(), AnchorState::Fresh);

        clock.advance_secs(30);
        assert_eq!(anchor.resolve(true, &clock), first);
    }

    #[test]
    fn test_hidden_marks_dirty() {
        let clock = ManualClock::new();
        let mut anchor = TimestampAnchor::new();
        let first = anchor.resolve(true, &clock);

        clock.advance_secs(60);
        assert_eq!(anchor.resolve(false, &clock), None);
        assert_eq!(anchor.state(), AnchorState::Dirty);

        let second = anchor.resolve(true, &clock);
        assert_ne!(second, first);
        assert_eq!(second, Some(clock.now()));
    }

    #[test]
    fn test_mark_dirty_recaptures() {
        let clock = ManualClock::new();
        let mut anchor = TimestampAnchor::new();
        anchor.resolve(true, &clock);

        clock.advance_secs(5);
        anchor.mark_dirty();
        assert_eq!(anchor.resolve(true, &clock), Some(clock.now()));
    }
}
