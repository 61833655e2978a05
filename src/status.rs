//! Tracks what the user is currently doing inside the host application

/// Unlocalized names of the host views that map to an activity
pub mod views {
    pub const ABOUT: &str = "hex.builtin.view.about.name";
    pub const ACHIEVEMENTS: &str = "hex.builtin.view.achievements.name";
    pub const CONTENT_STORE: &str = "hex.builtin.view.store.name";
    pub const SETTINGS: &str = "hex.builtin.view.settings.name";
    pub const THEME_MANAGER: &str = "hex.builtin.view.theme_manager.name";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityStatus {
    #[default]
    None,
    ViewingAchievements,
    ViewingContentStore,
    ViewingThemeManager,
    ViewingSettings,
    ViewingAbout,
}

impl ActivityStatus {
    pub fn localization_key(self) -> &'static str {
        match self {
            ActivityStatus::None => "presence.status.none",
            ActivityStatus::ViewingAchievements => "presence.status.viewingAchievements",
            ActivityStatus::ViewingContentStore => "presence.status.viewingContentStore",
            ActivityStatus::ViewingThemeManager => "presence.status.viewingThemeManager",
            ActivityStatus::ViewingSettings => "presence.status.viewingSettings",
            ActivityStatus::ViewingAbout => "presence.status.viewingAbout",
        }
    }

    /// Maps a host panel identifier to the activity it represents.
    pub fn for_panel(panel: &str) -> Option<ActivityStatus> {
        match panel {
            views::ACHIEVEMENTS => Some(ActivityStatus::ViewingAchievements),
            views::CONTENT_STORE => Some(ActivityStatus::ViewingContentStore),
            views::THEME_MANAGER => Some(ActivityStatus::ViewingThemeManager),
            views::SETTINGS => Some(ActivityStatus::ViewingSettings),
            views::ABOUT => Some(ActivityStatus::ViewingAbout),
            _ => None,
        }
    }
}

/// A request to change the current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRequest {
    Set(ActivityStatus),
    /// Swap back to the status that was active before the current one
    RestorePrevious,
}

impl From<ActivityStatus> for StatusRequest {
    fn from(status: ActivityStatus) -> Self {
        StatusRequest::Set(status)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    current: ActivityStatus,
    previous: Option<ActivityStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ActivityStatus {
        self.current
    }

    pub fn previous(&self) -> Option<ActivityStatus> {
        self.previous
    }

    /// Applies a request and returns whether the current status changed.
    ///
    /// The prior value only moves when the status actually changes, so two
    /// consecutive `RestorePrevious` requests toggle between the last two
    /// distinct statuses instead of walking further back.
    pub fn apply(&mut self, request: StatusRequest) -> bool {
        let target = match request {
            StatusRequest::Set(status) => status,
            StatusRequest::RestorePrevious => self.previous.unwrap_or_default(),
        };

        if target == self.current {
            return false;
        }

        tracing::debug!("Status changed: {:?} -> {:?}", self.current, target);
        self.previous = Some(self.current);
        self.current = target;
        true
    }

    /// Derives the status from a panel visibility notification.
    pub fn on_panel_visibility(&mut self, panel: &str, open: bool, show_status: bool) -> bool {
        if !show_status || !open {
            return self.apply(StatusRequest::Set(ActivityStatus::None));
        }

        match ActivityStatus::for_panel(panel) {
            Some(status) => self.apply(StatusRequest::Set(status)),
            None if self.current != ActivityStatus::None => {
                self.apply(StatusRequest::Set(ActivityStatus::None))
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_lookup() {
        assert_eq!(
            ActivityStatus::for_panel(views::SETTINGS),
            Some(ActivityStatus::ViewingSettings)
        );
        assert_eq!(
            ActivityStatus::for_panel(views::CONTENT_STORE),
            Some(ActivityStatus::ViewingContentStore)
        );
        assert_eq!(ActivityStatus::for_panel("hex.builtin.view.hex_editor.name"), None);
        assert_eq!(ActivityStatus::for_panel(""), None);
    }

    #[test]
    fn test_set_reports_change() {
        let mut tracker = StatusTracker::new();
        assert!(tracker.apply(ActivityStatus::ViewingAbout.into()));
        assert!(!tracker.apply(ActivityStatus::ViewingAbout.into()));
        assert_eq!(tracker.current(), ActivityStatus::ViewingAbout);
        assert_eq!(tracker.previous(), Some(ActivityStatus::None));
    }

    #[test]
    fn test_restore_previous_without_history() {
        let mut tracker = StatusTracker::new();
        assert!(!tracker.apply(StatusRequest::RestorePrevious));
        assert_eq!(tracker.current(), ActivityStatus::None);
    }

    #[test]
    fn test_restore_previous_swaps_last_two() {
        let mut tracker = StatusTracker::new();
        tracker.apply(ActivityStatus::ViewingSettings.into());
        tracker.apply(ActivityStatus::ViewingAbout.into());
        tracker.apply(ActivityStatus::ViewingThemeManager.into());

        assert!(tracker.apply(StatusRequest::RestorePrevious));
        assert_eq!(tracker.current(), ActivityStatus::ViewingAbout);

        assert!(tracker.apply(StatusRequest::RestorePrevious));
        assert_eq!(tracker.current(), ActivityStatus::ViewingThemeManager);

        assert!(tracker.apply(StatusRequest::RestorePrevious));
        assert_eq!(tracker.current(), ActivityStatus::ViewingAbout);
    }

    #[test]
    fn test_repeated_set_keeps_distinct_previous() {
        let mut tracker = StatusTracker::new();
        tracker.apply(ActivityStatus::ViewingSettings.into());
        tracker.apply(ActivityStatus::ViewingAbout.into());
        tracker.apply(ActivityStatus::ViewingAbout.into());

        tracker.apply(StatusRequest::RestorePrevious);
        assert_eq!(tracker.current(), ActivityStatus::ViewingSettings);
    }

    #[test]
    fn test_panel_open_sets_status() {
        let mut tracker = StatusTracker::new();
        assert!(tracker.on_panel_visibility(views::ACHIEVEMENTS, true, true));
        assert_eq!(tracker.current(), ActivityStatus::ViewingAchievements);
    }

    #[test]
    fn test_panel_closed_clears_status() {
        let mut tracker = StatusTracker::new();
        tracker.on_panel_visibility(views::SETTINGS, true, true);
        assert!(tracker.on_panel_visibility(views::SETTINGS, false, true));
        assert_eq!(tracker.current(), ActivityStatus::None);
    }

    #[test]
    fn test_unknown_panel() {
        let mut tracker = StatusTracker::new();
        assert!(!tracker.on_panel_visibility("hex.builtin.view.patches.name", true, true));
        assert_eq!(tracker.current(), ActivityStatus::None);

        tracker.on_panel_visibility(views::ABOUT, true, true);
        assert!(tracker.on_panel_visibility("hex.builtin.view.patches.name", true, true));
        assert_eq!(tracker.current(), ActivityStatus::None);
    }

    #[test]
    fn test_status_disabled_always_none() {
        let events = [
            (views::SETTINGS, true),
            (views::ABOUT, true),
            ("hex.builtin.view.constants.name", true),
            (views::ABOUT, false),
            (views::THEME_MANAGER, true),
        ];

        let mut tracker = StatusTracker::new();
        tracker.apply(ActivityStatus::ViewingContentStore.into());

        for (panel, open) in events {
            tracker.on_panel_visibility(panel, open, false);
            assert_eq!(tracker.current(), ActivityStatus::None);
        }
    }
}
