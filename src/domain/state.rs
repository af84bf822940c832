//! Notifier lifecycle state machine.

/// Lifecycle of a notifier instance.
///
/// `Stopped` is terminal: a stopped notifier is never restarted, a fresh
/// instance is built instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    Idle,
    Running,
    Stopped,
}

impl NotifierState {
    /// Whether `start()` should launch background work from this state.
    #[must_use]
    pub fn can_start(self) -> bool {
        matches!(self, NotifierState::Idle)
    }

    /// Whether `stop()` has anything to cancel from this state.
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, NotifierState::Running)
    }
}
