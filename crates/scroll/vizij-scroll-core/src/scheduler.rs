//! Frame scheduler: the scroll-delta gate shared by every instance.

use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    /// No active instances; a tick does nothing but re-check.
    IdleNoActive,
    /// At least one active instance.
    Scanning,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameOutcome {
    /// Nothing active; scroll was not read.
    Idle,
    /// Scroll offset equal to the previous tick.
    Unchanged,
    /// Scroll moved; this many active instances were updated.
    Updated { instances: usize },
}

/// What a single `tick` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    pub outcome: FrameOutcome,
    /// Tracked instances recalculated by a debounced resize during this tick.
    pub recalculated: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    previous_scroll_top: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, active_count: usize) -> SchedulerState {
        if active_count == 0 {
            SchedulerState::IdleNoActive
        } else {
            SchedulerState::Scanning
        }
    }

    /// Record `scroll_top`; `true` when it differs from the last observed value.
    pub fn observe(&mut self, scroll_top: f64) -> bool {
        if self.previous_scroll_top == Some(scroll_top) {
            return false;
        }
        self.previous_scroll_top = Some(scroll_top);
        true
    }

    /// Forget the last offset so the next tick runs a full pass.
    pub fn reset(&mut self) {
        self.previous_scroll_top = None;
    }

    pub fn previous_scroll_top(&self) -> Option<f64> {
        self.previous_scroll_top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_always_changes() {
        let mut s = FrameScheduler::new();
        assert!(s.observe(0.0));
        assert!(!s.observe(0.0));
        assert!(s.observe(1.0));
        s.reset();
        assert!(s.observe(1.0));
    }

    #[test]
    fn state_follows_active_count() {
        let s = FrameScheduler::new();
        assert_eq!(s.state(0), SchedulerState::IdleNoActive);
        assert_eq!(s.state(3), SchedulerState::Scanning);
    }
}
