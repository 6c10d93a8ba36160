//! Debounced task driven by caller-supplied timestamps.
//!
//! `trigger` (re)arms the deadline; `poll` reports `true` exactly once after
//! the quiet period has elapsed with no further triggers.

#[derive(Clone, Debug, PartialEq)]
pub struct Debounce {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            deadline: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Cancel any pending deadline and schedule a new one at `now_ms + delay`.
    pub fn trigger(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    /// Fire if the deadline has passed. Disarms on fire.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
