use std::time::{Duration, Instant};

pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(200);

/// A single pending task that fires once its trigger stream has been quiet
/// for `window`. Every trigger pushes the deadline back.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending task is due, for repaint scheduling.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Returns true exactly once per quiet window, clearing the flag.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(FILTER_DEBOUNCE)
    }
}
