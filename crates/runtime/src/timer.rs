use std::time::Duration;

use foundation::time::Time;

/// A single cancelable deferred action.
///
/// The timer holds at most one deadline. Re-arming replaces the previous
/// deadline, so a burst of `arm` calls faster than `interval` fires once,
/// `interval` after the last call.
#[derive(Debug, Clone, PartialEq)]
pub struct DebounceTimer {
    interval: Duration,
    deadline: Option<Time>,
}

impl DebounceTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Starts a fresh delay window at `now`.
    ///
    /// Returns `true` if a previous deadline was replaced.
    pub fn arm(&mut self, now: Time) -> bool {
        self.deadline.replace(now.after(self.interval)).is_some()
    }

    /// Returns `true` if the timer was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Disarms and returns `true` once `now` has reached the deadline.
    pub fn fire_if_due(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
