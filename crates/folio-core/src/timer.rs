#![forbid(unsafe_code)]

//! Cancellable one-shot timers over host-supplied time.
//!
//! Timers never run callbacks. The owner polls [`OneShot::fire`] with the
//! current session time and acts when it returns `true`. This keeps timer
//! behaviour deterministic and lets a test drive time explicitly.

use web_time::Duration;

/// A one-shot deadline that can be armed, re-armed, and cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    deadline: Option<Duration>,
}

impl OneShot {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) to fire `after` the given time.
    pub fn arm(&mut self, now: Duration, after: Duration) {
        self.deadline = Some(now.saturating_add(after));
    }

    /// Arm (or re-arm) to fire at an absolute session time.
    pub fn arm_at(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    /// Disarm. Returns `true` if the timer was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Time left before the deadline, zero once due, `None` if disarmed.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_sub(now))
    }

    /// Fire if due. A timer fires at most once per arming.
    pub fn fire(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
