//! Session time sources.
//!
//! Every folio component takes time as a [`Duration`] since session start.
//! [`HostClock`] produces that from the platform monotonic clock
//! (`performance.now()` on wasm32 via `web-time`); [`LabClock`] is advanced
//! by hand for deterministic tests and replays.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{Duration, Instant};

/// Anything that can report the current session time.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock session time anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct HostClock {
    epoch: Instant,
}

impl HostClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for HostClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for HostClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// A manually-advanceable clock.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct LabClock {
    offset_us: Arc<AtomicU64>,
}

impl LabClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta`.
    pub fn advance(&self, delta: Duration) {
        let us = delta.as_micros().min(u64::MAX as u128) as u64;
        self.offset_us.fetch_add(us, Ordering::Release);
    }

    /// Jump to an absolute session time. Moving backwards is ignored.
    pub fn set(&self, at: Duration) {
        let us = at.as_micros().min(u64::MAX as u128) as u64;
        self.offset_us.fetch_max(us, Ordering::AcqRel);
    }
}

impl Clock for LabClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.offset_us.load(Ordering::Acquire))
    }
}
