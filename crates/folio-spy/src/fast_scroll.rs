#![forbid(unsafe_code)]

//! Advisory fast-scroll detection.
//!
//! Tracks the scroll delta between consecutive samples. A delta above the
//! threshold raises the condition; it clears once no sample has arrived
//! for the cool-down window. Every sample restarts the cool-down, so the
//! condition holds for the whole burst.
//!
//! The rendering layer may use the condition to simplify visuals. The
//! section tracker never reads it.

use folio_core::config::SpyConfig;
use folio_core::logging::trace;
use folio_core::timer::OneShot;
use web_time::Duration;

/// Fast-scroll state machine.
#[derive(Debug, Clone)]
pub struct FastScrollMonitor {
    threshold: f64,
    cooldown: Duration,
    last_scroll: Option<f64>,
    last_delta: f64,
    fast: bool,
    quiet: OneShot,
}

impl FastScrollMonitor {
    #[must_use]
    pub fn new(threshold: f64, cooldown: Duration) -> Self {
        Self {
            threshold,
            cooldown,
            last_scroll: None,
            last_delta: 0.0,
            fast: false,
            quiet: OneShot::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SpyConfig) -> Self {
        Self::new(config.fast_scroll_px, config.fast_scroll_cooldown())
    }

    #[inline]
    #[must_use]
    pub fn is_fast(&self) -> bool {
        self.fast
    }

    /// Delta between the two most recent samples.
    #[inline]
    #[must_use]
    pub fn last_delta(&self) -> f64 {
        self.last_delta
    }

    /// When the condition will clear if no further sample arrives.
    #[must_use]
    pub fn clears_at(&self) -> Option<Duration> {
        if self.fast { self.quiet.deadline() } else { None }
    }

    /// Record a scroll sample. Returns `Some(true)` when the condition is
    /// raised by this sample.
    ///
    /// The first sample of a session only establishes a baseline.
    pub fn observe(&mut self, scroll_y: f64, now: Duration) -> Option<bool> {
        if !scroll_y.is_finite() {
            return None;
        }
        let delta = self.last_scroll.map_or(0.0, |last| (scroll_y - last).abs());
        self.last_scroll = Some(scroll_y);
        self.last_delta = delta;
        self.quiet.arm(now, self.cooldown);

        if delta > self.threshold && !self.fast {
            trace!(message = "spy.fast_scroll", on = true, delta);
            self.fast = true;
            return Some(true);
        }
        None
    }

    /// Advance time. Returns `Some(false)` when the condition clears.
    pub fn tick(&mut self, now: Duration) -> Option<bool> {
        if self.quiet.fire(now) && self.fast {
            trace!(message = "spy.fast_scroll", on = false);
            self.fast = false;
            return Some(false);
        }
        None
    }

    /// Drop state and cancel the cool-down.
    pub fn reset(&mut self) {
        self.quiet.cancel();
        self.last_scroll = None;
        self.last_delta = 0.0;
        self.fast = false;
    }
}

impl Default for FastScrollMonitor {
    fn default() -> Self {
        Self::from_config(&SpyConfig::default())
    }
}
