#![forbid(unsafe_code)]

//! Delayed recomputation after the section list is (re)registered.
//!
//! Initial geometry is unreliable while images and fonts load, so a fresh
//! registration asks for a recomputation immediately and again after each
//! configured delay (100 ms, 500 ms, 1000 ms by default). Restarting the
//! schedule cancels whatever was still armed from the previous one.

use folio_core::config::SpyConfig;
use folio_core::timer::OneShot;
use web_time::Duration;

#[derive(Debug, Clone)]
pub struct SettleSchedule {
    delays: Vec<Duration>,
    timers: Vec<OneShot>,
}

impl SettleSchedule {
    #[must_use]
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        let delays: Vec<Duration> = delays.into_iter().collect();
        let timers = vec![OneShot::new(); delays.len()];
        Self { delays, timers }
    }

    #[must_use]
    pub fn from_config(config: &SpyConfig) -> Self {
        Self::new(config.settle_delays())
    }

    /// Arm every delay relative to `now`, replacing any earlier schedule.
    pub fn start(&mut self, now: Duration) {
        for (timer, delay) in self.timers.iter_mut().zip(&self.delays) {
            timer.arm(now, *delay);
        }
    }

    /// Number of checkpoints that came due. Several may coalesce into one
    /// recomputation if the host polls late.
    pub fn poll(&mut self, now: Duration) -> usize {
        self.timers
            .iter_mut()
            .map(|t| t.fire(now))
            .filter(|fired| *fired)
            .count()
    }

    pub fn cancel(&mut self) {
        for timer in &mut self.timers {
            timer.cancel();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.timers.iter().any(OneShot::is_armed)
    }

    /// Earliest armed checkpoint.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().filter_map(OneShot::deadline).min()
    }
}

impl Default for SettleSchedule {
    fn default() -> Self {
        Self::from_config(&SpyConfig::default())
    }
}
