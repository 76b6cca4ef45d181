#![forbid(unsafe_code)]

//! Configuration for the tracker, the reveal scheduler, and the nav pills.
//!
//! Every timing constant and threshold is a tunable default. Durations are
//! stored as whole milliseconds (`*_ms`) so the structs serialize cleanly
//! and map one-to-one onto `FOLIO_*` environment variables; use the
//! `Duration` accessors in code.
//!
//! Environment overrides are layered on top of the defaults by
//! [`FolioConfig::from_env`]. Unparsable values are ignored.
//!
//! | variable                        | field                            |
//! |---------------------------------|----------------------------------|
//! | `FOLIO_SPY_PROBE_FRACTION`      | `spy.probe_fraction`             |
//! | `FOLIO_SPY_TOLERANCE_PX`        | `spy.tolerance_px`               |
//! | `FOLIO_FAST_SCROLL_PX`          | `spy.fast_scroll_px`             |
//! | `FOLIO_FAST_SCROLL_COOLDOWN_MS` | `spy.fast_scroll_cooldown_ms`    |
//! | `FOLIO_SETTLE_DELAYS_MS`        | `spy.settle_delays_ms` (a,b,c)   |
//! | `FOLIO_REVEAL_ENTER`            | `reveal.enter_fraction`          |
//! | `FOLIO_REVEAL_EXIT`             | `reveal.exit_fraction`           |
//! | `FOLIO_REVEAL_STAGGER_MS`       | `reveal.stagger_ms`              |
//! | `FOLIO_REVEAL_GRACE_MS`         | `reveal.grace_ms`                |
//! | `FOLIO_REVEAL_POLICY`           | `reveal.policy`                  |
//! | `FOLIO_NAV_HEIGHT_PX`           | `nav.nav_height_px`              |

use std::fmt;
use std::str::FromStr;

use web_time::Duration;

use crate::error::{FolioError, Result};

/// What happens to a revealed target once it leaves the reveal window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RevealPolicy {
    /// Reveal once; never return to pending.
    PlayOnce,
    /// Leaving the window in either direction resets to pending, so the
    /// transition replays on re-entry.
    #[default]
    Reversible,
    /// Reset only when the target drops back below the entry line
    /// (scrolling up past where it was first revealed).
    ReverseOnLeaveBack,
}

impl RevealPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlayOnce => "play-once",
            Self::Reversible => "reversible",
            Self::ReverseOnLeaveBack => "reverse-on-leave-back",
        }
    }
}

impl fmt::Display for RevealPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevealPolicy {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "play-once" | "once" => Ok(Self::PlayOnce),
            "reversible" => Ok(Self::Reversible),
            "reverse-on-leave-back" | "leave-back" => Ok(Self::ReverseOnLeaveBack),
            other => Err(FolioError::invalid(
                "reveal.policy",
                format!("unknown policy {other:?}"),
            )),
        }
    }
}

/// Section tracker tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpyConfig {
    /// Probe position as a fraction of the viewport height. Default: 1/3.
    pub probe_fraction: f64,
    /// Margin added above and below every section window. Default: 100.
    pub tolerance_px: f64,
    /// Scroll delta between samples that counts as fast. Default: 100.
    pub fast_scroll_px: f64,
    /// Quiet time before the fast-scroll condition clears. Default: 100.
    pub fast_scroll_cooldown_ms: u64,
    /// Delayed recomputations after (re)registration, on top of the
    /// immediate one. Default: 100, 500, 1000.
    pub settle_delays_ms: Vec<u64>,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            probe_fraction: 1.0 / 3.0,
            tolerance_px: 100.0,
            fast_scroll_px: 100.0,
            fast_scroll_cooldown_ms: 100,
            settle_delays_ms: vec![100, 500, 1000],
        }
    }
}

impl SpyConfig {
    #[must_use]
    pub fn with_tolerance(mut self, px: f64) -> Self {
        self.tolerance_px = px;
        self
    }

    #[must_use]
    pub fn with_probe_fraction(mut self, fraction: f64) -> Self {
        self.probe_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_fast_scroll(mut self, px: f64, cooldown: Duration) -> Self {
        self.fast_scroll_px = px;
        self.fast_scroll_cooldown_ms = millis(cooldown);
        self
    }

    #[must_use]
    pub fn with_settle_delays(mut self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.settle_delays_ms = delays.into_iter().map(millis).collect();
        self
    }

    #[must_use]
    pub fn fast_scroll_cooldown(&self) -> Duration {
        Duration::from_millis(self.fast_scroll_cooldown_ms)
    }

    pub fn settle_delays(&self) -> impl Iterator<Item = Duration> + '_ {
        self.settle_delays_ms.iter().map(|ms| Duration::from_millis(*ms))
    }
}

/// Reveal scheduler tuning. These are the defaults applied to every scope
/// that does not set its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RevealConfig {
    /// A target may reveal once its top is above this fraction of the
    /// viewport height. Default: 0.80.
    pub enter_fraction: f64,
    /// ...and while its bottom is below this fraction. Default: 0.20.
    pub exit_fraction: f64,
    /// Delay between consecutive targets revealed in one pass. Default: 100.
    pub stagger_ms: u64,
    /// How long an eligible target may go without a transition before it is
    /// forced to revealed. Default: 2000.
    pub grace_ms: u64,
    /// Default re-entry policy.
    pub policy: RevealPolicy,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enter_fraction: 0.80,
            exit_fraction: 0.20,
            stagger_ms: 100,
            grace_ms: 2000,
            policy: RevealPolicy::default(),
        }
    }
}

impl RevealConfig {
    #[must_use]
    pub fn with_thresholds(mut self, enter: f64, exit: f64) -> Self {
        self.enter_fraction = enter;
        self.exit_fraction = exit;
        self
    }

    #[must_use]
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger_ms = millis(stagger);
        self
    }

    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace_ms = millis(grace);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RevealPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    #[must_use]
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

/// Navigation pill tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavConfig {
    /// Height of the fixed nav bar; scroll targets land this far above a
    /// section's top. Default: 80.
    pub nav_height_px: f64,
    /// Hover-in retarget duration. Default: 300.
    pub hover_enter_ms: u64,
    /// Hover-out retarget duration. Default: 200.
    pub hover_leave_ms: u64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            nav_height_px: 80.0,
            hover_enter_ms: 300,
            hover_leave_ms: 200,
        }
    }
}

impl NavConfig {
    #[must_use]
    pub fn hover_enter(&self) -> Duration {
        Duration::from_millis(self.hover_enter_ms)
    }

    #[must_use]
    pub fn hover_leave(&self) -> Duration {
        Duration::from_millis(self.hover_leave_ms)
    }
}

/// Complete configuration for one folio session.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FolioConfig {
    pub spy: SpyConfig,
    pub reveal: RevealConfig,
    pub nav: NavConfig,
}

impl FolioConfig {
    #[must_use]
    pub fn with_spy(mut self, spy: SpyConfig) -> Self {
        self.spy = spy;
        self
    }

    #[must_use]
    pub fn with_reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    #[must_use]
    pub fn with_nav(mut self, nav: NavConfig) -> Self {
        self.nav = nav;
        self
    }

    /// Defaults overlaid with `FOLIO_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary key lookup (environment-shaped).
    #[must_use]
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let num = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        let ms = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(v) = num("FOLIO_SPY_PROBE_FRACTION") {
            self.spy.probe_fraction = v;
        }
        if let Some(v) = num("FOLIO_SPY_TOLERANCE_PX") {
            self.spy.tolerance_px = v;
        }
        if let Some(v) = num("FOLIO_FAST_SCROLL_PX") {
            self.spy.fast_scroll_px = v;
        }
        if let Some(v) = ms("FOLIO_FAST_SCROLL_COOLDOWN_MS") {
            self.spy.fast_scroll_cooldown_ms = v;
        }
        if let Some(list) = lookup("FOLIO_SETTLE_DELAYS_MS") {
            let parsed: std::result::Result<Vec<u64>, _> = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            if let Ok(delays) = parsed {
                self.spy.settle_delays_ms = delays;
            }
        }
        if let Some(v) = num("FOLIO_REVEAL_ENTER") {
            self.reveal.enter_fraction = v;
        }
        if let Some(v) = num("FOLIO_REVEAL_EXIT") {
            self.reveal.exit_fraction = v;
        }
        if let Some(v) = ms("FOLIO_REVEAL_STAGGER_MS") {
            self.reveal.stagger_ms = v;
        }
        if let Some(v) = ms("FOLIO_REVEAL_GRACE_MS") {
            self.reveal.grace_ms = v;
        }
        if let Some(policy) = lookup("FOLIO_REVEAL_POLICY").and_then(|v| v.parse().ok()) {
            self.reveal.policy = policy;
        }
        if let Some(v) = num("FOLIO_NAV_HEIGHT_PX") {
            self.nav.nav_height_px = v;
        }
        self
    }

    /// Reject values the decision code cannot honour.
    pub fn validate(&self) -> Result<()> {
        let spy = &self.spy;
        if !(spy.probe_fraction.is_finite() && spy.probe_fraction > 0.0 && spy.probe_fraction <= 1.0)
        {
            return Err(FolioError::invalid(
                "spy.probe_fraction",
                "must be within (0, 1]",
            ));
        }
        if !(spy.tolerance_px.is_finite() && spy.tolerance_px >= 0.0) {
            return Err(FolioError::invalid("spy.tolerance_px", "must be >= 0"));
        }
        if !(spy.fast_scroll_px.is_finite() && spy.fast_scroll_px > 0.0) {
            return Err(FolioError::invalid("spy.fast_scroll_px", "must be > 0"));
        }
        validate_thresholds(self.reveal.enter_fraction, self.reveal.exit_fraction)?;
        if !(self.nav.nav_height_px.is_finite() && self.nav.nav_height_px >= 0.0) {
            return Err(FolioError::invalid("nav.nav_height_px", "must be >= 0"));
        }
        Ok(())
    }
}

/// Check a pair of reveal thresholds (also used for per-target overrides).
pub fn validate_thresholds(enter: f64, exit: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&enter) {
        return Err(FolioError::invalid(
            "reveal.enter_fraction",
            "must be within [0, 1]",
        ));
    }
    if !(0.0..=1.0).contains(&exit) {
        return Err(FolioError::invalid(
            "reveal.exit_fraction",
            "must be within [0, 1]",
        ));
    }
    if enter < exit {
        return Err(FolioError::invalid(
            "reveal.enter_fraction",
            format!("({enter}) must not be below exit_fraction ({exit})"),
        ));
    }
    Ok(())
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u64::MAX as u128) as u64
}
