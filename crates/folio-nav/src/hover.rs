//! Hover timelines for navigation pills.
//!
//! Each pill owns a paused master timeline whose progress runs from 0
//! (resting) to 1 (fully hovered). Pointer enter retargets the progress to
//! 1, pointer leave retargets it to 0; a retarget always starts from the
//! current progress and replaces the tween in flight.

use std::fmt;
use std::str::FromStr;

use folio_core::config::NavConfig;
use web_time::Duration;

/// Easing curves used by the navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Ease {
    Linear,
    Power2Out,
    #[default]
    Power3Out,
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power2Out => 1.0 - (1.0 - t).powi(3),
            Self::Power3Out => 1.0 - (1.0 - t).powi(4),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Power2Out => "power2.out",
            Self::Power3Out => "power3.out",
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "none" => Ok(Self::Linear),
            "power2.out" | "power2.easeout" => Ok(Self::Power2Out),
            "power3.out" | "power3.easeout" => Ok(Self::Power3Out),
            other => Err(format!("unknown ease: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

/// Progress of one pill's hover animation.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverTimeline {
    progress: f64,
    tween: Option<Tween>,
    ease: Ease,
    enter: Duration,
    leave: Duration,
}

impl Default for HoverTimeline {
    fn default() -> Self {
        Self::from_config(&NavConfig::default())
    }
}

impl HoverTimeline {
    #[must_use]
    pub fn new(enter: Duration, leave: Duration) -> Self {
        Self {
            progress: 0.0,
            tween: None,
            ease: Ease::default(),
            enter,
            leave,
        }
    }

    #[must_use]
    pub fn from_config(config: &NavConfig) -> Self {
        Self::new(config.hover_enter(), config.hover_leave())
    }

    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    #[inline]
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    #[must_use]
    pub fn ease(&self) -> Ease {
        self.ease
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Progress the running tween is heading to, or the resting progress.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.tween.map_or(self.progress, |t| t.to)
    }

    pub fn enter(&mut self) {
        self.tween_to(1.0, self.enter);
    }

    pub fn leave(&mut self) {
        self.tween_to(0.0, self.leave);
    }

    /// Snap back to rest, dropping any tween. Used when the pill is laid
    /// out again.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.tween = None;
    }

    /// Tween from the current progress to `to` over `duration`, replacing
    /// the tween in flight. A zero duration jumps straight there.
    pub fn tween_to(&mut self, to: f64, duration: Duration) {
        if duration.is_zero() {
            self.progress = to;
            self.tween = None;
            return;
        }
        self.tween = Some(Tween {
            from: self.progress,
            to,
            elapsed: Duration::ZERO,
            duration,
        });
    }

    /// Advance by `dt` and return the new progress.
    pub fn tick(&mut self, dt: Duration) -> f64 {
        let Some(mut tween) = self.tween else {
            return self.progress;
        };
        tween.elapsed = tween.elapsed.saturating_add(dt);
        let t = tween.elapsed.as_secs_f64() / tween.duration.as_secs_f64();
        if t >= 1.0 {
            self.progress = tween.to;
            self.tween = None;
        } else {
            self.progress = tween.from + (tween.to - tween.from) * self.ease.apply(t);
            self.tween = Some(tween);
        }
        self.progress
    }
}
