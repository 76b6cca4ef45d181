#![forbid(unsafe_code)]

//! Reveal targets and the geometric eligibility test.
//!
//! A target is eligible while its top edge is above the entry line and its
//! bottom edge is below the exit line, both measured as fractions of the
//! viewport height from the viewport top:
//!
//! ```text
//!   viewport top ──────────────────────── 0.0
//!                   exit line  ─ ─ ─ ─ ─  threshold_exit  (0.20)
//!                   entry line ─ ─ ─ ─ ─  threshold_enter (0.80)
//!   viewport bottom ───────────────────── 1.0
//! ```
//!
//! A target that is not eligible sits either [`Eligibility::Below`] the
//! entry line (not reached yet, or scrolled back up past it) or
//! [`Eligibility::Above`] the exit line (scrolled past).

use folio_core::geometry::BoundingBox;
use folio_core::id::TargetId;
use web_time::Duration;

/// Two-state reveal decision. Interpolation between the two belongs to the
/// rendering layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RevealState {
    #[default]
    Pending,
    Revealed,
}

/// Where a target sits relative to its reveal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// Inside the window.
    Eligible,
    /// Top edge below the entry line.
    Below,
    /// Bottom edge above the exit line.
    Above,
    /// No usable geometry this pass.
    Unknown,
}

/// Classify viewport-relative bounds against a target's thresholds.
#[must_use]
pub fn eligibility(
    bounds: Option<BoundingBox>,
    viewport_height: f64,
    threshold_enter: f64,
    threshold_exit: f64,
) -> Eligibility {
    let Some(bounds) = bounds.filter(|b| !b.is_degenerate()) else {
        return Eligibility::Unknown;
    };
    if !viewport_height.is_finite() || viewport_height <= 0.0 {
        return Eligibility::Unknown;
    }
    if bounds.top > viewport_height * threshold_enter {
        Eligibility::Below
    } else if bounds.bottom() < viewport_height * threshold_exit {
        Eligibility::Above
    } else {
        Eligibility::Eligible
    }
}

/// One registered content block.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealTarget {
    pub id: TargetId,
    pub state: RevealState,
    pub threshold_enter: f64,
    pub threshold_exit: f64,
    /// When the target most recently became eligible while pending.
    pub(crate) eligible_since: Option<Duration>,
    /// Session time at which a staggered enter is due.
    pub(crate) scheduled: Option<Duration>,
}

impl RevealTarget {
    #[must_use]
    pub fn new(id: TargetId, threshold_enter: f64, threshold_exit: f64) -> Self {
        Self {
            id,
            state: RevealState::Pending,
            threshold_enter,
            threshold_exit,
            eligible_since: None,
            scheduled: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.state == RevealState::Revealed
    }

    /// Due time of a pending staggered enter.
    #[inline]
    #[must_use]
    pub fn scheduled_at(&self) -> Option<Duration> {
        self.scheduled
    }

    #[inline]
    #[must_use]
    pub fn eligible_since(&self) -> Option<Duration> {
        self.eligible_since
    }

    #[must_use]
    pub fn classify(&self, bounds: Option<BoundingBox>, viewport_height: f64) -> Eligibility {
        eligibility(bounds, viewport_height, self.threshold_enter, self.threshold_exit)
    }

    /// Drop any pending schedule and eligibility clock.
    pub(crate) fn disarm(&mut self) {
        self.eligible_since = None;
        self.scheduled = None;
    }
}
