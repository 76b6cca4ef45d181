//! Hover focus across a grid of project cards.
//!
//! Hovering one card lifts it and pushes every sibling back; leaving the
//! grid returns all cards to rest. Each card owns a [`HoverTimeline`] whose
//! progress is an *emphasis* in `[-1, 1]`: `1` for the focused card, `-1`
//! for its siblings, `0` at rest.
//!
//! ```text
//!   emphasis   scale    lift
//!      1.0     1.05    -10 px
//!      0.0     1.00      0 px
//!     -1.0     0.95    +10 px
//! ```

use folio_core::logging::trace;
use web_time::Duration;

use crate::hover::{Ease, HoverTimeline};

pub const FOCUS_DURATION: Duration = Duration::from_millis(500);
pub const FOCUS_EASE: Ease = Ease::Power2Out;
/// Scale change at full emphasis.
pub const FOCUS_SCALE: f64 = 0.05;
/// Vertical offset in CSS pixels at full emphasis.
pub const FOCUS_LIFT_PX: f64 = 10.0;

/// Transform of one card for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPose {
    pub scale: f64,
    /// Vertical translation; negative lifts the card.
    pub y: f64,
}

impl CardPose {
    pub const REST: Self = Self { scale: 1.0, y: 0.0 };

    #[must_use]
    pub fn at(emphasis: f64) -> Self {
        Self {
            scale: 1.0 + FOCUS_SCALE * emphasis,
            y: -FOCUS_LIFT_PX * emphasis,
        }
    }
}

/// Focus state of a card grid.
#[derive(Debug, Clone)]
pub struct CardFocus {
    cards: Vec<HoverTimeline>,
    focused: Option<usize>,
    duration: Duration,
}

impl Default for CardFocus {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CardFocus {
    #[must_use]
    pub fn new(cards: usize) -> Self {
        let mut focus = Self {
            cards: Vec::new(),
            focused: None,
            duration: FOCUS_DURATION,
        };
        focus.set_len(cards);
        focus
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Replace the card list; every card starts at rest.
    pub fn set_len(&mut self, cards: usize) {
        let card = HoverTimeline::new(self.duration, self.duration).with_ease(FOCUS_EASE);
        self.cards = vec![card; cards];
        self.focused = None;
    }

    #[inline]
    #[must_use]
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Pointer entered card `index`. Unknown indices are ignored.
    pub fn hover(&mut self, index: usize) {
        if index >= self.cards.len() || self.focused == Some(index) {
            return;
        }
        trace!(message = "focus.hover", index);
        self.focused = Some(index);
        let duration = self.duration;
        for (i, card) in self.cards.iter_mut().enumerate() {
            card.tween_to(if i == index { 1.0 } else { -1.0 }, duration);
        }
    }

    /// Pointer left the grid.
    pub fn leave(&mut self) {
        if self.focused.take().is_none() {
            return;
        }
        trace!(message = "focus.leave");
        let duration = self.duration;
        for card in &mut self.cards {
            card.tween_to(0.0, duration);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        for card in &mut self.cards {
            card.tick(dt);
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.cards.iter().any(HoverTimeline::is_animating)
    }

    #[must_use]
    pub fn emphasis(&self, index: usize) -> Option<f64> {
        self.cards.get(index).map(HoverTimeline::progress)
    }

    #[must_use]
    pub fn pose(&self, index: usize) -> Option<CardPose> {
        self.emphasis(index).map(CardPose::at)
    }
}
