use folio_core::id::{ScopeId, TargetId};
use web_time::Duration;

use crate::target::RevealState;

/// How the rendering layer should apply a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Transition {
    /// Play (or reverse) the target's timeline.
    Animated,
    /// Jump straight to the end state; used by the safety fallback.
    Immediate,
}

/// One state change of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevealEvent {
    pub scope: ScopeId,
    pub target: TargetId,
    pub state: RevealState,
    pub transition: Transition,
    /// Session time at which the change took effect.
    #[cfg_attr(feature = "serde", serde(with = "folio_core::serde_millis"))]
    pub at: Duration,
}

impl RevealEvent {
    #[inline]
    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.state == RevealState::Revealed
    }

    #[inline]
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.transition == Transition::Immediate
    }
}
