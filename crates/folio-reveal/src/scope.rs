//! Registration scopes.
//!
//! A scope is one mounted reveal container. Its targets share a re-entry
//! policy and stagger pacing; thresholds default to the scope's but may be
//! overridden per target.

use folio_core::config::{RevealConfig, RevealPolicy, validate_thresholds};
use folio_core::error::Result;
use folio_core::id::{ScopeId, TargetId};
use web_time::Duration;

use crate::target::{Eligibility, RevealTarget};

/// Per-scope settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScopeOptions {
    pub policy: RevealPolicy,
    #[cfg_attr(feature = "serde", serde(with = "folio_core::serde_millis"))]
    pub stagger: Duration,
    #[cfg_attr(feature = "serde", serde(with = "folio_core::serde_millis"))]
    pub grace: Duration,
    pub threshold_enter: f64,
    pub threshold_exit: f64,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self::from(&RevealConfig::default())
    }
}

impl From<&RevealConfig> for ScopeOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            policy: config.policy,
            stagger: config.stagger(),
            grace: config.grace(),
            threshold_enter: config.enter_fraction,
            threshold_exit: config.exit_fraction,
        }
    }
}

impl ScopeOptions {
    #[must_use]
    pub fn with_policy(mut self, policy: RevealPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, enter: f64, exit: f64) -> Self {
        self.threshold_enter = enter;
        self.threshold_exit = exit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_thresholds(self.threshold_enter, self.threshold_exit)
    }

    /// Whether a revealed target resets on leaving the window this way.
    #[must_use]
    pub fn resets_on(&self, leaving: Eligibility) -> bool {
        match (self.policy, leaving) {
            (RevealPolicy::PlayOnce, _) => false,
            (RevealPolicy::Reversible, Eligibility::Below | Eligibility::Above) => true,
            (RevealPolicy::ReverseOnLeaveBack, Eligibility::Below) => true,
            _ => false,
        }
    }
}

/// A scope and its targets in registration order.
#[derive(Debug, Clone)]
pub struct RevealScope {
    pub id: ScopeId,
    pub options: ScopeOptions,
    pub(crate) targets: Vec<RevealTarget>,
    /// Due time handed to the most recently scheduled enter.
    pub(crate) cursor: Option<Duration>,
}

impl RevealScope {
    #[must_use]
    pub fn new(id: ScopeId, options: ScopeOptions) -> Self {
        Self {
            id,
            options,
            targets: Vec::new(),
            cursor: None,
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &RevealTarget> {
        self.targets.iter()
    }

    #[must_use]
    pub fn target(&self, id: TargetId) -> Option<&RevealTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Next stagger slot at or after `now`.
    ///
    /// Slots are handed out `stagger` apart across passes, so targets that
    /// become eligible while earlier ones are still queued line up behind
    /// them in registration order.
    pub(crate) fn claim_slot(&mut self, now: Duration) -> Duration {
        let due = match self.cursor {
            Some(last) => now.max(last.saturating_add(self.options.stagger)),
            None => now,
        };
        self.cursor = Some(due);
        due
    }
}
