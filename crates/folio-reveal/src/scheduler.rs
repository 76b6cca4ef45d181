#![forbid(unsafe_code)]

//! Reveal scheduler: two-state decisions, staggered enters, and the safety
//! fallback.
//!
//! # State machine (per target)
//!
//! ```text
//!              eligible (slot due)              leaves window, policy resets
//!   Pending ───────────────────────▶ Revealed ──────────────────────────────▶ Pending
//!      │  eligible for `grace` without a transition (forced, Immediate)
//!      └───────────────────────────▶ Revealed
//! ```
//!
//! # Invariants
//!
//! 1. Exactly one event per state change; re-evaluating unchanged geometry
//!    never re-emits.
//! 2. Enters of one scope are emitted in registration order, at least
//!    `stagger` apart.
//! 3. A pending target that stays eligible for `grace` is forced to
//!    revealed exactly once; its queued enter is dropped.
//! 4. Missing or degenerate geometry never causes a transition.
//! 5. Membership changes only through `register_*` / `deregister_*`.
//!
//! # Failure Modes
//!
//! - Unknown scope or target in an evaluation call: no events.
//! - A fallback firing after the target was revealed normally: no-op.

use ahash::AHashMap;
use folio_core::config::RevealConfig;
use folio_core::error::{FolioError, Result};
use folio_core::geometry::{BoundingBox, GeometryProvider};
use folio_core::id::{ScopeId, TargetId};
use folio_core::logging::{debug, info, trace};
use web_time::Duration;

use crate::event::{RevealEvent, Transition};
use crate::scope::{RevealScope, ScopeOptions};
use crate::target::{Eligibility, RevealState, RevealTarget};

/// Lifetime counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealStats {
    /// Animated Pending → Revealed transitions.
    pub enters: u64,
    /// Revealed → Pending transitions.
    pub resets: u64,
    /// Safety-fallback reveals.
    pub forced: u64,
    /// Queued enters dropped because the target left the window first.
    pub cancelled: u64,
}

/// Owns every reveal scope of a session.
#[derive(Debug, Clone)]
pub struct RevealScheduler {
    defaults: ScopeOptions,
    scopes: Vec<RevealScope>,
    owners: AHashMap<TargetId, ScopeId>,
    stats: RevealStats,
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(&RevealConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

impl RevealScheduler {
    #[must_use]
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            defaults: ScopeOptions::from(config),
            scopes: Vec::new(),
            owners: AHashMap::new(),
            stats: RevealStats::default(),
        }
    }

    /// Options applied to scopes registered without their own.
    #[must_use]
    pub fn defaults(&self) -> &ScopeOptions {
        &self.defaults
    }

    /// Register a scope. `None` uses the scheduler defaults.
    pub fn register_scope(&mut self, id: ScopeId, options: Option<ScopeOptions>) -> Result<()> {
        if self.scope_index(&id).is_some() {
            return Err(FolioError::DuplicateScope { scope: id });
        }
        let options = options.unwrap_or_else(|| self.defaults.clone());
        options.validate()?;
        debug!(message = "reveal.scope", scope = %id, policy = %options.policy);
        self.scopes.push(RevealScope::new(id, options));
        Ok(())
    }

    /// Remove a scope and all of its targets.
    pub fn deregister_scope(&mut self, id: &ScopeId) -> bool {
        let Some(index) = self.scope_index(id) else {
            return false;
        };
        let scope = self.scopes.remove(index);
        for target in &scope.targets {
            self.owners.remove(&target.id);
        }
        true
    }

    /// Register a target at the end of a scope, with the scope's thresholds.
    ///
    /// Re-registering a known target (a remount) moves it to the end of the
    /// named scope in the pending state.
    pub fn register_target(&mut self, scope: &ScopeId, target: TargetId) -> Result<()> {
        let Some(index) = self.scope_index(scope) else {
            return Err(FolioError::UnknownScope {
                scope: scope.clone(),
            });
        };
        let options = &self.scopes[index].options;
        let entry = RevealTarget::new(target, options.threshold_enter, options.threshold_exit);
        self.insert(index, entry);
        Ok(())
    }

    /// Register a target with its own thresholds.
    pub fn register_target_with_thresholds(
        &mut self,
        scope: &ScopeId,
        target: TargetId,
        threshold_enter: f64,
        threshold_exit: f64,
    ) -> Result<()> {
        folio_core::config::validate_thresholds(threshold_enter, threshold_exit)?;
        let Some(index) = self.scope_index(scope) else {
            return Err(FolioError::UnknownScope {
                scope: scope.clone(),
            });
        };
        self.insert(index, RevealTarget::new(target, threshold_enter, threshold_exit));
        Ok(())
    }

    fn insert(&mut self, scope_index: usize, entry: RevealTarget) {
        self.deregister_target(entry.id);
        let scope = &mut self.scopes[scope_index];
        self.owners.insert(entry.id, scope.id.clone());
        trace!(message = "reveal.register", scope = %scope.id, target = %entry.id);
        scope.targets.push(entry);
    }

    /// Remove a target. Returns `true` if it was registered.
    pub fn deregister_target(&mut self, target: TargetId) -> bool {
        let Some(scope_id) = self.owners.remove(&target) else {
            return false;
        };
        if let Some(index) = self.scope_index(&scope_id) {
            self.scopes[index].targets.retain(|t| t.id != target);
        }
        true
    }

    fn scope_index(&self, id: &ScopeId) -> Option<usize> {
        self.scopes.iter().position(|s| &s.id == id)
    }

    fn locate(&self, target: TargetId) -> Option<(usize, usize)> {
        let scope_id = self.owners.get(&target)?;
        let si = self.scope_index(scope_id)?;
        let ti = self.scopes[si].targets.iter().position(|t| t.id == target)?;
        Some((si, ti))
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl RevealScheduler {
    #[must_use]
    pub fn scope(&self, id: &ScopeId) -> Option<&RevealScope> {
        self.scopes.iter().find(|s| &s.id == id)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &RevealScope> {
        self.scopes.iter()
    }

    #[must_use]
    pub fn target(&self, target: TargetId) -> Option<&RevealTarget> {
        let (si, ti) = self.locate(target)?;
        Some(&self.scopes[si].targets[ti])
    }

    #[must_use]
    pub fn state(&self, target: TargetId) -> Option<RevealState> {
        self.target(target).map(|t| t.state)
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn stats(&self) -> RevealStats {
        self.stats
    }

    /// Earliest session time at which [`tick`](Self::tick) has work: a
    /// queued enter or a grace deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scopes
            .iter()
            .flat_map(|scope| {
                let grace = scope.options.grace;
                scope
                    .targets
                    .iter()
                    .filter(|t| t.state == RevealState::Pending)
                    .flat_map(move |t| {
                        let fallback = t.eligible_since.map(|s| s.saturating_add(grace));
                        [t.scheduled, fallback]
                    })
                    .flatten()
            })
            .min()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl RevealScheduler {
    /// Evaluate one target against its viewport-relative bounds.
    ///
    /// Returns the event emitted by this call, if any. An enter that falls
    /// into a later stagger slot is emitted by [`tick`](Self::tick).
    pub fn evaluate(
        &mut self,
        target: TargetId,
        bounds: Option<BoundingBox>,
        viewport_height: f64,
        now: Duration,
    ) -> Option<RevealEvent> {
        let (si, ti) = self.locate(target)?;
        let scope = &mut self.scopes[si];
        let eligibility = scope.targets[ti].classify(bounds, viewport_height);
        step(scope, ti, eligibility, now, &mut self.stats)
    }

    /// One evaluation pass over a scope, in registration order.
    pub fn evaluate_scope<G: GeometryProvider + ?Sized>(
        &mut self,
        scope: &ScopeId,
        geometry: &G,
        viewport_height: f64,
        now: Duration,
    ) -> Vec<RevealEvent> {
        let Some(si) = self.scope_index(scope) else {
            trace!(message = "reveal.unknown_scope", scope = %scope);
            return Vec::new();
        };
        let mut events = Vec::new();
        pass(&mut self.scopes[si], geometry, viewport_height, now, &mut self.stats, &mut events);
        events
    }

    /// One evaluation pass over every scope.
    pub fn evaluate_all<G: GeometryProvider + ?Sized>(
        &mut self,
        geometry: &G,
        viewport_height: f64,
        now: Duration,
    ) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        for scope in &mut self.scopes {
            pass(scope, geometry, viewport_height, now, &mut self.stats, &mut events);
        }
        events
    }

    /// Advance time: emit queued enters that came due, then apply the
    /// safety fallback to targets that stayed eligible for `grace`.
    ///
    /// Each due target is classified against current geometry first; one
    /// that left its window since the last pass is disarmed instead of
    /// revealed. Events are ordered by due time, then scope and
    /// registration order.
    pub fn tick<G: GeometryProvider + ?Sized>(
        &mut self,
        geometry: &G,
        viewport_height: f64,
        now: Duration,
    ) -> Vec<RevealEvent> {
        let mut due: Vec<(Duration, usize, usize, RevealEvent)> = Vec::new();

        for (si, scope) in self.scopes.iter_mut().enumerate() {
            let grace = scope.options.grace;
            for ti in 0..scope.targets.len() {
                let t = &scope.targets[ti];
                if t.state != RevealState::Pending {
                    continue;
                }
                let queued = t.scheduled.filter(|at| *at <= now);
                let forced = t
                    .eligible_since
                    .map(|since| since.saturating_add(grace))
                    .filter(|deadline| *deadline <= now);
                let (at, transition) = match (queued, forced) {
                    (Some(at), _) => (at, Transition::Animated),
                    (None, Some(deadline)) => (deadline, Transition::Immediate),
                    (None, None) => continue,
                };

                let eligibility = t.classify(geometry.target_bounds(t.id), viewport_height);
                if eligibility != Eligibility::Eligible {
                    trace!(message = "reveal.stale", scope = %scope.id, target = %t.id, eligibility = ?eligibility);
                    if t.scheduled.is_some() {
                        self.stats.cancelled += 1;
                    }
                    scope.targets[ti].disarm();
                    continue;
                }
                let event = reveal(scope, ti, now, transition, &mut self.stats);
                due.push((at, si, ti, event));
            }
        }

        due.sort_by_key(|(at, si, ti, _)| (*at, *si, *ti));
        due.into_iter().map(|(_, _, _, event)| event).collect()
    }
}

fn pass<G: GeometryProvider + ?Sized>(
    scope: &mut RevealScope,
    geometry: &G,
    viewport_height: f64,
    now: Duration,
    stats: &mut RevealStats,
    events: &mut Vec<RevealEvent>,
) {
    for ti in 0..scope.targets.len() {
        let target = &scope.targets[ti];
        let eligibility = target.classify(geometry.target_bounds(target.id), viewport_height);
        if let Some(event) = step(scope, ti, eligibility, now, stats) {
            events.push(event);
        }
    }
}

/// Apply one eligibility observation to one target.
fn step(
    scope: &mut RevealScope,
    ti: usize,
    eligibility: Eligibility,
    now: Duration,
    stats: &mut RevealStats,
) -> Option<RevealEvent> {
    let (state, scheduled, since) = {
        let t = &scope.targets[ti];
        (t.state, t.scheduled, t.eligible_since)
    };

    match (eligibility, state) {
        (Eligibility::Eligible, RevealState::Revealed) => None,
        (Eligibility::Eligible, RevealState::Pending) => {
            let due = match scheduled {
                Some(due) => due,
                None => scope.claim_slot(now),
            };
            let target = &mut scope.targets[ti];
            target.eligible_since = Some(since.unwrap_or(now));
            target.scheduled = Some(due);
            if due <= now {
                Some(reveal(scope, ti, now, Transition::Animated, stats))
            } else {
                trace!(message = "reveal.queued", scope = %scope.id, target = %target.id, due_ms = due.as_millis() as u64);
                None
            }
        }
        (Eligibility::Unknown, _) | (Eligibility::Below | Eligibility::Above, RevealState::Pending) => {
            if scheduled.is_some() {
                stats.cancelled += 1;
            }
            scope.targets[ti].disarm();
            None
        }
        (leaving, RevealState::Revealed) => {
            if !scope.options.resets_on(leaving) {
                return None;
            }
            let target = &mut scope.targets[ti];
            target.state = RevealState::Pending;
            target.disarm();
            stats.resets += 1;
            debug!(message = "reveal.reset", scope = %scope.id, target = %target.id, direction = ?leaving);
            Some(RevealEvent {
                scope: scope.id.clone(),
                target: target.id,
                state: RevealState::Pending,
                transition: Transition::Animated,
                at: now,
            })
        }
    }
}

/// Move a pending target to revealed.
fn reveal(
    scope: &mut RevealScope,
    ti: usize,
    now: Duration,
    transition: Transition,
    stats: &mut RevealStats,
) -> RevealEvent {
    let target = &mut scope.targets[ti];
    target.state = RevealState::Revealed;
    target.disarm();
    match transition {
        Transition::Animated => {
            stats.enters += 1;
            debug!(message = "reveal.enter", scope = %scope.id, target = %target.id);
        }
        Transition::Immediate => {
            stats.forced += 1;
            info!(message = "reveal.forced", scope = %scope.id, target = %target.id);
        }
    }
    RevealEvent {
        scope: scope.id.clone(),
        target: target.id,
        state: RevealState::Revealed,
        transition,
        at: now,
    }
}
