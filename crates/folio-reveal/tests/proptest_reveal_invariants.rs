//! Property-based invariant tests for the reveal scheduler.
//!
//! 1. Play-once: re-evaluating a revealed target never emits again
//! 2. Every emitted event is a real state change (no duplicates)
//! 3. A target held eligible is revealed exactly once, forced or not
//! 4. Reversible targets emit one event per window crossing
//! 5. Enters within a scope come out in registration order
//! 6. Nothing is revealed while outside its window, even when its slot
//!    or grace deadline falls due between passes

use folio_core::config::RevealPolicy;
use folio_core::geometry::BoundingBox;
use folio_core::id::{ScopeId, TargetId};
use folio_reveal::{Eligibility, RevealScheduler, RevealState, ScopeOptions, Transition, eligibility};
use proptest::prelude::*;
use web_time::Duration;

// ── Helpers ──────────────────────────────────────────────────────────

const VH: f64 = 1000.0;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn inside() -> Option<BoundingBox> {
    Some(BoundingBox::new(400.0, 200.0, 600.0))
}

fn bounds_at(top: f64) -> Option<BoundingBox> {
    Some(BoundingBox::new(top, 200.0, 600.0))
}

fn scheduler(policy: RevealPolicy, stagger: u64, grace: u64, n: u64) -> (RevealScheduler, ScopeId) {
    let mut s = RevealScheduler::default();
    let scope = ScopeId::new("scope");
    let options = ScopeOptions::default()
        .with_policy(policy)
        .with_stagger(ms(stagger))
        .with_grace(ms(grace));
    s.register_scope(scope.clone(), Some(options)).unwrap();
    for id in 0..n {
        s.register_target(&scope, TargetId(id)).unwrap();
    }
    (s, scope)
}

fn policy() -> impl Strategy<Value = RevealPolicy> {
    prop_oneof![
        Just(RevealPolicy::PlayOnce),
        Just(RevealPolicy::Reversible),
        Just(RevealPolicy::ReverseOnLeaveBack),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Play-once idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn play_once_never_reemits(
        tops in proptest::collection::vec(-3000.0f64..3000.0, 1..60),
    ) {
        let (mut s, _scope) = scheduler(RevealPolicy::PlayOnce, 100, 2000, 1);
        let first = s.evaluate(TargetId(0), inside(), VH, ms(0));
        prop_assert!(first.is_some());

        for (i, top) in tops.iter().enumerate() {
            let now = ms(16 * (i as u64 + 1));
            prop_assert_eq!(s.evaluate(TargetId(0), bounds_at(*top), VH, now), None);
            prop_assert!(s.tick(&AllInside, VH, now).is_empty());
        }
        prop_assert_eq!(s.state(TargetId(0)), Some(RevealState::Revealed));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Events alternate state
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn events_alternate_state(
        policy in policy(),
        tops in proptest::collection::vec(prop_oneof![
            Just(None),
            (-2000.0f64..2000.0).prop_map(Some),
        ], 1..80),
    ) {
        let (mut s, _scope) = scheduler(policy, 100, 2000, 1);
        let mut last = RevealState::Pending;
        for (i, top) in tops.iter().enumerate() {
            let now = ms(50 * i as u64);
            let bounds = top.and_then(bounds_at);
            let mut events = s.tick(&Fixed(bounds), VH, now);
            events.extend(s.evaluate(TargetId(0), bounds, VH, now));
            for event in events {
                prop_assert_ne!(event.state, last);
                last = event.state;
            }
            prop_assert_eq!(s.state(TargetId(0)), Some(last));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Exactly one reveal while held eligible
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn held_target_is_revealed_exactly_once(
        n in 1u64..8,
        stagger in 0u64..1500,
        grace in 1u64..3000,
        step in 1u64..400,
    ) {
        let (mut s, scope) = scheduler(RevealPolicy::Reversible, stagger, grace, n);
        let mut counts = vec![0u32; n as usize];
        let mut forced = 0u32;

        let horizon = stagger * n + grace + step;
        let mut now = 0;
        while now <= horizon {
            let mut events = s.tick(&AllInside, VH, ms(now));
            for id in 0..n {
                events.extend(s.evaluate(TargetId(id), inside(), VH, ms(now)));
            }
            for event in events {
                prop_assert_eq!(&event.scope, &scope);
                prop_assert_eq!(event.state, RevealState::Revealed);
                counts[event.target.0 as usize] += 1;
                if event.transition == Transition::Immediate {
                    forced += 1;
                }
            }
            now += step;
        }

        prop_assert!(counts.iter().all(|c| *c == 1), "counts: {:?}", counts);
        prop_assert_eq!(u64::from(forced), s.stats().forced);
        prop_assert_eq!(s.next_deadline(), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Reversible crossings
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reversible_emits_per_crossing(crossings in 1usize..12) {
        let (mut s, _scope) = scheduler(RevealPolicy::Reversible, 100, 2000, 1);
        let mut events = Vec::new();
        let mut now = 0;
        for i in 0..=crossings {
            let top = if i % 2 == 0 { 500.0 } else { 950.0 };
            events.extend(s.evaluate(TargetId(0), bounds_at(top), VH, ms(now)));
            // Unchanged geometry adds nothing.
            events.extend(s.evaluate(TargetId(0), bounds_at(top), VH, ms(now + 1)));
            now += 500;
        }
        prop_assert_eq!(events.len(), crossings + 1);
        prop_assert!(events.iter().all(|e| e.transition == Transition::Animated));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Registration order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn enters_follow_registration_order(
        order in Just((0u64..10).collect::<Vec<_>>()).prop_shuffle(),
        stagger in 1u64..300,
    ) {
        let mut s = RevealScheduler::default();
        let scope = ScopeId::new("grid");
        s.register_scope(
            scope.clone(),
            Some(ScopeOptions::default().with_stagger(ms(stagger)).with_grace(ms(60_000))),
        ).unwrap();
        for id in &order {
            s.register_target(&scope, TargetId(*id)).unwrap();
        }

        let mut seen = Vec::new();
        for ev in s.evaluate_all(&AllInside, VH, ms(0)) {
            seen.push(ev.target.0);
        }
        let mut now = 0;
        while seen.len() < order.len() {
            now += stagger;
            seen.extend(s.tick(&AllInside, VH, ms(now)).into_iter().map(|e| e.target.0));
        }
        prop_assert_eq!(seen, order);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Reveals only inside the window
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reveals_only_inside_the_window(
        policy in policy(),
        stagger in 0u64..400,
        grace in 1u64..1000,
        frames in proptest::collection::vec((-1500.0f64..1500.0, any::<bool>()), 1..80),
    ) {
        let (mut s, _scope) = scheduler(policy, stagger, grace, 4);
        let mut now = 0;
        for (top, pass) in frames {
            // Geometry moves every step; a pass only runs on some of them.
            let geometry = Fixed(bounds_at(top));
            let mut events = s.tick(&geometry, VH, ms(now));
            if pass {
                events.extend(s.evaluate_all(&geometry, VH, ms(now)));
            }
            for event in events.iter().filter(|e| e.is_enter()) {
                prop_assert_eq!(
                    eligibility(bounds_at(top), VH, 0.80, 0.20),
                    Eligibility::Eligible,
                    "{:?} revealed at top {}", event.target, top
                );
            }
            now += 37;
        }
    }
}

struct Fixed(Option<BoundingBox>);

impl folio_core::GeometryProvider for Fixed {
    fn section_geometry(&self, _id: &folio_core::SectionId) -> Option<folio_core::SectionGeometry> {
        None
    }

    fn target_bounds(&self, _id: TargetId) -> Option<BoundingBox> {
        self.0
    }
}

struct AllInside;

impl folio_core::GeometryProvider for AllInside {
    fn section_geometry(&self, _id: &folio_core::SectionId) -> Option<folio_core::SectionGeometry> {
        None
    }

    fn target_bounds(&self, _id: TargetId) -> Option<BoundingBox> {
        inside()
    }
}

// ═════════════════════════════════════════════════════════════════════════
// End-to-end: enter, leave above, re-enter
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn reversible_three_event_scenario() {
    let (mut s, _scope) = scheduler(RevealPolicy::Reversible, 100, 2000, 1);
    let mut log = Vec::new();

    // Top crosses the 80% line.
    log.extend(s.evaluate(TargetId(0), bounds_at(780.0), VH, ms(0)));
    // Scrolled on: bottom rises above the 20% line.
    log.extend(s.evaluate(TargetId(0), bounds_at(-100.0), VH, ms(400)));
    // Scrolled back: in view again.
    log.extend(s.evaluate(TargetId(0), bounds_at(300.0), VH, ms(800)));

    let states: Vec<RevealState> = log.iter().map(|e| e.state).collect();
    assert_eq!(
        states,
        [RevealState::Revealed, RevealState::Pending, RevealState::Revealed]
    );
}
