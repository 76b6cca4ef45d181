//! Property-based invariant tests for the core primitives.
//!
//! 1. FrameGate: at most one pending payload, latest request wins
//! 2. FrameGate: counters agree with the request/take history
//! 3. OneShot fires exactly once per arming, never early
//! 4. Threshold validation accepts exactly ordered in-range fractions
//! 5. Clamped viewports never have negative scroll

use folio_core::config::validate_thresholds;
use folio_core::frame::FrameGate;
use folio_core::geometry::Viewport;
use folio_core::timer::OneShot;
use proptest::prelude::*;
use web_time::Duration;

// ── Helpers ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum GateOp {
    Request(u32),
    Take,
    Cancel,
}

fn gate_op() -> impl Strategy<Value = GateOp> {
    prop_oneof![
        3 => any::<u32>().prop_map(GateOp::Request),
        2 => Just(GateOp::Take),
        1 => Just(GateOp::Cancel),
    ]
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Frame gate
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn gate_runs_latest_payload_once(ops in proptest::collection::vec(gate_op(), 0..200)) {
        let mut gate = FrameGate::new();
        let mut latest: Option<u32> = None;
        let (mut requested, mut superseded, mut ran) = (0u64, 0u64, 0u64);

        for op in ops {
            match op {
                GateOp::Request(v) => {
                    let armed = gate.request(v);
                    prop_assert_eq!(armed, latest.is_none());
                    requested += 1;
                    if latest.is_some() {
                        superseded += 1;
                    }
                    latest = Some(v);
                }
                GateOp::Take => {
                    let taken = gate.take();
                    prop_assert_eq!(taken, latest.take());
                    if taken.is_some() {
                        ran += 1;
                    }
                }
                GateOp::Cancel => {
                    prop_assert_eq!(gate.cancel(), latest.take().is_some());
                }
            }
            prop_assert_eq!(gate.peek().copied(), latest);
            prop_assert_eq!(gate.is_pending(), latest.is_some());
        }
        prop_assert_eq!(gate.stats(), (requested, superseded, ran));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. One-shot timer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn one_shot_fires_once_at_deadline(
        armed_at in 0u64..10_000,
        after in 0u64..5_000,
        polls in proptest::collection::vec(0u64..20_000, 1..50),
    ) {
        let mut timer = OneShot::new();
        timer.arm(ms(armed_at), ms(after));
        let deadline = armed_at + after;

        let mut polls = polls;
        polls.sort_unstable();
        let mut fired = 0;
        for now in polls {
            if timer.fire(ms(now)) {
                prop_assert!(now >= deadline);
                fired += 1;
            }
        }
        prop_assert!(fired <= 1);
        prop_assert_eq!(timer.is_armed(), fired == 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Threshold validation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn thresholds_valid_iff_ordered_and_in_range(
        enter in -0.5f64..1.5,
        exit in -0.5f64..1.5,
    ) {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        let expected = in_range(enter) && in_range(exit) && enter >= exit;
        prop_assert_eq!(validate_thresholds(enter, exit).is_ok(), expected);
    }

    #[test]
    fn non_finite_thresholds_are_rejected(valid in 0.0f64..=1.0) {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            prop_assert!(validate_thresholds(bad, valid).is_err());
            prop_assert!(validate_thresholds(valid, bad).is_err());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Viewport clamping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamped_viewport_keeps_height(scroll in -5_000.0f64..50_000.0, height in 1.0f64..4_000.0) {
        let v = Viewport::new(scroll, height).clamped();
        prop_assert!(v.scroll_y >= 0.0);
        prop_assert_eq!(v.height, height);
        prop_assert!(v.probe(1.0 / 3.0) >= v.scroll_y);
        prop_assert!(!v.is_degenerate());
    }
}
