//! Property-based invariant tests for pill geometry and hover timelines.
//!
//! 1. The mask circle passes through the pill's bottom corners
//! 2. Diameter and origin leave the circle anchored below the pill
//! 3. Hover progress stays in [0, 1] under any enter/leave/tick sequence
//! 4. A long enough tick always settles at the last target
//! 5. Card focus: emphasis stays in [-1, 1], at most one card is lifted

use folio_nav::{CardFocus, Ease, HoverTimeline, PillGeometry};
use proptest::prelude::*;
use web_time::Duration;

proptest! {
    #[test]
    fn circle_passes_through_bottom_corners(w in 0.0f64..2000.0, h in 1.0f64..400.0) {
        let g = PillGeometry::measure(w, h).unwrap();
        let dx = w / 2.0;
        let dy = h - g.radius;
        let dist = (dx * dx + dy * dy).sqrt();
        prop_assert!((dist - g.radius).abs() < 1e-6 * g.radius.max(1.0));
    }

    #[test]
    fn circle_is_anchored(w in 0.0f64..2000.0, h in 1.0f64..400.0) {
        let g = PillGeometry::measure(w, h).unwrap();
        prop_assert!(g.diameter >= 2.0 * g.radius + 2.0);
        prop_assert!(g.delta >= 1.0);
        prop_assert!(g.origin_y > 0.0);
        prop_assert_eq!(g.origin_y, g.diameter - g.delta);
        prop_assert!(g.hover_label_start > h);
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Enter,
    Leave,
    Tick(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Enter),
        Just(Op::Leave),
        (0u64..400).prop_map(Op::Tick),
    ]
}

fn ease() -> impl Strategy<Value = Ease> {
    prop_oneof![Just(Ease::Linear), Just(Ease::Power2Out), Just(Ease::Power3Out)]
}

proptest! {
    #[test]
    fn progress_stays_in_unit_range(ops in proptest::collection::vec(op(), 0..60), ease in ease()) {
        let mut tl = HoverTimeline::default().with_ease(ease);
        for op in ops {
            match op {
                Op::Enter => tl.enter(),
                Op::Leave => tl.leave(),
                Op::Tick(ms) => {
                    tl.tick(Duration::from_millis(ms));
                }
            }
            prop_assert!((0.0..=1.0).contains(&tl.progress()), "progress {}", tl.progress());
        }
    }

    #[test]
    fn long_tick_settles_at_target(ops in proptest::collection::vec(op(), 1..40)) {
        let mut tl = HoverTimeline::default();
        for op in ops {
            match op {
                Op::Enter => tl.enter(),
                Op::Leave => tl.leave(),
                Op::Tick(ms) => {
                    tl.tick(Duration::from_millis(ms));
                }
            }
        }
        let target = tl.target();
        tl.tick(Duration::from_secs(1));
        prop_assert_eq!(tl.progress(), target);
        prop_assert!(!tl.is_animating());
    }
}

#[derive(Debug, Clone)]
enum FocusOp {
    Hover(usize),
    Leave,
    Tick(u64),
}

fn focus_op() -> impl Strategy<Value = FocusOp> {
    prop_oneof![
        (0usize..8).prop_map(FocusOp::Hover),
        Just(FocusOp::Leave),
        (0u64..700).prop_map(FocusOp::Tick),
    ]
}

proptest! {
    #[test]
    fn card_focus_stays_bounded(
        cards in 1usize..6,
        ops in proptest::collection::vec(focus_op(), 1..60),
    ) {
        let mut focus = CardFocus::new(cards);
        for op in ops {
            match op {
                FocusOp::Hover(i) => focus.hover(i),
                FocusOp::Leave => focus.leave(),
                FocusOp::Tick(ms) => focus.tick(Duration::from_millis(ms)),
            }
            for i in 0..cards {
                let e = focus.emphasis(i).unwrap();
                prop_assert!((-1.0..=1.0).contains(&e), "card {} emphasis {}", i, e);
            }
        }

        focus.tick(Duration::from_secs(1));
        let lifted = (0..cards).filter(|i| focus.emphasis(*i) == Some(1.0)).count();
        match focus.focused() {
            Some(i) => {
                prop_assert_eq!(focus.emphasis(i), Some(1.0));
                prop_assert_eq!(lifted, 1);
            }
            None => prop_assert!((0..cards).all(|i| focus.emphasis(i) == Some(0.0))),
        }
    }
}
