#![forbid(unsafe_code)]

//! Pill mask geometry.
//!
//! On hover a circle grows out of the bottom of each pill. The circle is the
//! one passing through the pill's two bottom corners and its top-centre
//! point, so at full scale it covers the pill exactly:
//!
//! ```text
//!        ┌──────────┐  ← top-centre on the circle
//!        │  label   │
//!        └──────────┘  ← bottom corners on the circle
//!          ╰──────╯    ← circle bottom, `delta` below the pill
//! ```
//!
//! # Invariants
//!
//! 1. `diameter >= 2 * radius`, rounded up to whole pixels plus a 2 px bleed.
//! 2. `origin_y = diameter - delta`, so scaling about the origin keeps the
//!    circle anchored at the pill's bottom edge.
//! 3. Degenerate sizes (non-finite, `height <= 0`, `width < 0`) yield `None`.

use crate::hover::Ease;

/// Scale the circle reaches at full hover.
pub const CIRCLE_SCALE_HOVERED: f64 = 1.2;

/// Extra lift applied to the resting label beyond the pill height.
const LABEL_LIFT_PX: f64 = 8.0;

/// Distance below the pill the hover label starts from.
const HOVER_LABEL_DROP_PX: f64 = 100.0;

/// Mask geometry for one laid-out pill.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PillGeometry {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    /// Circle width and height in CSS pixels.
    pub diameter: f64,
    /// How far the circle's bottom sits below the pill's bottom edge.
    pub delta: f64,
    /// Vertical transform origin inside the circle.
    pub origin_y: f64,
    /// Resting label's hovered offset (negative: upwards).
    pub label_lift: f64,
    /// Hover label's resting offset.
    pub hover_label_start: f64,
}

impl PillGeometry {
    /// Measure a pill of `width` × `height` CSS pixels.
    #[must_use]
    pub fn measure(width: f64, height: f64) -> Option<Self> {
        if !width.is_finite() || !height.is_finite() || height <= 0.0 || width < 0.0 {
            return None;
        }
        let half_sq = width * width / 4.0;
        let radius = (half_sq + height * height) / (2.0 * height);
        let diameter = (2.0 * radius).ceil() + 2.0;
        let delta = (radius - (radius * radius - half_sq).max(0.0).sqrt()).ceil() + 1.0;
        Some(Self {
            width,
            height,
            radius,
            diameter,
            delta,
            origin_y: diameter - delta,
            label_lift: -(height + LABEL_LIFT_PX),
            hover_label_start: (height + HOVER_LABEL_DROP_PX).ceil(),
        })
    }

    /// Visual state at hover `progress`, with `ease` applied to each track.
    #[must_use]
    pub fn frame(&self, progress: f64, ease: Ease) -> PillFrame {
        let p = ease.apply(progress);
        PillFrame {
            circle_scale: CIRCLE_SCALE_HOVERED * p,
            label_y: self.label_lift * p,
            hover_label_y: self.hover_label_start * (1.0 - p),
            hover_label_opacity: p,
        }
    }
}

/// Interpolated pill visuals for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PillFrame {
    pub circle_scale: f64,
    pub label_y: f64,
    pub hover_label_y: f64,
    pub hover_label_opacity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typical_pill() {
        let g = PillGeometry::measure(120.0, 40.0).unwrap();
        // R = (3600 + 1600) / 80 = 65
        assert_eq!(g.radius, 65.0);
        assert_eq!(g.diameter, 132.0);
        // sqrt(4225 - 3600) = 25 → delta = ceil(40) + 1
        assert_eq!(g.delta, 41.0);
        assert_eq!(g.origin_y, 91.0);
        assert_eq!(g.label_lift, -48.0);
        assert_eq!(g.hover_label_start, 140.0);
    }

    #[test]
    fn zero_width_pill_is_a_point_circle() {
        let g = PillGeometry::measure(0.0, 10.0).unwrap();
        assert_eq!(g.radius, 5.0);
        assert_eq!(g.diameter, 12.0);
        assert_eq!(g.delta, 1.0);
    }

    #[test]
    fn degenerate_sizes() {
        assert!(PillGeometry::measure(100.0, 0.0).is_none());
        assert!(PillGeometry::measure(-1.0, 10.0).is_none());
        assert!(PillGeometry::measure(f64::NAN, 10.0).is_none());
        assert!(PillGeometry::measure(100.0, f64::INFINITY).is_none());
    }

    #[test]
    fn frame_endpoints() {
        let g = PillGeometry::measure(120.0, 40.0).unwrap();
        let rest = g.frame(0.0, Ease::Power3Out);
        assert_eq!(rest.circle_scale, 0.0);
        assert_eq!(rest.label_y, 0.0);
        assert_eq!(rest.hover_label_y, 140.0);
        assert_eq!(rest.hover_label_opacity, 0.0);

        let hovered = g.frame(1.0, Ease::Power3Out);
        assert_eq!(hovered.circle_scale, CIRCLE_SCALE_HOVERED);
        assert_eq!(hovered.label_y, -48.0);
        assert_eq!(hovered.hover_label_y, 0.0);
        assert_eq!(hovered.hover_label_opacity, 1.0);
    }
}
