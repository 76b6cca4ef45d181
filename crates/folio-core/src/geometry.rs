#![forbid(unsafe_code)]

//! Geometry samples and the provider trait that supplies them.
//!
//! All values are CSS pixels as `f64`. Section geometry is measured in
//! document coordinates (distance from the top of the page); target bounds
//! are measured relative to the top of the viewport, the way a bounding
//! client rect is.
//!
//! # Degenerate samples
//!
//! Layout is briefly inconsistent while fonts and images load. A sample with
//! non-finite values, a non-positive extent, or (for sections) a negative
//! document offset is *degenerate*: consumers treat it as "not yet
//! eligible" and skip it for the current pass.

use crate::id::{SectionId, TargetId};

/// Document-space geometry of a section, sampled on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionGeometry {
    /// Distance from the document top to the section's top edge.
    pub top: f64,
    /// Section height.
    pub height: f64,
}

impl SectionGeometry {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.top.is_finite() || !self.height.is_finite() || self.height <= 0.0 || self.top < 0.0
    }

    /// Half-open activation window `[top - tolerance, bottom + tolerance)`.
    #[inline]
    #[must_use]
    pub fn widened(&self, tolerance: f64) -> (f64, f64) {
        (self.top - tolerance, self.bottom() + tolerance)
    }
}

/// Viewport-relative bounding box of a reveal target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Distance from the viewport top to the box's top edge (negative once
    /// the box has scrolled past the top).
    pub top: f64,
    pub height: f64,
    pub width: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(top: f64, height: f64, width: f64) -> Self {
        Self { top, height, width }
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.top.is_finite()
            || !self.height.is_finite()
            || !self.width.is_finite()
            || self.height <= 0.0
            || self.width <= 0.0
    }
}

/// One scroll/resize sample of the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Vertical scroll offset of the document.
    pub scroll_y: f64,
    /// Inner height of the viewport.
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !self.scroll_y.is_finite() || !self.height.is_finite() || self.height <= 0.0
    }

    /// Copy with elastic overscroll (negative `scroll_y`) clamped to zero.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            scroll_y: self.scroll_y.max(0.0),
            height: self.height,
        }
    }

    /// Document-space point located `fraction` of the way down the viewport.
    #[inline]
    #[must_use]
    pub fn probe(&self, fraction: f64) -> f64 {
        self.scroll_y + self.height * fraction
    }

    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }
}

/// Synchronous layout oracle.
///
/// Returns `None` for nodes that are not (or no longer) mounted; callers
/// skip those silently.
pub trait GeometryProvider {
    /// Current document-space geometry of a section.
    fn section_geometry(&self, id: &SectionId) -> Option<SectionGeometry>;

    /// Current viewport-relative bounds of a reveal target.
    fn target_bounds(&self, id: TargetId) -> Option<BoundingBox>;
}

impl<T: GeometryProvider + ?Sized> GeometryProvider for &T {
    fn section_geometry(&self, id: &SectionId) -> Option<SectionGeometry> {
        (**self).section_geometry(id)
    }

    fn target_bounds(&self, id: TargetId) -> Option<BoundingBox> {
        (**self).target_bounds(id)
    }
}
