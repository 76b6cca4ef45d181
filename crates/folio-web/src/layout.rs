//! Document-space geometry store.
//!
//! Hosts measure sections and reveal targets once per layout (document
//! coordinates) and report scroll separately. Target bounds are derived
//! relative to the current scroll position on demand, so a scroll never
//! needs a re-measure.

use ahash::AHashMap;
use folio_core::geometry::{BoundingBox, GeometryProvider, SectionGeometry};
use folio_core::id::{SectionId, TargetId};
use serde::{Deserialize, Serialize};

/// A target's measured box in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRect {
    pub top: f64,
    pub height: f64,
    pub width: f64,
}

impl TargetRect {
    #[must_use]
    pub const fn new(top: f64, height: f64, width: f64) -> Self {
        Self { top, height, width }
    }
}

/// Latest known layout of a page.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    sections: AHashMap<SectionId, SectionGeometry>,
    targets: AHashMap<TargetId, TargetRect>,
    scroll_y: f64,
}

impl DocumentLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_section(&mut self, id: SectionId, geometry: SectionGeometry) {
        self.sections.insert(id, geometry);
    }

    pub fn remove_section(&mut self, id: &SectionId) -> bool {
        self.sections.remove(id).is_some()
    }

    pub fn set_target(&mut self, id: TargetId, rect: TargetRect) {
        self.targets.insert(id, rect);
    }

    pub fn remove_target(&mut self, id: TargetId) -> bool {
        self.targets.remove(&id).is_some()
    }

    pub fn set_scroll(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
    }

    #[inline]
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Bottom of the lowest measured section or target.
    #[must_use]
    pub fn document_height(&self) -> f64 {
        let sections = self.sections.values().map(SectionGeometry::bottom);
        let targets = self.targets.values().map(|r| r.top + r.height);
        sections.chain(targets).fold(0.0, f64::max)
    }

    pub fn clear(&mut self) {
        self.sections.clear();
        self.targets.clear();
    }
}

impl GeometryProvider for DocumentLayout {
    fn section_geometry(&self, id: &SectionId) -> Option<SectionGeometry> {
        self.sections.get(id).copied()
    }

    fn target_bounds(&self, id: TargetId) -> Option<BoundingBox> {
        let rect = self.targets.get(&id)?;
        Some(BoundingBox::new(rect.top - self.scroll_y, rect.height, rect.width))
    }
}
