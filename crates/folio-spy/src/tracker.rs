#![forbid(unsafe_code)]

//! Active-section detection.
//!
//! A probe point sits a fixed fraction down the viewport (one third by
//! default). Every section owns an activation window widened by a tolerance
//! on both edges, so adjacent windows overlap instead of leaving gaps. The
//! first section in navigation order whose window contains the probe is the
//! active one; in an overlap the earlier section wins.
//!
//! ```text
//!   probe  = scroll_y + viewport_height * probe_fraction
//!   window = [top - tolerance, top + height + tolerance)
//! ```
//!
//! # Invariants
//!
//! 1. The result is always a section from the supplied list (or `None`).
//! 2. Once a section has been active, the result is never `None` while at
//!    least one section is registered.
//! 3. If no window contains the probe, the previous active section is kept.
//!    If that section is gone, the section whose window is nearest to the
//!    probe takes over.
//!
//! # Failure Modes
//!
//! - Missing or degenerate geometry: the section is skipped for this pass.
//! - Degenerate viewport: no change.

use folio_core::config::SpyConfig;
use folio_core::geometry::{GeometryProvider, SectionGeometry, Viewport};
use folio_core::id::SectionId;
use folio_core::logging::{debug, trace};

use crate::registry::SectionRegistry;

/// Probe placement and window widening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRule {
    pub probe_fraction: f64,
    pub tolerance: f64,
}

impl Default for ProbeRule {
    fn default() -> Self {
        Self::from(&SpyConfig::default())
    }
}

impl From<&SpyConfig> for ProbeRule {
    fn from(config: &SpyConfig) -> Self {
        Self {
            probe_fraction: config.probe_fraction,
            tolerance: config.tolerance_px,
        }
    }
}

/// A section id paired with its freshly sampled geometry.
#[derive(Debug, Clone, Copy)]
pub struct SectionSample<'a> {
    pub id: &'a SectionId,
    pub geometry: Option<SectionGeometry>,
}

impl<'a> SectionSample<'a> {
    #[must_use]
    pub fn new(id: &'a SectionId, geometry: Option<SectionGeometry>) -> Self {
        Self { id, geometry }
    }

    fn usable(&self) -> Option<SectionGeometry> {
        self.geometry.filter(|g| !g.is_degenerate())
    }
}

/// Decide the active section.
///
/// `sections` must be in ascending navigation order. `last_active` is the
/// previous result (or `None` before the first successful computation).
#[must_use]
pub fn compute_active<'a>(
    scroll_y: f64,
    viewport_height: f64,
    sections: &[SectionSample<'a>],
    rule: ProbeRule,
    last_active: Option<&SectionId>,
) -> Option<&'a SectionId> {
    let kept = last_active.and_then(|last| sections.iter().find(|s| s.id == last).map(|s| s.id));

    let viewport = Viewport::new(scroll_y, viewport_height);
    if viewport.is_degenerate() {
        return kept.or_else(|| last_active.and_then(|_| sections.first().map(|s| s.id)));
    }
    let probe = viewport.clamped().probe(rule.probe_fraction);

    for sample in sections {
        let Some(geometry) = sample.usable() else {
            continue;
        };
        let (top, bottom) = geometry.widened(rule.tolerance);
        if probe >= top && probe < bottom {
            return Some(sample.id);
        }
    }

    if kept.is_some() || last_active.is_none() {
        return kept;
    }

    // The previous section was deregistered and nothing contains the probe.
    nearest(probe, sections, rule.tolerance).or_else(|| sections.first().map(|s| s.id))
}

fn nearest<'a>(probe: f64, sections: &[SectionSample<'a>], tolerance: f64) -> Option<&'a SectionId> {
    let mut best: Option<(f64, &'a SectionId)> = None;
    for sample in sections {
        let Some(geometry) = sample.usable() else {
            continue;
        };
        let (top, bottom) = geometry.widened(tolerance);
        let distance = if probe < top { top - probe } else { probe - bottom };
        // Strict comparison keeps the earlier section on ties.
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, sample.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Stateful wrapper that samples geometry and remembers the last result.
#[derive(Debug, Clone, Default)]
pub struct SectionTracker {
    rule: ProbeRule,
    active: Option<SectionId>,
    computations: u64,
    changes: u64,
}

impl SectionTracker {
    #[must_use]
    pub fn new(rule: ProbeRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_config(config: &SpyConfig) -> Self {
        Self::new(ProbeRule::from(config))
    }

    /// Currently active section, `None` before initialization.
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn rule(&self) -> ProbeRule {
        self.rule
    }

    /// Number of recomputations performed.
    #[inline]
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Number of times the active section changed.
    #[inline]
    #[must_use]
    pub fn changes(&self) -> u64 {
        self.changes
    }

    /// Forget the active section (session teardown).
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Recompute against fresh geometry.
    ///
    /// Returns the new active id when it changed.
    pub fn update<G: GeometryProvider + ?Sized>(
        &mut self,
        viewport: Viewport,
        registry: &SectionRegistry,
        geometry: &G,
    ) -> Option<SectionId> {
        self.computations += 1;
        let samples: Vec<SectionSample<'_>> = registry
            .ids()
            .map(|id| {
                let sampled = geometry.section_geometry(id);
                if sampled.is_none_or(|g| g.is_degenerate()) {
                    trace!(message = "spy.skip", section = %id, missing = sampled.is_none());
                }
                SectionSample::new(id, sampled)
            })
            .collect();

        let next = compute_active(
            viewport.scroll_y,
            viewport.height,
            &samples,
            self.rule,
            self.active.as_ref(),
        )
        .cloned();

        if next == self.active {
            return None;
        }
        debug!(
            message = "spy.active",
            from = ?self.active.as_ref().map(SectionId::as_str),
            to = ?next.as_ref().map(SectionId::as_str),
            scroll_y = viewport.scroll_y,
        );
        self.active = next.clone();
        self.changes += 1;
        next
    }
}
