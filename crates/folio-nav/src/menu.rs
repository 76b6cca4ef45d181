#![forbid(unsafe_code)]

//! Pill navigation state: items, per-pill geometry and hover, and the
//! mobile menu toggle.
//!
//! # Invariants
//!
//! 1. One pill per item, index-aligned with the item list.
//! 2. Laying a pill out again rebuilds its geometry and returns its hover
//!    timeline to rest.
//! 3. Hover calls on a pill that has not been laid out are ignored.
//! 4. Selecting an item closes the mobile menu.

use folio_core::config::NavConfig;
use folio_core::id::SectionId;
use folio_core::logging::trace;
use web_time::Duration;

use crate::hover::{Ease, HoverTimeline};
use crate::link::NavTarget;
use crate::pill::{PillFrame, PillGeometry};

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavItem {
    pub label: String,
    pub target: NavTarget,
}

impl NavItem {
    /// Item for an in-page section, labelled as given and anchored at the
    /// lowercased label.
    #[must_use]
    pub fn section(label: impl Into<String>) -> Self {
        let label = label.into();
        let slug = label.to_lowercase();
        Self {
            label,
            target: NavTarget::Section(SectionId::new(slug)),
        }
    }

    /// Item for an arbitrary `href`; `None` if it is not a link.
    #[must_use]
    pub fn link(label: impl Into<String>, href: &str) -> Option<Self> {
        Some(Self {
            label: label.into(),
            target: NavTarget::parse(href)?,
        })
    }
}

#[derive(Debug, Clone)]
struct Pill {
    geometry: Option<PillGeometry>,
    hover: HoverTimeline,
}

/// The pill navigation bar.
#[derive(Debug, Clone)]
pub struct PillNav {
    items: Vec<NavItem>,
    pills: Vec<Pill>,
    ease: Ease,
    template: HoverTimeline,
    menu_open: bool,
}

impl PillNav {
    #[must_use]
    pub fn new(items: Vec<NavItem>, config: &NavConfig) -> Self {
        let template = HoverTimeline::from_config(config);
        let pills = items
            .iter()
            .map(|_| Pill {
                geometry: None,
                hover: template.clone(),
            })
            .collect();
        Self {
            items,
            pills,
            ease: Ease::default(),
            template,
            menu_open: false,
        }
    }

    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self.template = self.template.with_ease(ease);
        for pill in &mut self.pills {
            pill.hover = self.template.clone();
        }
        self
    }

    #[must_use]
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lay out pill `index` at `width` × `height`. Returns the new geometry,
    /// or `None` for an unknown index or degenerate size.
    pub fn layout(&mut self, index: usize, width: f64, height: f64) -> Option<PillGeometry> {
        let pill = self.pills.get_mut(index)?;
        pill.geometry = PillGeometry::measure(width, height);
        pill.hover.reset();
        trace!(message = "nav.layout", index, width, height);
        pill.geometry
    }

    #[must_use]
    pub fn geometry(&self, index: usize) -> Option<PillGeometry> {
        self.pills.get(index)?.geometry
    }

    pub fn hover_enter(&mut self, index: usize) {
        if let Some(pill) = self.laid_out_mut(index) {
            pill.hover.enter();
        }
    }

    pub fn hover_leave(&mut self, index: usize) {
        if let Some(pill) = self.laid_out_mut(index) {
            pill.hover.leave();
        }
    }

    fn laid_out_mut(&mut self, index: usize) -> Option<&mut Pill> {
        self.pills.get_mut(index).filter(|p| p.geometry.is_some())
    }

    /// Advance every hover timeline.
    pub fn tick(&mut self, dt: Duration) {
        for pill in &mut self.pills {
            pill.hover.tick(dt);
        }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.pills.iter().any(|p| p.hover.is_animating())
    }

    #[must_use]
    pub fn hover_progress(&self, index: usize) -> Option<f64> {
        self.pills.get(index).map(|p| p.hover.progress())
    }

    /// Visuals of pill `index` for the current frame.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<PillFrame> {
        let pill = self.pills.get(index)?;
        Some(pill.geometry?.frame(pill.hover.progress(), self.ease))
    }

    /// Index of the item highlighted for `active`.
    #[must_use]
    pub fn active_index(&self, active: Option<&SectionId>) -> Option<usize> {
        self.items.iter().position(|item| item.target.is_active(active))
    }

    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Flip the mobile menu and return the new state.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Close the mobile menu, e.g. after a link was followed.
    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Activate item `index`. Closes the mobile menu and returns the target
    /// to hand to [`navigate`](crate::link::navigate).
    pub fn select(&mut self, index: usize) -> Option<&NavTarget> {
        let item = self.items.get(index)?;
        self.menu_open = false;
        trace!(message = "nav.select", index, href = %item.target.href());
        Some(&item.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn nav() -> PillNav {
        let items = ["Home", "About", "Projects"]
            .into_iter()
            .map(NavItem::section)
            .collect();
        PillNav::new(items, &NavConfig::default())
    }

    #[test]
    fn section_items_use_lowercase_anchors() {
        let item = NavItem::section("Projects");
        assert_eq!(item.target.href(), "#projects");
        assert_eq!(item.label, "Projects");
        assert!(NavItem::link("Blank", "").is_none());
    }

    #[test]
    fn hover_ignored_before_layout() {
        let mut nav = nav();
        nav.hover_enter(0);
        assert!(!nav.is_animating());
        assert_eq!(nav.frame(0), None);
        assert_eq!(nav.layout(7, 100.0, 40.0), None);
    }

    #[test]
    fn hover_runs_and_relayout_resets() {
        let mut nav = nav();
        nav.layout(1, 120.0, 40.0).unwrap();
        nav.hover_enter(1);
        nav.tick(ms(300));
        assert_eq!(nav.hover_progress(1), Some(1.0));
        assert_eq!(nav.frame(1).unwrap().label_y, -48.0);

        nav.layout(1, 130.0, 40.0).unwrap();
        assert_eq!(nav.hover_progress(1), Some(0.0));
        assert_eq!(nav.frame(1).unwrap().circle_scale, 0.0);
    }

    #[test]
    fn active_index_follows_section() {
        let nav = nav();
        assert_eq!(nav.active_index(Some(&SectionId::new("about"))), Some(1));
        assert_eq!(nav.active_index(Some(&SectionId::new("blog"))), None);
        assert_eq!(nav.active_index(None), None);
    }

    #[test]
    fn menu_toggle() {
        let mut nav = nav();
        assert!(nav.toggle_menu());
        assert!(nav.is_menu_open());
        nav.close_menu();
        assert!(nav.toggle_menu());
    }

    #[test]
    fn selecting_an_item_closes_the_menu() {
        let mut nav = nav();
        nav.toggle_menu();
        assert_eq!(nav.select(9), None);
        assert!(nav.is_menu_open());

        let target = nav.select(2).cloned();
        assert_eq!(target, Some(NavTarget::Section(SectionId::new("projects"))));
        assert!(!nav.is_menu_open());
    }
}
