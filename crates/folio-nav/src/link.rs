//! Navigation link targets.
//!
//! Links come in three kinds: in-page section anchors (`#about`), client-side
//! routes (`/blog`), and external URLs. Section anchors scroll the document
//! so the section's top lands just below the fixed navigation bar.

use folio_core::geometry::GeometryProvider;
use folio_core::id::SectionId;
use folio_core::logging::debug;
use web_time::Duration;

use crate::hover::Ease;

/// Duration of the smooth scroll to an anchored section.
pub const SCROLL_DURATION: Duration = Duration::from_secs(1);

/// Ease of the smooth scroll to an anchored section.
pub const SCROLL_EASE: Ease = Ease::Power2Out;

const EXTERNAL_PREFIXES: [&str; 5] = ["http://", "https://", "//", "mailto:", "tel:"];

/// What a navigation link points at.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "to", rename_all = "snake_case"))]
pub enum NavTarget {
    Section(SectionId),
    Route(String),
    External(String),
}

impl NavTarget {
    /// Classify an `href`. Empty hrefs and a bare `#` are not links.
    #[must_use]
    pub fn parse(href: &str) -> Option<Self> {
        let href = href.trim();
        if let Some(slug) = href.strip_prefix('#') {
            return (!slug.is_empty()).then(|| Self::Section(SectionId::new(slug)));
        }
        if href.is_empty() {
            return None;
        }
        if EXTERNAL_PREFIXES.iter().any(|p| href.starts_with(p)) {
            Some(Self::External(href.to_owned()))
        } else {
            Some(Self::Route(href.to_owned()))
        }
    }

    /// The `href` this target renders as.
    #[must_use]
    pub fn href(&self) -> String {
        match self {
            Self::Section(id) => active_href(id),
            Self::Route(path) | Self::External(path) => path.clone(),
        }
    }

    /// Whether this link is the one to highlight for `active`.
    #[must_use]
    pub fn is_active(&self, active: Option<&SectionId>) -> bool {
        matches!((self, active), (Self::Section(id), Some(a)) if id == a)
    }
}

/// Link `href` matching an active section.
#[must_use]
pub fn active_href(section: &SectionId) -> String {
    format!("#{section}")
}

/// Scroll offset that puts a section's top just below the navigation bar.
#[must_use]
pub fn scroll_target(section_top: f64, nav_height: f64) -> f64 {
    (section_top - nav_height).max(0.0)
}

/// Host side of navigation.
pub trait Navigator {
    /// Smoothly scroll the document to `y`.
    fn scroll_to(&mut self, y: f64, duration: Duration, ease: Ease);

    /// Hand a client-side route to the router.
    fn route(&mut self, path: &str);

    /// Leave the page.
    fn open(&mut self, url: &str);
}

/// Perform a link activation.
///
/// Returns `false` when a section anchor names a section with no usable
/// geometry; nothing is dispatched in that case.
pub fn navigate<G, N>(target: &NavTarget, geometry: &G, nav_height: f64, navigator: &mut N) -> bool
where
    G: GeometryProvider + ?Sized,
    N: Navigator + ?Sized,
{
    match target {
        NavTarget::Section(id) => {
            let Some(g) = geometry.section_geometry(id).filter(|g| !g.is_degenerate()) else {
                debug!(message = "nav.skip", section = %id);
                return false;
            };
            let y = scroll_target(g.top, nav_height);
            debug!(message = "nav.scroll", section = %id, y);
            navigator.scroll_to(y, SCROLL_DURATION, SCROLL_EASE);
        }
        NavTarget::Route(path) => navigator.route(path),
        NavTarget::External(url) => navigator.open(url),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::geometry::{BoundingBox, SectionGeometry};
    use folio_core::id::TargetId;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Navigator for Recorder {
        fn scroll_to(&mut self, y: f64, duration: Duration, ease: Ease) {
            self.0.push(format!("scroll {y} {}ms {ease}", duration.as_millis()));
        }

        fn route(&mut self, path: &str) {
            self.0.push(format!("route {path}"));
        }

        fn open(&mut self, url: &str) {
            self.0.push(format!("open {url}"));
        }
    }

    struct OneSection;

    impl GeometryProvider for OneSection {
        fn section_geometry(&self, id: &SectionId) -> Option<SectionGeometry> {
            (id.as_str() == "about").then(|| SectionGeometry::new(1000.0, 800.0))
        }

        fn target_bounds(&self, _id: TargetId) -> Option<BoundingBox> {
            None
        }
    }

    #[test]
    fn parse_kinds() {
        assert_eq!(NavTarget::parse("#about"), Some(NavTarget::Section(SectionId::new("about"))));
        assert_eq!(NavTarget::parse("/blog"), Some(NavTarget::Route("/blog".into())));
        assert_eq!(NavTarget::parse("blog"), Some(NavTarget::Route("blog".into())));
        for url in ["https://x.dev", "http://x.dev", "//cdn.x.dev", "mailto:a@b.c", "tel:+1"] {
            assert_eq!(NavTarget::parse(url), Some(NavTarget::External(url.into())));
        }
        assert_eq!(NavTarget::parse(""), None);
        assert_eq!(NavTarget::parse("#"), None);
    }

    #[test]
    fn href_and_active() {
        let about = SectionId::new("about");
        let link = NavTarget::parse("#about").unwrap();
        assert_eq!(link.href(), "#about");
        assert_eq!(active_href(&about), "#about");
        assert!(link.is_active(Some(&about)));
        assert!(!link.is_active(None));
        assert!(!NavTarget::Route("/about".into()).is_active(Some(&about)));
    }

    #[test]
    fn scroll_target_clamps_at_top() {
        assert_eq!(scroll_target(1000.0, 80.0), 920.0);
        assert_eq!(scroll_target(40.0, 80.0), 0.0);
    }

    #[test]
    fn navigate_dispatches() {
        let mut nav = Recorder::default();
        assert!(navigate(&NavTarget::parse("#about").unwrap(), &OneSection, 80.0, &mut nav));
        assert!(!navigate(&NavTarget::parse("#missing").unwrap(), &OneSection, 80.0, &mut nav));
        assert!(navigate(&NavTarget::parse("/blog").unwrap(), &OneSection, 80.0, &mut nav));
        assert!(navigate(&NavTarget::parse("mailto:me@x.dev").unwrap(), &OneSection, 80.0, &mut nav));
        assert_eq!(
            nav.0,
            ["scroll 920 1000ms power2.out", "route /blog", "open mailto:me@x.dev"]
        );
    }
}
