#![forbid(unsafe_code)]

//! Registry of navigable sections.
//!
//! Owned by the rendering session; the tracker only reads it. Sections are
//! kept sorted by `order` (ties broken by registration sequence) so a
//! linear scan visits them in navigation order.
//!
//! # Invariants
//!
//! 1. Section ids are unique; re-registering an id replaces its order.
//! 2. Iteration order is ascending `order`, then registration sequence.
//! 3. `generation()` increases on every membership change.

use folio_core::id::SectionId;

/// One registered section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub order: u32,
    seq: u64,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, order: u32) -> Self {
        Self {
            id: id.into(),
            order,
            seq: 0,
        }
    }
}

/// Sections currently mounted on the page.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: Vec<Section>,
    next_seq: u64,
    generation: u64,
}

impl SectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from slugs in navigation order (`order` = index).
    #[must_use]
    pub fn from_slugs<S: AsRef<str>>(slugs: impl IntoIterator<Item = S>) -> Self {
        let mut registry = Self::new();
        for (order, slug) in slugs.into_iter().enumerate() {
            registry.register(Section::new(SectionId::new(slug), order as u32));
        }
        registry
    }

    /// Register (or re-register) a section.
    ///
    /// Returns `true` if the id was new.
    pub fn register(&mut self, mut section: Section) -> bool {
        let existed = self.remove_entry(&section.id);
        section.seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .sections
            .partition_point(|s| (s.order, s.seq) <= (section.order, section.seq));
        self.sections.insert(at, section);
        self.generation += 1;
        !existed
    }

    /// Deregister a section. Returns `true` if it was registered.
    pub fn deregister(&mut self, id: &SectionId) -> bool {
        let removed = self.remove_entry(id);
        if removed {
            self.generation += 1;
        }
        removed
    }

    fn remove_entry(&mut self, id: &SectionId) -> bool {
        let len_before = self.sections.len();
        self.sections.retain(|s| &s.id != id);
        self.sections.len() < len_before
    }

    /// Remove every section.
    pub fn clear(&mut self) {
        if !self.sections.is_empty() {
            self.sections.clear();
            self.generation += 1;
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.sections.iter().any(|s| &s.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Position of a section in navigation order.
    #[must_use]
    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|s| &s.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(r: &SectionRegistry) -> Vec<&str> {
        r.ids().map(SectionId::as_str).collect()
    }

    #[test]
    fn keeps_navigation_order() {
        let mut r = SectionRegistry::new();
        r.register(Section::new("skills", 3));
        r.register(Section::new("home", 0));
        r.register(Section::new("projects", 2));
        r.register(Section::new("about", 1));
        assert_eq!(ids(&r), ["home", "about", "projects", "skills"]);
        assert_eq!(r.position(&"projects".into()), Some(2));
    }

    #[test]
    fn equal_orders_keep_registration_sequence() {
        let mut r = SectionRegistry::new();
        r.register(Section::new("b", 1));
        r.register(Section::new("a", 1));
        assert_eq!(ids(&r), ["b", "a"]);
    }

    #[test]
    fn reregister_replaces() {
        let mut r = SectionRegistry::from_slugs(["home", "about", "contact"]);
        assert!(!r.register(Section::new("home", 9)));
        assert_eq!(r.len(), 3);
        assert_eq!(ids(&r), ["about", "contact", "home"]);
    }

    #[test]
    fn deregister_bumps_generation() {
        let mut r = SectionRegistry::from_slugs(["home", "about"]);
        let g = r.generation();
        assert!(r.deregister(&"home".into()));
        assert!(r.generation() > g);
        let g = r.generation();
        assert!(!r.deregister(&"home".into()));
        assert_eq!(r.generation(), g);
        assert!(!r.contains(&"home".into()));
    }
}
