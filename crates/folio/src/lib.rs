#![forbid(unsafe_code)]

//! folio public facade crate.
//!
//! Re-exports the section tracker, reveal scheduler and navigation
//! state under one roof. The `web` feature (on by default) adds the
//! session that wires them to browser signals.

pub use folio_core as core;
pub use folio_nav as nav;
pub use folio_reveal as reveal;
pub use folio_spy as spy;
#[cfg(feature = "web")]
pub use folio_web as web;

pub mod prelude {
    pub use folio_core::{
        BoundingBox, FolioConfig, FolioError, GeometryProvider, ScopeId, SectionGeometry, SectionId,
        TargetId, Viewport,
    };
    pub use folio_nav::{CardFocus, NavItem, NavTarget, Navigator, PillNav};
    pub use folio_reveal::{RevealEvent, RevealScheduler, RevealState, ScopeOptions, Transition};
    pub use folio_spy::SectionTracker;
    #[cfg(feature = "web")]
    pub use folio_web::{DocumentLayout, ScrollSession, SessionOutput};
}
