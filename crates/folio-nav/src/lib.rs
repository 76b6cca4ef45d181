#![forbid(unsafe_code)]

//! Pill navigation for folio: mask geometry, hover timelines, link
//! targets, and project-card hover focus.
//!
//! Nothing here draws. [`PillNav`] tracks per-pill geometry and hover
//! progress and answers "what does pill *i* look like now"; [`navigate`]
//! turns a link activation into a call on a host [`Navigator`].

pub mod focus;
pub mod hover;
pub mod link;
pub mod menu;
pub mod pill;

pub use focus::{CardFocus, CardPose};
pub use hover::{Ease, HoverTimeline};
pub use link::{NavTarget, Navigator, active_href, navigate, scroll_target};
pub use menu::{NavItem, PillNav};
pub use pill::{PillFrame, PillGeometry};
