#![forbid(unsafe_code)]

//! Scroll-spy: decides which section the navigation should highlight.
//!
//! - [`registry`]: sections currently mounted, in navigation order.
//! - [`tracker`]: the pure [`compute_active`] decision and its stateful
//!   wrapper [`SectionTracker`].
//! - [`fast_scroll`]: advisory fast-scroll condition.
//! - [`settle`]: delayed recomputations after registration.

pub mod fast_scroll;
pub mod registry;
pub mod settle;
pub mod tracker;

pub use fast_scroll::FastScrollMonitor;
pub use registry::{Section, SectionRegistry};
pub use settle::SettleSchedule;
pub use tracker::{ProbeRule, SectionSample, SectionTracker, compute_active};
