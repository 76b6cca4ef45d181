#![forbid(unsafe_code)]

//! Core: ids, geometry sampling, frame gating, timers, configuration, and
//! the logging shim shared by every folio crate.
//!
//! Nothing in this crate touches a DOM. Hosts feed geometry through
//! [`geometry::GeometryProvider`] and time as a monotonic [`Duration`]
//! offset from session start, which keeps every decision deterministic.
//!
//! [`Duration`]: web_time::Duration

pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod id;
pub mod logging;
#[cfg(feature = "serde")]
pub mod serde_millis;
pub mod timer;

pub use config::{FolioConfig, NavConfig, RevealConfig, RevealPolicy, SpyConfig};
pub use error::{FolioError, Result};
pub use geometry::{BoundingBox, GeometryProvider, SectionGeometry, Viewport};
pub use id::{ScopeId, SectionId, TargetId};

// No-op logging macros used when the `tracing` feature is disabled.
// `logging` re-exports either these or the real `tracing` macros.

#[doc(hidden)]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[doc(hidden)]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
