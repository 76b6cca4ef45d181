//! Logging shim.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported
//! here; without it the same names resolve to no-op macros so call sites
//! stay free of `cfg` attributes:
//!
//! ```
//! use folio_core::logging::debug;
//!
//! debug!(message = "spy.active", section = "home");
//! ```
//!
//! Messages follow a `component.event` naming scheme (`spy.active`,
//! `reveal.enter`, `session.frame`).

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, info, trace, warn};

/// Install a global `tracing` subscriber that honours `RUST_LOG`.
///
/// When `json` is true, events are emitted as one JSON object per line.
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_subscriber(json: bool) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
