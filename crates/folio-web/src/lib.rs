#![forbid(unsafe_code)]

//! Session runtime for folio.
//!
//! [`ScrollSession`] adapts host events to the scroll-spy and reveal
//! components. On `wasm32` the crate additionally exports `FolioRunner`, a
//! `wasm-bindgen` wrapper that takes measured rects and returns outputs as
//! JSON.

pub mod layout;
pub mod session;

pub use layout::{DocumentLayout, TargetRect};
pub use session::{ScrollSession, SessionOutput, SessionStats};

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
