#![forbid(unsafe_code)]

//! Scenario replay for folio.
//!
//! Scenarios script a page session; [`replay`] runs one against a
//! [`ScrollSession`](folio_web::ScrollSession) and returns every output,
//! optionally streaming them to a JSONL [`TraceRecorder`]. The
//! `folio-replay` binary wraps this for the command line.

pub mod cli;
pub mod error;
pub mod replay;
pub mod scenario;
pub mod trace;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use replay::{ReplayReport, replay, replay_with, trace_header};
pub use scenario::{Action, Scenario, ScopeSpec, SectionSpec, Step, TargetSpec};
pub use trace::{TraceHeader, TraceRecord, TraceRecorder, TraceSummary};
