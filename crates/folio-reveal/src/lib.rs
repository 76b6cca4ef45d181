#![forbid(unsafe_code)]

//! Reveal scheduling for scroll-triggered content blocks.
//!
//! Each registered target is either pending or revealed. The scheduler
//! turns viewport-relative geometry and session time into
//! [`RevealEvent`]s; playing the matching animation is the host's job.
//!
//! ```
//! use folio_core::{BoundingBox, ScopeId, TargetId};
//! use folio_reveal::{RevealScheduler, RevealState};
//! use web_time::Duration;
//!
//! let mut reveal = RevealScheduler::default();
//! let scope = ScopeId::new("about");
//! reveal.register_scope(scope.clone(), None).unwrap();
//! reveal.register_target(&scope, TargetId(1)).unwrap();
//!
//! let bounds = Some(BoundingBox::new(400.0, 300.0, 800.0));
//! let event = reveal.evaluate(TargetId(1), bounds, 900.0, Duration::ZERO).unwrap();
//! assert_eq!(event.state, RevealState::Revealed);
//! ```

pub mod event;
pub mod scheduler;
pub mod scope;
pub mod target;

pub use event::{RevealEvent, Transition};
pub use scheduler::{RevealScheduler, RevealStats};
pub use scope::{RevealScope, ScopeOptions};
pub use target::{Eligibility, RevealState, RevealTarget, eligibility};
