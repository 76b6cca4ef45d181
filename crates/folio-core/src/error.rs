use thiserror::Error;

use crate::id::{ScopeId, SectionId};

pub type Result<T> = std::result::Result<T, FolioError>;

/// Errors reported at registration and configuration call sites.
///
/// Decision code (tracker, scheduler) never produces these; bad geometry
/// degrades to "no change this pass" instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FolioError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("reveal scope not registered: {scope}")]
    UnknownScope { scope: ScopeId },

    #[error("reveal scope already registered: {scope}")]
    DuplicateScope { scope: ScopeId },

    #[error("section not registered: {section}")]
    UnknownSection { section: SectionId },
}

impl FolioError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = FolioError::invalid("reveal.enter_fraction", "must be within [0, 1]");
        assert_eq!(
            err.to_string(),
            "invalid configuration: reveal.enter_fraction must be within [0, 1]"
        );

        let err = FolioError::UnknownScope {
            scope: ScopeId::new("projects"),
        };
        assert_eq!(err.to_string(), "reveal scope not registered: projects");
    }
}
