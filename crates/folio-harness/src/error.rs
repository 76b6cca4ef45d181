use std::path::PathBuf;

use folio_core::FolioError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Folio(#[from] FolioError),

    #[error("scenario not found: {path}")]
    MissingScenario { path: PathBuf },

    #[error("invalid scenario: {message}")]
    InvalidScenario { message: String },
}

impl HarnessError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingScenario { .. } => 2,
            Self::InvalidScenario { .. } | Self::Folio(_) => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }
}
