use std::path::PathBuf;

use flicker_core::{InvalidRegionError, UnorderedTraceError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnorderedTrace(#[from] UnorderedTraceError),

    #[error(transparent)]
    InvalidRegion(#[from] InvalidRegionError),

    #[error("capture file not found: {path}")]
    MissingCapture { path: PathBuf },

    #[error("capture belongs to session {actual}, expected {expected}")]
    SessionMismatch { expected: String, actual: String },

    #[error("first snapshot does not report display bounds")]
    MissingDisplayBounds,

    #[error("unknown scenario: {name}")]
    UnknownScenario { name: String },

    #[error("unknown run configuration: {name}")]
    UnknownConfig { name: String },

    #[error("suite {suite} failed: {failed} blocking case(s) under {config}")]
    SuiteFailed {
        suite: String,
        config: String,
        failed: usize,
    },
}

impl HarnessError {
    /// Process exit code: 2 for assertion failures, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SuiteFailed { .. } => 2,
            _ => 1,
        }
    }
}
