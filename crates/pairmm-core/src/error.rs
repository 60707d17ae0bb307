//! Error types for pairmm-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid instrument id: {0}")]
    InvalidInstrument(String),

    #[error("Snapshot parse error: {0}")]
    SnapshotParse(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
