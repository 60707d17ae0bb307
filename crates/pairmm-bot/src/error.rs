//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Maker error: {0}")]
    Maker(#[from] pairmm_mm::MakerError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] pairmm_telemetry::TelemetryError),

    #[error("Snapshot error at line {line}: {source}")]
    Snapshot {
        line: usize,
        #[source]
        source: pairmm_core::CoreError,
    },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
