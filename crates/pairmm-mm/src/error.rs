//! Market making error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MakerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Core error: {0}")]
    Core(#[from] pairmm_core::CoreError),
}

pub type MakerResult<T> = Result<T, MakerError>;
