//! Error types for CineFlow.

use thiserror::Error;

/// Main error type for CineFlow operations.
#[derive(Error, Debug)]
pub enum CineFlowError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for CineFlow operations.
pub type Result<T> = std::result::Result<T, CineFlowError>;
