//! Error types for the forensics module.

use thiserror::Error;
use veriseal_core::ValidationError;

/// Errors that can occur during comparison or analysis.
#[derive(Debug, Error)]
pub enum ForensicsError {
    /// Malformed or undersized input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An embedding model failed or produced unusable vectors.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Configuration is malformed or internally inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for forensics operations.
pub type Result<T> = std::result::Result<T, ForensicsError>;
