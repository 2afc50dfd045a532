//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during ledger or blob operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record or object under the given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// A different record already exists under the given key.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The backing service failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// Record serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
