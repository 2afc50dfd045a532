//! Error types for Veriseal Core.

use thiserror::Error;

/// Malformed or undersized input handed to a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("creator id must not be empty")]
    EmptyCreatorId,

    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("invalid hex in {field}: {reason}")]
    InvalidHex { field: &'static str, reason: String },

    #[error("payload too short: {len} bytes, need at least {min}")]
    PayloadTooShort { len: usize, min: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
