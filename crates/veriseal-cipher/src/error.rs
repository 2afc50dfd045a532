//! Error types for the cipher module.

use thiserror::Error;
use veriseal_core::ValidationError;

/// Why an authenticated decryption was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// The stored key hash does not match the key derived for this creator.
    #[error("key hash does not match the requesting creator")]
    KeyMismatch,

    /// The GCM tag did not verify (wrong creator, corrupted payload, or wrong IV).
    #[error("authentication tag rejected")]
    TagMismatch,
}

/// Errors that can occur during cipher operations.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Malformed or undersized input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Authentication failed. Never downgrade this to a content mismatch.
    #[error("authentication failure: {0}")]
    AuthenticationFailure(AuthFailure),

    /// The cipher could not be constructed or run.
    #[error("encryption error: {0}")]
    Encryption(String),
}

impl CipherError {
    /// Whether this error is the security-relevant authentication outcome.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CipherError::AuthenticationFailure(_))
    }
}

impl From<AuthFailure> for CipherError {
    fn from(failure: AuthFailure) -> Self {
        CipherError::AuthenticationFailure(failure)
    }
}

/// Result type for cipher operations.
pub type Result<T> = std::result::Result<T, CipherError>;
