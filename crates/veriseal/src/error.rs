//! Error types for the Veriseal facade.

use thiserror::Error;
use veriseal_cipher::CipherError;
use veriseal_core::ValidationError;
use veriseal_forensics::ForensicsError;
use veriseal_store::StoreError;

/// Errors that can occur during pipeline operations.
#[derive(Debug, Error)]
pub enum VerisealError {
    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Encryption or authentication error.
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Comparison or analysis error.
    #[error("forensics error: {0}")]
    Forensics(#[from] ForensicsError),

    /// Ledger or blob store error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// No ledger record under this combined hash.
    #[error("proof not found: {0}")]
    ProofNotFound(String),

    /// The ledger points at content the blob store cannot produce.
    #[error("content missing: {0}")]
    ContentMissing(String),

    /// Decrypted content does not hash to the recorded output hash.
    #[error("integrity mismatch: {0}")]
    IntegrityMismatch(String),
}

impl VerisealError {
    /// Whether this is the security-relevant authentication outcome.
    ///
    /// Callers must report it as such, never as low similarity.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, VerisealError::Cipher(e) if e.is_authentication_failure())
    }
}

/// Result type for Veriseal operations.
pub type Result<T> = std::result::Result<T, VerisealError>;
