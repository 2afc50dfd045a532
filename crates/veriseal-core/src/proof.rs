//! Proof records: the immutable link between a creator, a prompt, and an artifact.
//!
//! A proof record carries three hex digests:
//! - `prompt_hash`: SHA-256 of the prompt text
//! - `output_hash`: SHA-256 of the generated artifact bytes
//! - `combined_hash`: SHA-256 of the textual concatenation
//!   `prompt_hash || output_hash || creator_id || created_at`
//!
//! The combined hash is built from the hex and decimal *text* of its fields,
//! never from raw bytes, and the field order is fixed. Persisted records and
//! on-chain proof keys depend on this exact layout.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::hash::hash_hex;

/// An immutable proof record.
///
/// Serialized with camelCase field names, matching records already persisted
/// by the ledger and storage collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    /// SHA-256 of the prompt text (hex).
    pub prompt_hash: String,
    /// SHA-256 of the artifact bytes (hex).
    pub output_hash: String,
    /// Canonical proof identifier (hex).
    pub combined_hash: String,
    /// Creator identifier, as supplied.
    pub creator_id: String,
    /// Creation time, Unix milliseconds.
    pub created_at: i64,
}

impl ProofRecord {
    /// Recompute the combined hash from the other fields and compare.
    pub fn verify(&self) -> bool {
        combined_hash(
            &self.prompt_hash,
            &self.output_hash,
            &self.creator_id,
            self.created_at,
        ) == self.combined_hash
    }

    /// Check whether `output` is the artifact this record was issued for.
    pub fn matches_output(&self, output: &[u8]) -> bool {
        hash_hex(output) == self.output_hash
    }

    /// Check whether `prompt` is the prompt this record was issued for.
    pub fn matches_prompt(&self, prompt: &str) -> bool {
        hash_hex(prompt.as_bytes()) == self.prompt_hash
    }
}

/// Compute the combined hash over the textual fields, in fixed order.
pub fn combined_hash(
    prompt_hash: &str,
    output_hash: &str,
    creator_id: &str,
    created_at: i64,
) -> String {
    let text = format!("{prompt_hash}{output_hash}{creator_id}{created_at}");
    hash_hex(text.as_bytes())
}

/// Produce a proof record for a generated artifact.
///
/// The prompt and the artifact may be empty; the creator id may not.
pub fn generate_proof(
    prompt: &str,
    output: &[u8],
    creator_id: &str,
    created_at: i64,
) -> Result<ProofRecord> {
    if creator_id.is_empty() {
        return Err(ValidationError::EmptyCreatorId);
    }

    let prompt_hash = hash_hex(prompt.as_bytes());
    let output_hash = hash_hex(output);
    let combined = combined_hash(&prompt_hash, &output_hash, creator_id, created_at);

    Ok(ProofRecord {
        prompt_hash,
        output_hash,
        combined_hash: combined,
        creator_id: creator_id.to_string(),
        created_at,
    })
}
