//! Collaborator traits: the abstract interfaces for proof records and blobs.
//!
//! The forensic and cipher crates never touch storage. Callers fetch and
//! persist bytes through these traits, so any ledger (on-chain or not) and
//! any content-addressed store can sit behind a pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use veriseal_core::{ContentLocator, ProofRecord};

use crate::error::Result;

/// What the ledger remembers about a sealed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub creator_id: String,
    /// Unix ms.
    pub created_at: i64,
    pub content_locator: ContentLocator,
    /// SHA-256 hex of the plaintext artifact, when the ledger keeps it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_hash: Option<String>,
}

impl LedgerEntry {
    /// Build the entry for a freshly generated proof.
    pub fn for_proof(proof: &ProofRecord, content_locator: ContentLocator) -> Self {
        Self {
            creator_id: proof.creator_id.clone(),
            created_at: proof.created_at,
            content_locator,
            output_hash: Some(proof.output_hash.clone()),
        }
    }
}

/// Proof ledger keyed by combined hash.
///
/// # Design Notes
///
/// - **Idempotent records**: Recording an identical entry twice succeeds.
/// - **Immutable keys**: Recording a different entry under an existing hash
///   fails with `AlreadyExists`.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Record `entry` under `combined_hash`.
    async fn record(&self, combined_hash: &str, entry: LedgerEntry) -> Result<()>;

    /// Look up the entry recorded under `combined_hash`.
    async fn lookup(&self, combined_hash: &str) -> Result<Option<LedgerEntry>>;

    /// Check whether anything is recorded under `combined_hash`.
    async fn contains(&self, combined_hash: &str) -> Result<bool> {
        Ok(self.lookup(combined_hash).await?.is_some())
    }
}

/// Opaque blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes`, returning their locator.
    async fn put(&self, bytes: &[u8]) -> Result<ContentLocator>;

    /// Fetch the bytes behind `locator`.
    async fn get(&self, locator: &ContentLocator) -> Result<Option<Vec<u8>>>;

    /// Check whether `locator` resolves.
    async fn contains(&self, locator: &ContentLocator) -> Result<bool> {
        Ok(self.get(locator).await?.is_some())
    }
}

/// Extension trait for common ledger patterns.
pub trait LedgerExt: Ledger {
    /// Record a proof and the locator of its encrypted content.
    ///
    /// Returns the recorded entry.
    fn record_proof(
        &self,
        proof: &ProofRecord,
        locator: ContentLocator,
    ) -> impl std::future::Future<Output = Result<LedgerEntry>> + Send;
}

impl<L: Ledger + ?Sized> LedgerExt for L {
    async fn record_proof(
        &self,
        proof: &ProofRecord,
        locator: ContentLocator,
    ) -> Result<LedgerEntry> {
        let entry = LedgerEntry::for_proof(proof, locator);
        self.record(&proof.combined_hash, entry.clone()).await?;
        Ok(entry)
    }
}
