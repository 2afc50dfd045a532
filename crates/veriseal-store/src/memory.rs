//! In-memory implementations of the collaborator traits.
//!
//! Primarily for tests and local pipelines. Same semantics as a real ledger
//! and content-addressed store, with nothing persisted.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use veriseal_core::{hash_hex, ContentLocator};

use crate::error::{Result, StoreError};
use crate::traits::{BlobStore, Ledger, LedgerEntry};

/// Prefix of locators handed out by [`MemoryBlobStore`].
pub const LOCATOR_PREFIX: &str = "sha256-";

/// In-memory ledger.
///
/// All data is lost when the ledger is dropped.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: RwLock<BTreeMap<String, LedgerEntry>>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Serialize every entry to JSON, keyed by combined hash.
    pub async fn export_json(&self) -> Result<String> {
        let entries = self.entries.read().await;
        Ok(serde_json::to_string(&*entries)?)
    }

    /// Rebuild a ledger from [`export_json`](Self::export_json) output.
    pub fn import_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, LedgerEntry> = serde_json::from_str(json)?;
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn record(&self, combined_hash: &str, entry: LedgerEntry) -> Result<()> {
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.get(combined_hash) {
            if *existing == entry {
                return Ok(());
            }
            return Err(StoreError::AlreadyExists(combined_hash.to_string()));
        }

        debug!(combined_hash, creator_id = %entry.creator_id, "ledger record");
        entries.insert(combined_hash.to_string(), entry);
        Ok(())
    }

    async fn lookup(&self, combined_hash: &str) -> Result<Option<LedgerEntry>> {
        Ok(self.entries.read().await.get(combined_hash).cloned())
    }
}

/// In-memory content-addressed blob store.
///
/// Locators are `sha256-<hex>` of the stored bytes, so storing the same
/// bytes twice yields the same locator.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<ContentLocator, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create a new empty blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locator the store assigns to `bytes`.
    pub fn locator_for(bytes: &[u8]) -> ContentLocator {
        ContentLocator::new(format!("{LOCATOR_PREFIX}{}", hash_hex(bytes)))
    }

    /// Replace the bytes behind `locator` without changing the locator.
    ///
    /// Simulates a backend that does not verify content addresses.
    pub async fn overwrite(&self, locator: &ContentLocator, bytes: Vec<u8>) -> Result<()> {
        let mut blobs = self.blobs.write().await;
        match blobs.get_mut(locator) {
            Some(slot) => {
                *slot = bytes;
                Ok(())
            }
            None => Err(StoreError::NotFound(locator.to_string())),
        }
    }

    /// Drop the bytes behind `locator`.
    pub async fn remove(&self, locator: &ContentLocator) -> bool {
        self.blobs.write().await.remove(locator).is_some()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<ContentLocator> {
        let locator = Self::locator_for(bytes);
        let mut blobs = self.blobs.write().await;
        if !blobs.contains_key(&locator) {
            debug!(%locator, len = bytes.len(), "blob stored");
            blobs.insert(locator.clone(), bytes.to_vec());
        }
        Ok(locator)
    }

    async fn get(&self, locator: &ContentLocator) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(locator).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::LedgerExt;
    use veriseal_core::generate_proof;

    fn entry(creator: &str, at: i64) -> LedgerEntry {
        LedgerEntry {
            creator_id: creator.to_string(),
            created_at: at,
            content_locator: ContentLocator::new("sha256-00"),
            output_hash: None,
        }
    }

    #[tokio::test]
    async fn test_record_and_lookup() {
        let ledger = MemoryLedger::new();
        ledger.record("abc", entry("alice", 1)).await.unwrap();

        let found = ledger.lookup("abc").await.unwrap().unwrap();
        assert_eq!(found.creator_id, "alice");
        assert!(ledger.contains("abc").await.unwrap());
        assert!(ledger.lookup("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_is_idempotent() {
        let ledger = MemoryLedger::new();
        ledger.record("abc", entry("alice", 1)).await.unwrap();
        ledger.record("abc", entry("alice", 1)).await.unwrap();
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_record_conflict() {
        let ledger = MemoryLedger::new();
        ledger.record("abc", entry("alice", 1)).await.unwrap();

        let err = ledger.record("abc", entry("mallory", 1)).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(ref h) if h == "abc"));
        assert_eq!(ledger.lookup("abc").await.unwrap().unwrap().creator_id, "alice");
    }

    #[tokio::test]
    async fn test_record_proof() {
        let ledger = MemoryLedger::new();
        let proof = generate_proof("prompt", b"output", "alice", 42).unwrap();
        let locator = ContentLocator::new("sha256-feed");

        let recorded = ledger.record_proof(&proof, locator.clone()).await.unwrap();
        let found = ledger.lookup(&proof.combined_hash).await.unwrap().unwrap();
        assert_eq!(found, recorded);
        assert_eq!(found.content_locator, locator);
        assert_eq!(found.output_hash.as_deref(), Some(proof.output_hash.as_str()));
    }

    #[tokio::test]
    async fn test_export_import() {
        let ledger = MemoryLedger::new();
        ledger.record("a", entry("alice", 1)).await.unwrap();
        ledger.record("b", entry("bob", 2)).await.unwrap();

        let json = ledger.export_json().await.unwrap();
        assert!(json.contains("\"creatorId\":\"alice\""));

        let restored = MemoryLedger::import_json(&json).unwrap();
        assert_eq!(restored.len().await, 2);
        assert_eq!(restored.lookup("b").await.unwrap().unwrap().created_at, 2);
    }

    #[test]
    fn test_import_rejects_garbage() {
        let err = MemoryLedger::import_json("{not json").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_blob_put_get() {
        let store = MemoryBlobStore::new();
        let locator = store.put(b"payload").await.unwrap();

        assert!(locator.as_str().starts_with(LOCATOR_PREFIX));
        assert_eq!(store.get(&locator).await.unwrap().unwrap(), b"payload");
        assert!(store.contains(&locator).await.unwrap());
    }

    #[tokio::test]
    async fn test_blob_content_addressed() {
        let store = MemoryBlobStore::new();
        let a = store.put(b"same").await.unwrap();
        let b = store.put(b"same").await.unwrap();
        let c = store.put(b"other").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_blob_missing() {
        let store = MemoryBlobStore::new();
        let locator = ContentLocator::new("sha256-nothing");
        assert!(store.get(&locator).await.unwrap().is_none());
        assert!(matches!(
            store.overwrite(&locator, vec![1]).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blob_overwrite_and_remove() {
        let store = MemoryBlobStore::new();
        let locator = store.put(b"original").await.unwrap();

        store.overwrite(&locator, b"swapped".to_vec()).await.unwrap();
        assert_eq!(store.get(&locator).await.unwrap().unwrap(), b"swapped");

        assert!(store.remove(&locator).await);
        assert!(!store.contains(&locator).await.unwrap());
    }
}
