//! # Veriseal Store
//!
//! Collaborator interfaces for the proof ledger and the blob store.
//!
//! ## Overview
//!
//! The core crates operate on in-memory buffers only. Anything that persists
//! or fetches bytes goes through the traits here, injected into a pipeline
//! rather than held as global clients.
//!
//! ## Key Types
//!
//! - [`Ledger`] - Records and looks up [`LedgerEntry`] values by combined hash
//! - [`BlobStore`] - Stores opaque payloads and hands back a locator
//! - [`MemoryLedger`], [`MemoryBlobStore`] - In-memory implementations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use veriseal_store::{BlobStore, MemoryBlobStore};
//!
//! async fn example() {
//!     let blobs = MemoryBlobStore::new();
//!     let locator = blobs.put(b"encrypted payload").await.unwrap();
//!     let bytes = blobs.get(&locator).await.unwrap();
//! }
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{MemoryBlobStore, MemoryLedger, LOCATOR_PREFIX};
pub use traits::{BlobStore, Ledger, LedgerEntry, LedgerExt};
