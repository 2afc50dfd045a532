//! # Veriseal Core
//!
//! Pure primitives for Veriseal: hashing, proof records, and content kinds.
//!
//! This crate contains no I/O, no storage, no networking. It is pure computation
//! over byte buffers and their textual digests.
//!
//! ## Key Types
//!
//! - [`ProofRecord`] - Immutable link between a creator, a prompt, and an artifact
//! - [`Sha256Hash`] - A 32-byte SHA-256 digest
//! - [`ContentKind`] - Tagged description of the artifact (image or music)
//! - [`ContentLocator`] - Opaque locator handed out by a blob store
//!
//! ## Combined Hash
//!
//! The canonical proof identifier is SHA-256 over the *textual* concatenation
//! `prompt_hash || output_hash || creator_id || created_at`. See [`proof`].

pub mod error;
pub mod hash;
pub mod proof;
pub mod types;

pub use error::{Result, ValidationError};
pub use hash::{hash_hex, Sha256Hash};
pub use proof::{combined_hash, generate_proof, ProofRecord};
pub use types::{ContentKind, ContentLocator};
