//! # Veriseal
//!
//! Content authenticity for generated media: proofs that tie an artifact to
//! its prompt and creator, creator-bound encryption, and forensic checks that
//! tell an untouched copy from an edited, tampered or stego-laden one.
//!
//! ## Overview
//!
//! - **Proofs**: SHA-256 proof records keyed by a combined hash
//! - **Cipher**: AES-256-GCM under a key derived from the creator identifier
//! - **Tamper detection**: sampled byte-level similarity with verdict tiers
//! - **Steganalysis**: five bounded statistical tests for hidden data
//! - **Pipeline**: seal and verify over an injected ledger and blob store
//!
//! ## Usage
//!
//! ```rust,no_run
//! use veriseal::{ContentKind, GenerationRequest, Pipeline, PipelineConfig};
//! use veriseal::store::{MemoryBlobStore, MemoryLedger};
//!
//! async fn example() {
//!     let pipeline = Pipeline::new(
//!         MemoryLedger::new(),
//!         MemoryBlobStore::new(),
//!         PipelineConfig::default(),
//!     )
//!     .unwrap();
//!
//!     let sealed = pipeline
//!         .seal(GenerationRequest {
//!             prompt: "a lighthouse at dusk".into(),
//!             output: b"...png bytes...".to_vec(),
//!             creator_id: "0xCreator".into(),
//!             kind: ContentKind::Image { width: 1024, height: 1024, format: "png".into() },
//!             created_at: None,
//!         })
//!         .await
//!         .unwrap();
//!
//!     let report = pipeline
//!         .verify(&sealed.proof.combined_hash, b"...uploaded bytes...")
//!         .await
//!         .unwrap();
//!     println!("{}", report.verdict);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `veriseal::core` - Hashing, proof records, content kinds
//! - `veriseal::cipher` - Key derivation and payload encryption
//! - `veriseal::forensics` - Tamper detection and steganalysis
//! - `veriseal::store` - Ledger and blob store traits

pub mod error;
pub mod pipeline;
pub mod verdict;

// Re-export component crates
pub use veriseal_cipher as cipher;
pub use veriseal_core as core;
pub use veriseal_forensics as forensics;
pub use veriseal_store as store;

// Re-export main types for convenience
pub use error::{Result, VerisealError};
pub use pipeline::{
    ArtifactMetadata, GenerationRequest, Pipeline, PipelineConfig, SealedArtifact,
    VerificationReport,
};
pub use verdict::{assess, Assessment, Assessor, Verdict};

// Re-export the four core components
pub use veriseal_cipher::{
    decrypt, derive_key, encrypt, pack_payload, unpack_payload, AuthFailure, ContentCipher,
    EncryptedPayload,
};
pub use veriseal_core::{combined_hash, generate_proof, hash_hex, ContentKind, ProofRecord};
pub use veriseal_forensics::{
    compare_content, detect_steganography, ComparisonMethod, SimilarityReport,
    SimilarityVerdict, SteganalysisEngine, SteganalysisReport, TamperDetector,
};
