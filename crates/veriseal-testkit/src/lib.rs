//! # Veriseal Testkit
//!
//! Testing utilities for Veriseal.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known proof, key and cipher outputs for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic buffers, LSB embedding, and creator setups
//!
//! ## Golden Vectors
//!
//! ```rust
//! use veriseal_testkit::vectors::proof_vectors;
//! use veriseal_core::generate_proof;
//!
//! for v in proof_vectors() {
//!     let proof = generate_proof(v.prompt, v.output, v.creator_id, v.created_at).unwrap();
//!     assert_eq!(proof.combined_hash, v.expected_combined_hash);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use veriseal_testkit::generators::{proof_from_params, ProofParams};
//!
//! proptest! {
//!     #[test]
//!     fn proof_is_deterministic(params: ProofParams) {
//!         let p1 = proof_from_params(&params).unwrap();
//!         let p2 = proof_from_params(&params).unwrap();
//!         prop_assert_eq!(p1.combined_hash, p2.combined_hash);
//!     }
//! }
//! ```
//!
//! ## Fixtures
//!
//! ```rust
//! use veriseal_testkit::fixtures::{covert_message, embed_lsb_message, pseudo_random_bytes};
//!
//! let mut image = pseudo_random_bytes(b"scenario-10k", 10_000);
//! embed_lsb_message(&mut image, &covert_message(), 1000, 5);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    covert_message, embed_lsb_message, extract_lsb_message, fast_cipher_config, flip_bytes,
    multi_creator_fixtures, pseudo_random_bytes, uniform_bytes, TestFixture,
    FAST_KDF_ITERATIONS,
};
pub use generators::{proof_from_params, ProofParams};
pub use vectors::{cipher_vectors, key_vectors, proof_vectors, verify_all_vectors};
