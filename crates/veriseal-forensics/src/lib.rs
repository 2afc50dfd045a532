//! # Veriseal Forensics
//!
//! Heuristics for judging an uploaded artifact against its sealed original.
//!
//! ## Overview
//!
//! Two independent analyses, both over opaque byte buffers:
//!
//! - [`TamperDetector`] scores how similar a candidate is to a reference,
//!   using sampled byte comparisons instead of format decoding.
//! - [`SteganalysisEngine`] runs five statistical tests on a single buffer
//!   to estimate whether data has been hidden in it.
//!
//! Every test reads a capped number of bytes, so cost does not grow with the
//! buffer. Thresholds, weights and sample caps all live in
//! [`ForensicsConfig`].
//!
//! A learned comparator can be plugged in through [`EmbeddingModel`]; its
//! scores are reported with [`ComparisonMethod::Exact`] and judged against
//! stricter thresholds.
//!
//! ## Usage
//!
//! ```rust
//! use veriseal_forensics::{compare_content, detect_steganography, ComparisonMethod};
//!
//! let reference = vec![42u8; 4096];
//! let report = compare_content(&reference, &reference, ComparisonMethod::Sampled).unwrap();
//! assert_eq!(report.score, 1.0);
//!
//! let stego = detect_steganography(&reference);
//! assert!(stego.suspicious);
//! ```

pub mod config;
pub mod embedding;
pub mod error;
pub mod similarity;
pub mod steganalysis;

pub use config::{
    BodyWindow, ChiSquareConfig, DifferenceTier, EntropyConfig, ForensicsConfig, LsbConfig,
    RsConfig, SamplePairConfig, Sampling, ScoreWeights, SimilarityConfig, SteganalysisConfig,
    SubScoreFloor, VerdictThresholds,
};
pub use embedding::{compare_with_embeddings, cosine_similarity, Embedding, EmbeddingModel};
pub use error::{ForensicsError, Result};
pub use similarity::{
    compare_content, ComparisonMethod, ScoreBreakdown, SimilarityReport, SimilarityVerdict,
    TamperDetector,
};
pub use steganalysis::{
    detect_steganography, SteganalysisEngine, SteganalysisReport, StegoTest, TestResult,
    NO_METHOD,
};
