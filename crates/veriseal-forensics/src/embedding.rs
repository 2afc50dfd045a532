//! Pluggable higher-fidelity comparator.
//!
//! A learned model can stand in for the sampled heuristics. Its cosine
//! similarity is reported with [`ComparisonMethod::Exact`] and the stricter
//! thresholds. If the model fails, comparison falls back to the sampled tier.

use tracing::{debug, warn};
use veriseal_core::ValidationError;

use crate::error::{ForensicsError, Result};
use crate::similarity::{ComparisonMethod, SimilarityReport, TamperDetector};

/// A dense feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|&v| f64::from(v) * f64::from(v))
            .sum::<f64>()
            .sqrt()
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

/// Maps content bytes to an embedding.
///
/// Implementations own any decoding; this crate never decodes formats.
pub trait EmbeddingModel: Send + Sync {
    /// Embed a buffer.
    fn embed(&self, content: &[u8]) -> Result<Embedding>;

    /// Model name for logs.
    fn name(&self) -> &str {
        "embedding"
    }
}

/// Cosine similarity, clamped to `[0, 1]`.
///
/// Negative similarity counts as fully dissimilar.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(ForensicsError::Embedding(format!(
            "dimension mismatch: {} vs {}",
            a.dim(),
            b.dim()
        )));
    }
    let denom = a.norm() * b.norm();
    if denom == 0.0 || !denom.is_finite() {
        return Err(ForensicsError::Embedding("degenerate embedding".into()));
    }

    let dot: f64 = a
        .0
        .iter()
        .zip(&b.0)
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum();
    Ok((dot / denom).clamp(0.0, 1.0))
}

/// Compare through `model`, falling back to the sampled heuristics.
pub fn compare_with_embeddings(
    candidate: &[u8],
    reference: &[u8],
    model: &dyn EmbeddingModel,
    detector: &TamperDetector,
) -> Result<SimilarityReport> {
    if candidate.is_empty() {
        return Err(ValidationError::EmptyInput("candidate").into());
    }
    if reference.is_empty() {
        return Err(ValidationError::EmptyInput("reference").into());
    }

    let thresholds = detector.config().thresholds(ComparisonMethod::Exact);
    if candidate == reference {
        debug!(len = candidate.len(), "byte-identical buffers");
        return Ok(SimilarityReport::from_score(1.0, ComparisonMethod::Exact, thresholds));
    }

    let scored = model
        .embed(candidate)
        .and_then(|a| model.embed(reference).and_then(|b| cosine_similarity(&a, &b)));

    match scored {
        Ok(score) => Ok(SimilarityReport::from_score(
            score,
            ComparisonMethod::Exact,
            thresholds,
        )),
        Err(e) => {
            warn!(model = model.name(), error = %e, "embedding comparison failed, using sampled tier");
            detector.compare(candidate, reference, ComparisonMethod::Sampled)
        }
    }
}
