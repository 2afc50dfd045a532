//! Tamper detection: layered byte-level similarity between two buffers.
//!
//! Neither buffer is decoded. The detector compares them as opaque byte
//! streams, in this order:
//!
//! 1. Exact match short-circuit (score 1.0).
//! 2. Structural score over the leading window, position by position.
//! 3. Body score over seven proportional windows, sampled at a stride.
//! 4. Size ratio.
//! 5. Auxiliary positional score over a second fixed-size window.
//! 6. Weighted combination, identical/near-identical promotion, and a
//!    difference penalty.
//!
//! Every stage reads a bounded number of bytes, so a multi-megabyte buffer
//! costs about as much as a small one.

use serde::{Deserialize, Serialize};
use tracing::debug;
use veriseal_core::ValidationError;

use crate::config::{SimilarityConfig, SubScoreFloor, VerdictThresholds};
use crate::error::Result;

/// Which comparator tier produced a score.
///
/// `Exact` marks a higher-fidelity comparator (for example a learned
/// embedding) and selects the stricter verdict thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMethod {
    Exact,
    Sampled,
}

/// Classification of a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityVerdict {
    Authentic,
    MinorEdits,
    Modified,
    Different,
}

impl VerdictThresholds {
    /// Classify a score.
    pub fn verdict(&self, score: f64) -> SimilarityVerdict {
        if score >= self.authentic {
            SimilarityVerdict::Authentic
        } else if score >= self.minor_edits {
            SimilarityVerdict::MinorEdits
        } else if score >= self.modified {
            SimilarityVerdict::Modified
        } else {
            SimilarityVerdict::Different
        }
    }
}

/// The four sub-scores behind a sampled comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub structural: f64,
    pub body: f64,
    pub aux: f64,
    pub size: f64,
}

impl ScoreBreakdown {
    fn clears(&self, floor: &SubScoreFloor) -> bool {
        self.structural > floor.structural
            && self.body > floor.body
            && self.aux > floor.aux
            && self.size > floor.size
    }
}

/// Result of comparing a candidate against a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    /// Similarity in `[0, 1]`.
    pub score: f64,
    /// `score * 100`, rounded to two decimals.
    pub percentage: f64,
    pub method: ComparisonMethod,
    pub verdict: SimilarityVerdict,
    /// Sub-scores, when the sampled heuristics ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl SimilarityReport {
    /// Build a report from a score produced by any comparator.
    ///
    /// The score is clamped to `[0, 1]`; NaN counts as 0.
    pub fn from_score(score: f64, method: ComparisonMethod, thresholds: &VerdictThresholds) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self {
            score,
            percentage: (score * 10_000.0).round() / 100.0,
            method,
            verdict: thresholds.verdict(score),
            breakdown: None,
        }
    }

    fn with_breakdown(mut self, breakdown: ScoreBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }
}

/// Format-agnostic similarity comparator.
#[derive(Debug, Clone, Default)]
pub struct TamperDetector {
    config: SimilarityConfig,
}

impl TamperDetector {
    /// Create a detector, validating the configuration.
    pub fn new(config: SimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Compare `candidate` against `reference`.
    ///
    /// `method` selects the verdict thresholds, so a caller that obtained
    /// its score elsewhere gets consistent verdict semantics.
    pub fn compare(
        &self,
        candidate: &[u8],
        reference: &[u8],
        method: ComparisonMethod,
    ) -> Result<SimilarityReport> {
        if candidate.is_empty() {
            return Err(ValidationError::EmptyInput("candidate").into());
        }
        if reference.is_empty() {
            return Err(ValidationError::EmptyInput("reference").into());
        }

        let thresholds = self.config.thresholds(method);
        if candidate == reference {
            debug!(len = candidate.len(), "byte-identical buffers");
            return Ok(SimilarityReport::from_score(1.0, method, thresholds));
        }

        let breakdown = self.breakdown(candidate, reference);
        let score = self.combine(&breakdown);
        debug!(
            structural = breakdown.structural,
            body = breakdown.body,
            aux = breakdown.aux,
            size = breakdown.size,
            score,
            "sampled comparison"
        );

        Ok(SimilarityReport::from_score(score, method, thresholds).with_breakdown(breakdown))
    }

    /// Compute the four sub-scores.
    pub fn breakdown(&self, a: &[u8], b: &[u8]) -> ScoreBreakdown {
        let shorter = a.len().min(b.len());
        let longer = a.len().max(b.len());

        let structural = self.positional_similarity(a, b, 0, self.config.structural_window);
        let body = self.body_similarity(a, b).unwrap_or(structural);
        let aux_offset = (shorter as f64 * self.config.aux_offset_ratio) as usize;
        let aux = self.positional_similarity(a, b, aux_offset, self.config.aux_window);
        let size = if longer == 0 {
            1.0
        } else {
            shorter as f64 / longer as f64
        };

        ScoreBreakdown {
            structural,
            body,
            aux,
            size,
        }
    }

    /// Combine sub-scores into a final score in `[0, 1]`.
    pub fn combine(&self, s: &ScoreBreakdown) -> f64 {
        let cfg = &self.config;
        let w = &cfg.weights;

        let mut score =
            w.structural * s.structural + w.body * s.body + w.aux * s.aux + w.size * s.size;

        if s.clears(&cfg.identical_floor) {
            score = score.max(cfg.identical_score);
        } else if s.clears(&cfg.near_identical_floor) {
            let (lo, hi) = cfg.near_identical_range;
            score = score.clamp(lo, hi);
        }

        let difference = w.structural * (1.0 - s.structural)
            + w.body * (1.0 - s.body)
            + w.aux * (1.0 - s.aux)
            + w.size * (1.0 - s.size);
        if difference > cfg.difference_tolerance {
            score -= (difference * cfg.difference_multiplier).min(cfg.max_difference_penalty);
        }

        if s.body < cfg.body_guard && score > cfg.body_guard_score {
            score *= cfg.body_guard_scale;
        }

        score.clamp(0.0, 1.0)
    }

    /// Position-by-position score over `window` bytes starting at `offset`.
    ///
    /// Exact matches earn 1, near matches 0.5. Returns 0 when the window
    /// falls outside either buffer.
    fn positional_similarity(&self, a: &[u8], b: &[u8], offset: usize, window: usize) -> f64 {
        let n = window
            .min(a.len().saturating_sub(offset))
            .min(b.len().saturating_sub(offset));
        if n == 0 {
            return 0.0;
        }

        let tolerance = self.config.near_match_tolerance;
        let total: f64 = a[offset..offset + n]
            .iter()
            .zip(&b[offset..offset + n])
            .map(|(&x, &y)| match x.abs_diff(y) {
                0 => 1.0,
                d if d <= tolerance => 0.5,
                _ => 0.0,
            })
            .sum();
        total / n as f64
    }

    /// Mean of the per-window tiered scores, or `None` if every window is empty.
    fn body_similarity(&self, a: &[u8], b: &[u8]) -> Option<f64> {
        let cfg = &self.config;
        let len = a.len().min(b.len());

        let mut sum = 0.0;
        let mut windows = 0usize;
        for window in &cfg.body_windows {
            let start = (len as f64 * window.start) as usize;
            let end = ((len as f64 * window.end) as usize).min(len);
            if end <= start {
                continue;
            }

            let span = end - start;
            let stride = cfg.body_stride.max(span.div_ceil(cfg.max_samples_per_window));
            let (total, count) = (start..end)
                .step_by(stride)
                .fold((0.0, 0usize), |(total, count), i| {
                    (total + self.tier_score(a[i].abs_diff(b[i])), count + 1)
                });

            sum += total / count as f64;
            windows += 1;
        }

        (windows > 0).then(|| sum / windows as f64)
    }

    fn tier_score(&self, diff: u8) -> f64 {
        self.config
            .difference_tiers
            .iter()
            .find(|tier| diff <= tier.max_diff)
            .map_or(0.0, |tier| tier.score)
    }
}

/// Compare with the default configuration.
pub fn compare_content(
    candidate: &[u8],
    reference: &[u8],
    method: ComparisonMethod,
) -> Result<SimilarityReport> {
    TamperDetector::default().compare(candidate, reference, method)
}
