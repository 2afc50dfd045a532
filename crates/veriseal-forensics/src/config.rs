//! Tunable weights, thresholds, and sample caps.
//!
//! Every constant the comparator and the steganalysis tests depend on lives
//! here. All structs deserialize with `#[serde(default)]`, so a JSON document
//! only needs the fields it overrides.
//!
//! [`ForensicsConfig::from_json`] overlays the document onto the full default
//! configuration, so a nested struct keeps the defaults of the slot it sits
//! in (`exact_thresholds` stays exact, each test keeps its own sampling).
//! Deserializing a nested struct on its own falls back to that struct's
//! generic [`Default`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ForensicsError, Result};
use crate::similarity::ComparisonMethod;

/// Configuration for both forensic components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForensicsConfig {
    pub similarity: SimilarityConfig,
    pub steganalysis: SteganalysisConfig,
}

impl ForensicsConfig {
    /// Parse and validate a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Value =
            serde_json::from_str(json).map_err(|e| ForensicsError::Config(e.to_string()))?;
        let mut merged =
            serde_json::to_value(Self::default()).map_err(|e| ForensicsError::Config(e.to_string()))?;
        overlay(&mut merged, overrides);

        let config: Self =
            serde_json::from_value(merged).map_err(|e| ForensicsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.similarity.validate()?;
        self.steganalysis.validate()
    }
}

/// Merge `overrides` into `base`. Objects merge key by key; anything else
/// (numbers, arrays, null) replaces the base value.
fn overlay(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                overlay(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Similarity
// ─────────────────────────────────────────────────────────────────────────────

/// Weights of the four sub-scores. They should sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub structural: f64,
    pub body: f64,
    pub aux: f64,
    pub size: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            structural: 0.20,
            body: 0.50,
            aux: 0.20,
            size: 0.10,
        }
    }
}

/// Per-sub-score floors. A breakdown clears the floor when every sub-score
/// is strictly above its floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreFloor {
    pub structural: f64,
    pub body: f64,
    pub aux: f64,
    pub size: f64,
}

impl SubScoreFloor {
    /// Floor for an effectively identical pair.
    pub const fn identical() -> Self {
        Self {
            structural: 0.99,
            body: 0.99,
            aux: 0.98,
            size: 0.99,
        }
    }

    /// Floor for a near-identical pair.
    pub const fn near_identical() -> Self {
        Self {
            structural: 0.97,
            body: 0.97,
            aux: 0.95,
            size: 0.98,
        }
    }
}

impl Default for SubScoreFloor {
    fn default() -> Self {
        Self::identical()
    }
}

/// A proportional slice of the buffer, e.g. `0.05..0.15`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyWindow {
    pub start: f64,
    pub end: f64,
}

impl BodyWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Score awarded to a sampled byte whose difference is at most `max_diff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferenceTier {
    pub max_diff: u8,
    pub score: f64,
}

/// Minimum scores for each verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub authentic: f64,
    pub minor_edits: f64,
    pub modified: f64,
}

impl VerdictThresholds {
    /// Thresholds for the sampled byte heuristics.
    pub const fn sampled() -> Self {
        Self {
            authentic: 0.90,
            minor_edits: 0.70,
            modified: 0.50,
        }
    }

    /// Thresholds for a higher-fidelity embedding comparator.
    pub const fn exact() -> Self {
        Self {
            authentic: 0.95,
            minor_edits: 0.85,
            modified: 0.60,
        }
    }
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self::sampled()
    }
}

/// Configuration for the tamper detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Leading bytes compared position by position.
    pub structural_window: usize,
    /// Largest byte difference counted as a near match (half credit).
    pub near_match_tolerance: u8,
    /// Proportional windows sampled for the body score.
    pub body_windows: Vec<BodyWindow>,
    /// Minimum distance between sampled body bytes.
    pub body_stride: usize,
    /// Upper bound on samples per body window; the stride widens to honor it.
    pub max_samples_per_window: usize,
    /// Difference tiers, ascending by `max_diff`. Larger differences score 0.
    pub difference_tiers: Vec<DifferenceTier>,
    /// Size of the secondary positional window.
    pub aux_window: usize,
    /// Where the secondary window starts, as a fraction of the shorter length.
    pub aux_offset_ratio: f64,
    pub weights: ScoreWeights,
    /// Clearing this floor forces the score to at least `identical_score`.
    pub identical_floor: SubScoreFloor,
    pub identical_score: f64,
    /// Clearing this floor clamps the score into `near_identical_range`.
    pub near_identical_floor: SubScoreFloor,
    pub near_identical_range: (f64, f64),
    /// Weighted difference above which a penalty applies.
    pub difference_tolerance: f64,
    pub difference_multiplier: f64,
    pub max_difference_penalty: f64,
    /// A body score below `body_guard` scales scores above
    /// `body_guard_score` by `body_guard_scale`.
    pub body_guard: f64,
    pub body_guard_score: f64,
    pub body_guard_scale: f64,
    pub sampled_thresholds: VerdictThresholds,
    pub exact_thresholds: VerdictThresholds,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            structural_window: 500,
            near_match_tolerance: 2,
            body_windows: vec![
                BodyWindow::new(0.05, 0.15),
                BodyWindow::new(0.15, 0.25),
                BodyWindow::new(0.30, 0.40),
                BodyWindow::new(0.45, 0.55),
                BodyWindow::new(0.60, 0.70),
                BodyWindow::new(0.75, 0.85),
                BodyWindow::new(0.85, 0.95),
            ],
            body_stride: 3,
            max_samples_per_window: 1000,
            difference_tiers: vec![
                DifferenceTier { max_diff: 0, score: 1.0 },
                DifferenceTier { max_diff: 2, score: 0.9 },
                DifferenceTier { max_diff: 5, score: 0.6 },
                DifferenceTier { max_diff: 15, score: 0.3 },
            ],
            aux_window: 500,
            aux_offset_ratio: 0.5,
            weights: ScoreWeights::default(),
            identical_floor: SubScoreFloor::identical(),
            identical_score: 0.99,
            near_identical_floor: SubScoreFloor::near_identical(),
            near_identical_range: (0.97, 0.99),
            difference_tolerance: 0.01,
            difference_multiplier: 5.0,
            max_difference_penalty: 0.10,
            body_guard: 0.95,
            body_guard_score: 0.90,
            body_guard_scale: 0.95,
            sampled_thresholds: VerdictThresholds::sampled(),
            exact_thresholds: VerdictThresholds::exact(),
        }
    }
}

impl SimilarityConfig {
    /// Verdict thresholds for a comparison method.
    pub fn thresholds(&self, method: ComparisonMethod) -> &VerdictThresholds {
        match method {
            ComparisonMethod::Exact => &self.exact_thresholds,
            ComparisonMethod::Sampled => &self.sampled_thresholds,
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.structural_window == 0 || self.aux_window == 0 {
            return Err(ForensicsError::Config("positional windows must be non-empty".into()));
        }
        if self.body_stride == 0 || self.max_samples_per_window == 0 {
            return Err(ForensicsError::Config(
                "body stride and sample cap must be positive".into(),
            ));
        }
        if self.body_windows.is_empty() {
            return Err(ForensicsError::Config("at least one body window is required".into()));
        }
        for w in &self.body_windows {
            if !(0.0..=1.0).contains(&w.start) || !(0.0..=1.0).contains(&w.end) || w.start >= w.end
            {
                return Err(ForensicsError::Config(format!(
                    "body window {}..{} is not a slice of 0..1",
                    w.start, w.end
                )));
            }
        }
        if self
            .difference_tiers
            .windows(2)
            .any(|pair| pair[0].max_diff >= pair[1].max_diff)
        {
            return Err(ForensicsError::Config(
                "difference tiers must ascend by max_diff".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.aux_offset_ratio) {
            return Err(ForensicsError::Config("aux offset ratio must be in [0, 1)".into()));
        }
        let (lo, hi) = self.near_identical_range;
        if lo > hi {
            return Err(ForensicsError::Config("near-identical range is inverted".into()));
        }
        for t in [&self.sampled_thresholds, &self.exact_thresholds] {
            if !(t.authentic >= t.minor_edits && t.minor_edits >= t.modified) {
                return Err(ForensicsError::Config(
                    "verdict thresholds must descend from authentic to modified".into(),
                ));
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Steganalysis
// ─────────────────────────────────────────────────────────────────────────────

/// Sampling bounds shared by every test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sampling {
    /// Distance between sampled positions.
    pub stride: usize,
    /// Upper bound on samples taken.
    pub max_samples: usize,
    /// Below this many samples the test reports insufficient evidence.
    pub min_samples: usize,
}

impl Sampling {
    pub const fn new(stride: usize, max_samples: usize, min_samples: usize) -> Self {
        Self {
            stride,
            max_samples,
            min_samples,
        }
    }

    fn validate(&self, test: &str) -> Result<()> {
        if self.stride == 0 || self.max_samples == 0 {
            return Err(ForensicsError::Config(format!(
                "{test}: stride and sample cap must be positive"
            )));
        }
        if self.min_samples > self.max_samples {
            return Err(ForensicsError::Config(format!(
                "{test}: minimum samples exceed the sample cap"
            )));
        }
        Ok(())
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self::new(10, 1000, 100)
    }
}

/// Least-significant-bit bias test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsbConfig {
    pub sampling: Sampling,
    /// Suspicious when `|ratio0 - 0.5|` exceeds this.
    pub bias_threshold: f64,
    /// Confidence is `(bias - confidence_floor) * confidence_scale`.
    pub confidence_floor: f64,
    pub confidence_scale: f64,
    pub weight: f64,
}

impl Default for LsbConfig {
    fn default() -> Self {
        Self {
            sampling: Sampling::new(10, 2000, 100),
            bias_threshold: 0.08,
            confidence_floor: 0.05,
            confidence_scale: 20.0,
            weight: 0.30,
        }
    }
}

/// Chi-square test over value pairs.
///
/// The scan visits at most `2 * sampling.max_samples` strided positions and
/// keeps the values below `exclude_from`. A heavily saturated buffer can
/// therefore yield fewer than `max_samples` values even when it is long
/// enough to fill the cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChiSquareConfig {
    pub sampling: Sampling,
    /// Values at or above this are skipped (saturated pixels).
    pub exclude_from: u8,
    pub threshold: f64,
    /// Confidence is `(chi2 - confidence_floor) / confidence_span`.
    pub confidence_floor: f64,
    pub confidence_span: f64,
    pub weight: f64,
}

impl Default for ChiSquareConfig {
    fn default() -> Self {
        Self {
            sampling: Sampling::new(5, 1000, 100),
            exclude_from: 254,
            threshold: 159.0,
            confidence_floor: 100.0,
            confidence_span: 100.0,
            weight: 0.25,
        }
    }
}

/// Shannon entropy deviation test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntropyConfig {
    pub sampling: Sampling,
    /// Suspicious below this many bits per byte.
    pub min_bits: f64,
    pub confidence_scale: f64,
    pub weight: f64,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            sampling: Sampling::new(5, 2000, 100),
            min_bits: 6.8,
            confidence_scale: 2.5,
            weight: 0.20,
        }
    }
}

/// Regular-singular group test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsConfig {
    /// `stride` separates group starts; `max_samples` caps the group count.
    pub sampling: Sampling,
    /// A group is regular when its delta difference is below this.
    pub regular_below: u8,
    /// A group is singular when its delta difference is above this.
    pub singular_above: u8,
    pub threshold: f64,
    pub confidence_floor: f64,
    pub confidence_scale: f64,
    pub weight: f64,
}

impl Default for RsConfig {
    fn default() -> Self {
        Self {
            sampling: Sampling::new(20, 500, 50),
            regular_below: 5,
            singular_above: 20,
            threshold: 0.15,
            confidence_floor: 0.1,
            confidence_scale: 10.0,
            weight: 0.15,
        }
    }
}

/// Adjacent sample-pair correlation test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplePairConfig {
    pub sampling: Sampling,
    /// A pair is close when its difference is below this.
    pub close_below: u8,
    /// Suspicious when the close fraction leaves `[low, high]`.
    pub low: f64,
    pub high: f64,
    /// Confidence is `|correlation - center| * confidence_scale`.
    pub center: f64,
    pub confidence_scale: f64,
    pub weight: f64,
}

impl Default for SamplePairConfig {
    fn default() -> Self {
        Self {
            sampling: Sampling::new(10, 1000, 100),
            close_below: 3,
            low: 0.2,
            high: 0.6,
            center: 0.4,
            confidence_scale: 2.5,
            weight: 0.10,
        }
    }
}

/// Configuration for the steganalysis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteganalysisConfig {
    /// Largest header skipped before sampling.
    pub header_cap: usize,
    /// Header skipped as a fraction of the buffer length (capped by `header_cap`).
    pub header_ratio: f64,
    pub lsb: LsbConfig,
    pub chi_square: ChiSquareConfig,
    pub entropy: EntropyConfig,
    pub rs: RsConfig,
    pub sample_pair: SamplePairConfig,
    /// The weighted sum must exceed this for a suspicious verdict.
    pub suspicion_threshold: f64,
    /// Overall confidence is `min(1, weighted_sum * confidence_scale)`.
    pub confidence_scale: f64,
}

impl Default for SteganalysisConfig {
    fn default() -> Self {
        Self {
            header_cap: 1000,
            header_ratio: 0.05,
            lsb: LsbConfig::default(),
            chi_square: ChiSquareConfig::default(),
            entropy: EntropyConfig::default(),
            rs: RsConfig::default(),
            sample_pair: SamplePairConfig::default(),
            suspicion_threshold: 0.25,
            confidence_scale: 1.5,
        }
    }
}

impl SteganalysisConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.header_ratio) {
            return Err(ForensicsError::Config("header ratio must be in [0, 1)".into()));
        }
        self.lsb.sampling.validate("lsb")?;
        self.chi_square.sampling.validate("chi_square")?;
        self.entropy.sampling.validate("entropy")?;
        self.rs.sampling.validate("rs")?;
        self.sample_pair.sampling.validate("sample_pair")?;
        if self.chi_square.confidence_span <= 0.0 {
            return Err(ForensicsError::Config("chi_square: confidence span must be positive".into()));
        }
        if self.sample_pair.low > self.sample_pair.high {
            return Err(ForensicsError::Config("sample_pair: band is inverted".into()));
        }
        Ok(())
    }

    /// Bytes skipped at the start of a buffer of `len` bytes.
    pub fn header_len(&self, len: usize) -> usize {
        let proportional = (len as f64 * self.header_ratio) as usize;
        proportional.min(self.header_cap).min(len)
    }
}
