//! Statistical steganalysis over raw byte streams.
//!
//! Five independent tests each read a capped sample of the buffer after a
//! header region. A test with too few samples reports itself as
//! insufficient: not suspicious, confidence 0. That is a normal result,
//! never an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Sampling, SteganalysisConfig};
use crate::error::Result;

/// The individual steganalysis tests, in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StegoTest {
    LsbBias,
    ChiSquare,
    Entropy,
    RsAnalysis,
    SamplePair,
}

impl StegoTest {
    /// Every test, in the order they run.
    pub const ALL: [StegoTest; 5] = [
        StegoTest::LsbBias,
        StegoTest::ChiSquare,
        StegoTest::Entropy,
        StegoTest::RsAnalysis,
        StegoTest::SamplePair,
    ];

    /// Name used for indicator keys and `primary_method`.
    pub const fn name(&self) -> &'static str {
        match self {
            StegoTest::LsbBias => "lsbBias",
            StegoTest::ChiSquare => "chiSquare",
            StegoTest::Entropy => "entropy",
            StegoTest::RsAnalysis => "rsAnalysis",
            StegoTest::SamplePair => "samplePair",
        }
    }
}

/// `primary_method` when no test triggered.
pub const NO_METHOD: &str = "none";

/// Outcome of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test: StegoTest,
    /// Raw statistic; 0 when the sample was insufficient.
    pub statistic: f64,
    pub samples: usize,
    pub sufficient: bool,
    pub suspicious: bool,
    /// In `[0, 1]`; 0 unless suspicious.
    pub confidence: f64,
}

impl TestResult {
    fn insufficient(test: StegoTest, samples: usize) -> Self {
        Self {
            test,
            statistic: 0.0,
            samples,
            sufficient: false,
            suspicious: false,
            confidence: 0.0,
        }
    }

    fn measured(test: StegoTest, statistic: f64, samples: usize, confidence: Option<f64>) -> Self {
        Self {
            test,
            statistic,
            samples,
            sufficient: true,
            suspicious: confidence.is_some(),
            confidence: confidence.map_or(0.0, |c| c.clamp(0.0, 1.0)),
        }
    }
}

/// Composite steganalysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteganalysisReport {
    pub suspicious: bool,
    pub confidence: f64,
    /// Name of the triggered test with the highest confidence, or `"none"`.
    pub primary_method: String,
    /// Raw statistic of every test, keyed by test name.
    pub indicators: BTreeMap<String, f64>,
    pub tests: Vec<TestResult>,
    pub header_skipped: usize,
    pub analyzed_bytes: usize,
}

impl SteganalysisReport {
    /// Result for a specific test.
    pub fn test(&self, test: StegoTest) -> Option<&TestResult> {
        self.tests.iter().find(|r| r.test == test)
    }

    /// Raw statistic for a specific test.
    pub fn indicator(&self, test: StegoTest) -> f64 {
        self.indicators.get(test.name()).copied().unwrap_or(0.0)
    }
}

/// Runs the five tests and combines them.
#[derive(Debug, Clone, Default)]
pub struct SteganalysisEngine {
    config: SteganalysisConfig,
}

impl SteganalysisEngine {
    /// Create an engine, validating the configuration.
    pub fn new(config: SteganalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SteganalysisConfig {
        &self.config
    }

    /// Analyze a buffer. Never fails.
    pub fn analyze(&self, data: &[u8]) -> SteganalysisReport {
        let header = self.config.header_len(data.len());
        let body = &data[header..];

        let tests: Vec<TestResult> = StegoTest::ALL
            .iter()
            .map(|&test| {
                let result = self.run(test, body);
                debug!(
                    test = test.name(),
                    statistic = result.statistic,
                    samples = result.samples,
                    suspicious = result.suspicious,
                    confidence = result.confidence,
                    "steganalysis test"
                );
                result
            })
            .collect();

        let weighted: f64 = tests
            .iter()
            .filter(|r| r.suspicious)
            .map(|r| self.weight(r.test) * r.confidence)
            .sum();

        // first test wins ties
        let mut primary: Option<&TestResult> = None;
        for result in tests.iter().filter(|r| r.suspicious) {
            if primary.map_or(true, |best| result.confidence > best.confidence) {
                primary = Some(result);
            }
        }

        let indicators = tests
            .iter()
            .map(|r| (r.test.name().to_string(), r.statistic))
            .collect();

        SteganalysisReport {
            suspicious: weighted > self.config.suspicion_threshold,
            confidence: (weighted * self.config.confidence_scale).min(1.0),
            primary_method: primary.map_or(NO_METHOD, |r| r.test.name()).to_string(),
            indicators,
            tests,
            header_skipped: header,
            analyzed_bytes: body.len(),
        }
    }

    fn weight(&self, test: StegoTest) -> f64 {
        match test {
            StegoTest::LsbBias => self.config.lsb.weight,
            StegoTest::ChiSquare => self.config.chi_square.weight,
            StegoTest::Entropy => self.config.entropy.weight,
            StegoTest::RsAnalysis => self.config.rs.weight,
            StegoTest::SamplePair => self.config.sample_pair.weight,
        }
    }

    fn run(&self, test: StegoTest, body: &[u8]) -> TestResult {
        match test {
            StegoTest::LsbBias => self.lsb_bias(body),
            StegoTest::ChiSquare => self.chi_square(body),
            StegoTest::Entropy => self.entropy(body),
            StegoTest::RsAnalysis => self.rs_analysis(body),
            StegoTest::SamplePair => self.sample_pair(body),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────────

    fn lsb_bias(&self, body: &[u8]) -> TestResult {
        let cfg = &self.config.lsb;
        let samples: Vec<u8> = strided(body, &cfg.sampling).copied().collect();
        if samples.len() < cfg.sampling.min_samples {
            return TestResult::insufficient(StegoTest::LsbBias, samples.len());
        }

        let zeros = samples.iter().filter(|&&b| b & 1 == 0).count();
        let bias = (zeros as f64 / samples.len() as f64 - 0.5).abs();
        let confidence = (bias > cfg.bias_threshold)
            .then(|| (bias - cfg.confidence_floor) * cfg.confidence_scale);
        TestResult::measured(StegoTest::LsbBias, bias, samples.len(), confidence)
    }

    fn chi_square(&self, body: &[u8]) -> TestResult {
        let cfg = &self.config.chi_square;
        let sampling = &cfg.sampling;

        // at most twice the sample cap in positions; see ChiSquareConfig
        let values: Vec<u8> = body
            .iter()
            .step_by(sampling.stride)
            .take(sampling.max_samples.saturating_mul(2))
            .copied()
            .filter(|&v| v < cfg.exclude_from)
            .take(sampling.max_samples)
            .collect();
        if values.len() < sampling.min_samples {
            return TestResult::insufficient(StegoTest::ChiSquare, values.len());
        }

        let mut buckets = [0usize; 128];
        for v in &values {
            buckets[usize::from(v / 2)] += 1;
        }
        let expected = values.len() as f64 / buckets.len() as f64;
        let chi2: f64 = buckets
            .iter()
            .map(|&observed| {
                let d = observed as f64 - expected;
                d * d / expected
            })
            .sum();

        let confidence = (chi2 > cfg.threshold)
            .then(|| (chi2 - cfg.confidence_floor) / cfg.confidence_span);
        TestResult::measured(StegoTest::ChiSquare, chi2, values.len(), confidence)
    }

    fn entropy(&self, body: &[u8]) -> TestResult {
        let cfg = &self.config.entropy;
        let mut counts = [0usize; 256];
        let mut n = 0usize;
        for &b in strided(body, &cfg.sampling) {
            counts[usize::from(b)] += 1;
            n += 1;
        }
        if n < cfg.sampling.min_samples {
            return TestResult::insufficient(StegoTest::Entropy, n);
        }

        let total = n as f64;
        let bits: f64 = counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum();

        let confidence =
            (bits < cfg.min_bits).then(|| (cfg.min_bits - bits) * cfg.confidence_scale);
        TestResult::measured(StegoTest::Entropy, bits, n, confidence)
    }

    fn rs_analysis(&self, body: &[u8]) -> TestResult {
        let cfg = &self.config.rs;
        let (mut groups, mut regular, mut singular) = (0usize, 0usize, 0usize);
        for g in body
            .windows(4)
            .step_by(cfg.sampling.stride)
            .take(cfg.sampling.max_samples)
        {
            let d1 = g[1].abs_diff(g[0]);
            let d2 = g[3].abs_diff(g[2]);
            let diff = d1.abs_diff(d2);
            if diff < cfg.regular_below {
                regular += 1;
            } else if diff > cfg.singular_above {
                singular += 1;
            }
            groups += 1;
        }
        if groups < cfg.sampling.min_samples {
            return TestResult::insufficient(StegoTest::RsAnalysis, groups);
        }

        let n = groups as f64;
        let rs = (regular as f64 / n - singular as f64 / n).abs();
        let confidence =
            (rs > cfg.threshold).then(|| (rs - cfg.confidence_floor) * cfg.confidence_scale);
        TestResult::measured(StegoTest::RsAnalysis, rs, groups, confidence)
    }

    fn sample_pair(&self, body: &[u8]) -> TestResult {
        let cfg = &self.config.sample_pair;
        let (mut pairs, mut close) = (0usize, 0usize);
        for p in body
            .windows(2)
            .step_by(cfg.sampling.stride)
            .take(cfg.sampling.max_samples)
        {
            if p[0].abs_diff(p[1]) < cfg.close_below {
                close += 1;
            }
            pairs += 1;
        }
        if pairs < cfg.sampling.min_samples {
            return TestResult::insufficient(StegoTest::SamplePair, pairs);
        }

        let correlation = close as f64 / pairs as f64;
        let confidence = (correlation < cfg.low || correlation > cfg.high)
            .then(|| (correlation - cfg.center).abs() * cfg.confidence_scale);
        TestResult::measured(StegoTest::SamplePair, correlation, pairs, confidence)
    }
}

fn strided<'a>(body: &'a [u8], sampling: &Sampling) -> impl Iterator<Item = &'a u8> {
    body.iter().step_by(sampling.stride).take(sampling.max_samples)
}

/// Analyze with the default configuration.
pub fn detect_steganography(data: &[u8]) -> SteganalysisReport {
    SteganalysisEngine::default().analyze(data)
}
