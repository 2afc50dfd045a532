//! Combined verdict over similarity and steganalysis.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use veriseal_forensics::{
    compare_with_embeddings, ComparisonMethod, EmbeddingModel, ForensicsConfig,
    SimilarityReport, SimilarityVerdict, SteganalysisEngine, SteganalysisReport, TamperDetector,
};

use crate::error::Result;

/// What a verifier should tell the user about a candidate upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Matches the sealed original.
    Authentic,
    /// Matches the original, but carries signs of embedded data.
    AuthenticWithHiddenData,
    /// Close to the original with minor edits.
    Edited,
    /// Materially modified.
    Tampered,
    /// Not the sealed artifact.
    Mismatch,
}

impl Verdict {
    /// Combine a similarity verdict with a steganalysis outcome.
    ///
    /// Hidden data only demotes an otherwise authentic result.
    pub fn combine(similarity: SimilarityVerdict, hidden_data: bool) -> Self {
        match similarity {
            SimilarityVerdict::Authentic if hidden_data => Verdict::AuthenticWithHiddenData,
            SimilarityVerdict::Authentic => Verdict::Authentic,
            SimilarityVerdict::MinorEdits => Verdict::Edited,
            SimilarityVerdict::Modified => Verdict::Tampered,
            SimilarityVerdict::Different => Verdict::Mismatch,
        }
    }

    pub fn is_authentic(&self) -> bool {
        matches!(self, Verdict::Authentic | Verdict::AuthenticWithHiddenData)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Authentic => "authentic",
            Verdict::AuthenticWithHiddenData => "authentic_with_hidden_data",
            Verdict::Edited => "edited",
            Verdict::Tampered => "tampered",
            Verdict::Mismatch => "mismatch",
        };
        f.write_str(label)
    }
}

/// Both reports plus the verdict derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub verdict: Verdict,
    pub similarity: SimilarityReport,
    pub steganalysis: SteganalysisReport,
}

/// Runs the tamper detector and the steganalysis engine on a candidate.
///
/// With an embedding model attached, [`ComparisonMethod::Exact`] requests go
/// through the model. Without one they use the sampled heuristics judged
/// against the exact thresholds.
#[derive(Clone, Default)]
pub struct Assessor {
    detector: TamperDetector,
    engine: SteganalysisEngine,
    model: Option<Arc<dyn EmbeddingModel>>,
}

impl Assessor {
    /// Create an assessor, validating the configuration.
    pub fn new(config: &ForensicsConfig) -> Result<Self> {
        Ok(Self {
            detector: TamperDetector::new(config.similarity.clone())?,
            engine: SteganalysisEngine::new(config.steganalysis.clone())?,
            model: None,
        })
    }

    /// Attach a higher-fidelity comparator.
    pub fn with_model(mut self, model: Arc<dyn EmbeddingModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn detector(&self) -> &TamperDetector {
        &self.detector
    }

    pub fn engine(&self) -> &SteganalysisEngine {
        &self.engine
    }

    /// Compare `candidate` against `reference` and analyze the candidate.
    pub fn assess(
        &self,
        candidate: &[u8],
        reference: &[u8],
        method: ComparisonMethod,
    ) -> Result<Assessment> {
        let similarity = match (&self.model, method) {
            (Some(model), ComparisonMethod::Exact) => {
                compare_with_embeddings(candidate, reference, model.as_ref(), &self.detector)?
            }
            _ => self.detector.compare(candidate, reference, method)?,
        };
        let steganalysis = self.engine.analyze(candidate);

        Ok(Assessment {
            verdict: Verdict::combine(similarity.verdict, steganalysis.suspicious),
            similarity,
            steganalysis,
        })
    }
}

impl fmt::Debug for Assessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assessor")
            .field("detector", &self.detector)
            .field("engine", &self.engine)
            .field("model", &self.model.as_ref().map(|m| m.name().to_string()))
            .finish()
    }
}

/// Assess with the default configuration.
pub fn assess(candidate: &[u8], reference: &[u8], method: ComparisonMethod) -> Result<Assessment> {
    Assessor::default().assess(candidate, reference, method)
}
