//! The Pipeline: sealing and verifying artifacts over injected collaborators.
//!
//! The pipeline brings together proof generation, encryption, the ledger,
//! the blob store, and the forensic checks. The four core components stay
//! synchronous; only collaborator calls are awaited.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use veriseal_cipher::{unpack_payload, CipherConfig, ContentCipher};
use veriseal_core::{generate_proof, hash_hex, ContentKind, ContentLocator, ProofRecord};
use veriseal_forensics::{
    ComparisonMethod, EmbeddingModel, ForensicsConfig, SimilarityReport, SteganalysisReport,
};
use veriseal_store::{BlobStore, Ledger, LedgerEntry, LedgerExt, StoreError};

use crate::error::{Result, VerisealError};
use crate::verdict::{Assessor, Verdict};

/// Configuration for the Pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Key derivation parameters.
    pub cipher: CipherConfig,
    /// Comparator and steganalysis tuning.
    pub forensics: ForensicsConfig,
    /// Comparison tier used by [`Pipeline::verify`].
    pub method: ComparisonMethod,
    /// Whether to compare the stored key hash before decrypting.
    pub check_key_hash: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cipher: CipherConfig::default(),
            forensics: ForensicsConfig::default(),
            method: ComparisonMethod::Sampled,
            check_key_hash: true,
        }
    }
}

/// A freshly generated artifact to seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub output: Vec<u8>,
    pub creator_id: String,
    pub kind: ContentKind,
    /// Unix ms. Defaults to the current time.
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Metadata stored alongside a sealed artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    #[serde(flatten)]
    pub kind: ContentKind,
    pub combined_hash: String,
    pub creator_id: String,
    pub created_at: i64,
    pub content_locator: ContentLocator,
}

/// Result of sealing an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedArtifact {
    pub proof: ProofRecord,
    pub locator: ContentLocator,
    pub metadata: ArtifactMetadata,
}

/// Result of verifying a candidate upload against a sealed artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub combined_hash: String,
    pub creator_id: String,
    pub created_at: i64,
    pub content_locator: ContentLocator,
    pub verdict: Verdict,
    pub similarity: SimilarityReport,
    pub steganalysis: SteganalysisReport,
}

/// The main Pipeline struct.
///
/// Provides a unified API for:
/// - Sealing generated artifacts (proof, encryption, storage, ledger)
/// - Retrieving the plaintext for its creator
/// - Verifying a candidate upload against the sealed original
pub struct Pipeline<L: Ledger, B: BlobStore> {
    /// The proof ledger.
    ledger: Arc<L>,
    /// The encrypted content store.
    blobs: Arc<B>,
    cipher: ContentCipher,
    assessor: Assessor,
    config: PipelineConfig,
}

impl<L: Ledger, B: BlobStore> Pipeline<L, B> {
    /// Create a new pipeline, validating the configuration.
    pub fn new(ledger: L, blobs: B, config: PipelineConfig) -> Result<Self> {
        Ok(Self {
            ledger: Arc::new(ledger),
            blobs: Arc::new(blobs),
            cipher: ContentCipher::new(config.cipher.clone()),
            assessor: Assessor::new(&config.forensics)?,
            config,
        })
    }

    /// Route [`ComparisonMethod::Exact`] comparisons through `model`.
    pub fn with_embedding_model(mut self, model: Arc<dyn EmbeddingModel>) -> Self {
        self.assessor = self.assessor.with_model(model);
        self
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Get the blob store reference.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────

    /// Seal a generated artifact.
    ///
    /// Generates the proof, encrypts and frames the output for its creator,
    /// stores the frame, and records the proof in the ledger. A proof that is
    /// already recorded is rejected before anything is encrypted or stored.
    pub async fn seal(&self, request: GenerationRequest) -> Result<SealedArtifact> {
        let created_at = request.created_at.unwrap_or_else(now_millis);
        let proof = generate_proof(
            &request.prompt,
            &request.output,
            &request.creator_id,
            created_at,
        )?;

        if self.ledger.contains(&proof.combined_hash).await? {
            warn!(combined_hash = %proof.combined_hash, "proof already sealed");
            return Err(StoreError::AlreadyExists(proof.combined_hash).into());
        }

        let framed = self.cipher.seal(&request.output, &request.creator_id)?;
        let locator = self.blobs.put(&framed).await?;
        self.ledger.record_proof(&proof, locator.clone()).await?;

        info!(
            combined_hash = %proof.combined_hash,
            kind = request.kind.label(),
            %locator,
            "artifact sealed"
        );

        let metadata = ArtifactMetadata {
            kind: request.kind,
            combined_hash: proof.combined_hash.clone(),
            creator_id: proof.creator_id.clone(),
            created_at,
            content_locator: locator.clone(),
        };
        Ok(SealedArtifact {
            proof,
            locator,
            metadata,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Retrieval and Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch and decrypt a sealed artifact as `creator_id`.
    ///
    /// Anyone other than the recording creator gets an authentication failure.
    pub async fn retrieve(&self, combined_hash: &str, creator_id: &str) -> Result<Vec<u8>> {
        let entry = self.entry(combined_hash).await?;
        self.open_content(combined_hash, &entry, creator_id).await
    }

    /// Verify a candidate upload against the sealed original.
    pub async fn verify(&self, combined_hash: &str, candidate: &[u8]) -> Result<VerificationReport> {
        let entry = self.entry(combined_hash).await?;
        let reference = self
            .open_content(combined_hash, &entry, &entry.creator_id)
            .await?;

        let assessment = self
            .assessor
            .assess(candidate, &reference, self.config.method)?;

        info!(
            combined_hash,
            verdict = %assessment.verdict,
            score = assessment.similarity.score,
            hidden_data = assessment.steganalysis.suspicious,
            "verification complete"
        );

        Ok(VerificationReport {
            combined_hash: combined_hash.to_string(),
            creator_id: entry.creator_id,
            created_at: entry.created_at,
            content_locator: entry.content_locator,
            verdict: assessment.verdict,
            similarity: assessment.similarity,
            steganalysis: assessment.steganalysis,
        })
    }

    async fn entry(&self, combined_hash: &str) -> Result<LedgerEntry> {
        self.ledger
            .lookup(combined_hash)
            .await?
            .ok_or_else(|| VerisealError::ProofNotFound(combined_hash.to_string()))
    }

    async fn open_content(
        &self,
        combined_hash: &str,
        entry: &LedgerEntry,
        creator_id: &str,
    ) -> Result<Vec<u8>> {
        let framed = self
            .blobs
            .get(&entry.content_locator)
            .await?
            .ok_or_else(|| VerisealError::ContentMissing(entry.content_locator.to_string()))?;

        let plaintext = if self.config.check_key_hash {
            self.cipher.open(&framed, creator_id)?
        } else {
            let payload = unpack_payload(&framed)?;
            self.cipher
                .decrypt(&payload.ciphertext, &payload.iv, &payload.tag, creator_id)?
        };

        if let Some(expected) = &entry.output_hash {
            if hash_hex(&plaintext) != *expected {
                warn!(combined_hash, "stored content does not match the recorded output hash");
                return Err(VerisealError::IntegrityMismatch(combined_hash.to_string()));
            }
        }
        Ok(plaintext)
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriseal_store::{MemoryBlobStore, MemoryLedger};

    fn fast_config() -> PipelineConfig {
        PipelineConfig {
            cipher: CipherConfig {
                iterations: 64,
                ..CipherConfig::default()
            },
            ..PipelineConfig::default()
        }
    }

    fn request(output: &[u8]) -> GenerationRequest {
        GenerationRequest {
            prompt: "a lighthouse at dusk".into(),
            output: output.to_vec(),
            creator_id: "0xCreator".into(),
            kind: ContentKind::Image {
                width: 64,
                height: 64,
                format: "png".into(),
            },
            created_at: Some(1_736_870_400_000),
        }
    }

    #[tokio::test]
    async fn test_seal_records_ledger_and_blob() {
        let pipeline =
            Pipeline::new(MemoryLedger::new(), MemoryBlobStore::new(), fast_config()).unwrap();
        let sealed = pipeline.seal(request(b"image bytes")).await.unwrap();

        assert!(sealed.proof.verify());
        let entry = pipeline
            .ledger()
            .lookup(&sealed.proof.combined_hash)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.creator_id, "0xCreator");
        assert_eq!(entry.content_locator, sealed.locator);

        let framed = pipeline.blobs().get(&sealed.locator).await.unwrap().unwrap();
        assert_eq!(framed.len(), veriseal_cipher::HEADER_LEN + b"image bytes".len());
    }

    #[tokio::test]
    async fn test_seal_defaults_timestamp() {
        let pipeline =
            Pipeline::new(MemoryLedger::new(), MemoryBlobStore::new(), fast_config()).unwrap();
        let mut req = request(b"bytes");
        req.created_at = None;

        let sealed = pipeline.seal(req).await.unwrap();
        assert!(sealed.proof.created_at > 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_metadata_json_flattens_kind() {
        let pipeline =
            Pipeline::new(MemoryLedger::new(), MemoryBlobStore::new(), fast_config()).unwrap();
        let sealed = pipeline.seal(request(b"bytes")).await.unwrap();

        let json = serde_json::to_value(&sealed.metadata).unwrap();
        assert_eq!(json["kind"], "image");
        assert_eq!(json["width"], 64);
        assert_eq!(json["combinedHash"], sealed.proof.combined_hash.as_str());

        let back: ArtifactMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, sealed.metadata);
    }

    #[tokio::test]
    async fn test_retrieve_without_key_hash_precheck() {
        let config = PipelineConfig {
            check_key_hash: false,
            ..fast_config()
        };
        let pipeline = Pipeline::new(MemoryLedger::new(), MemoryBlobStore::new(), config).unwrap();
        let sealed = pipeline.seal(request(b"bytes")).await.unwrap();

        let err = pipeline
            .retrieve(&sealed.proof.combined_hash, "someone-else")
            .await
            .unwrap_err();
        assert!(err.is_authentication_failure());
        assert!(matches!(
            err,
            VerisealError::Cipher(veriseal_cipher::CipherError::AuthenticationFailure(
                veriseal_cipher::AuthFailure::TagMismatch
            ))
        ));
    }

    #[test]
    fn test_config_partial_json() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"method": "exact", "cipher": {"iterations": 10}}"#).unwrap();
        assert_eq!(config.method, ComparisonMethod::Exact);
        assert_eq!(config.cipher.iterations, 10);
        assert!(config.check_key_hash);
    }
}
