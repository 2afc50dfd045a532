//! End-to-end tests over the in-memory ledger and blob store.

use std::sync::Arc;

use async_trait::async_trait;

use rand::rngs::StdRng;
use rand::SeedableRng;

use veriseal::cipher::{AuthFailure, CipherError};
use veriseal::forensics::{Embedding, EmbeddingModel, ForensicsError, StegoTest};
use veriseal::core::ContentLocator;
use veriseal::store::{BlobStore, Ledger, MemoryBlobStore, MemoryLedger, StoreError};
use veriseal::{
    ComparisonMethod, ContentKind, GenerationRequest, Pipeline, PipelineConfig, Verdict,
    VerisealError,
};
use veriseal_testkit::fixtures::{
    covert_message, embed_lsb_message, fast_cipher_config, flip_bytes, pseudo_random_bytes,
    TestFixture,
};

const CREATOR: &str = "0xAbC0000000000000000000000000000000000001";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn config() -> PipelineConfig {
    PipelineConfig {
        cipher: fast_cipher_config(),
        ..PipelineConfig::default()
    }
}

fn pipeline() -> Pipeline<MemoryLedger, MemoryBlobStore> {
    init_tracing();
    Pipeline::new(MemoryLedger::new(), MemoryBlobStore::new(), config()).unwrap()
}

fn image_request(output: Vec<u8>) -> GenerationRequest {
    GenerationRequest {
        prompt: "a lighthouse at dusk, oil painting".into(),
        output,
        creator_id: CREATOR.into(),
        kind: ContentKind::Image {
            width: 100,
            height: 100,
            format: "png".into(),
        },
        created_at: Some(1_736_870_400_000),
    }
}

fn original() -> Vec<u8> {
    pseudo_random_bytes(b"scenario-10k", 10_000)
}

#[tokio::test]
async fn test_seal_then_retrieve_roundtrip() -> anyhow::Result<()> {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await?;

    let plaintext = pipeline
        .retrieve(&sealed.proof.combined_hash, CREATOR)
        .await?;
    assert_eq!(plaintext, original());
    assert!(sealed.proof.matches_output(&plaintext));
    Ok(())
}

#[tokio::test]
async fn test_retrieve_with_lowercased_creator() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let plaintext = pipeline
        .retrieve(&sealed.proof.combined_hash, &CREATOR.to_lowercase())
        .await
        .unwrap();
    assert_eq!(plaintext, original());
}

#[tokio::test]
async fn test_wrong_creator_is_authentication_failure() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let err = pipeline
        .retrieve(&sealed.proof.combined_hash, "0xSomeoneElse")
        .await
        .unwrap_err();
    assert!(err.is_authentication_failure());
    assert!(matches!(
        err,
        VerisealError::Cipher(CipherError::AuthenticationFailure(AuthFailure::KeyMismatch))
    ));
}

#[tokio::test]
async fn test_verify_identical_is_authentic() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let report = pipeline
        .verify(&sealed.proof.combined_hash, &original())
        .await
        .unwrap();
    assert_eq!(report.verdict, Verdict::Authentic);
    assert_eq!(report.similarity.score, 1.0);
    assert_eq!(report.similarity.method, ComparisonMethod::Sampled);
    assert!(!report.steganalysis.suspicious);
    assert_eq!(report.creator_id, CREATOR);
    assert_eq!(report.content_locator, sealed.locator);
}

#[tokio::test]
async fn test_verify_detects_hidden_payload() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let mut candidate = original();
    embed_lsb_message(&mut candidate, &covert_message(), 1000, 5);

    let report = pipeline
        .verify(&sealed.proof.combined_hash, &candidate)
        .await
        .unwrap();
    assert_eq!(report.verdict, Verdict::AuthenticWithHiddenData);
    assert!(report.verdict.is_authentic());
    assert!(report.steganalysis.suspicious);
    assert_eq!(report.steganalysis.primary_method, StegoTest::LsbBias.name());
    assert!(report.steganalysis.confidence > 0.5);
}

#[tokio::test]
async fn test_verify_unrelated_is_mismatch() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let unrelated = pseudo_random_bytes(b"unrelated", 10_000);
    let report = pipeline
        .verify(&sealed.proof.combined_hash, &unrelated)
        .await
        .unwrap();
    assert_eq!(report.verdict, Verdict::Mismatch);
    assert!(report.similarity.score < 0.5);
}

#[tokio::test]
async fn test_verify_heavy_edit_is_not_authentic() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let edited = flip_bytes(&original(), 5_000, &mut rng);
    let report = pipeline
        .verify(&sealed.proof.combined_hash, &edited)
        .await
        .unwrap();
    assert!(!report.verdict.is_authentic());
}

#[tokio::test]
async fn test_verify_empty_candidate_is_rejected() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let err = pipeline
        .verify(&sealed.proof.combined_hash, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, VerisealError::Forensics(_)));
    assert!(!err.is_authentication_failure());
}

#[tokio::test]
async fn test_unknown_proof_not_found() {
    let pipeline = pipeline();

    let err = pipeline.retrieve(&"00".repeat(32), CREATOR).await.unwrap_err();
    assert!(matches!(err, VerisealError::ProofNotFound(_)));

    let err = pipeline.verify(&"00".repeat(32), b"x").await.unwrap_err();
    assert!(matches!(err, VerisealError::ProofNotFound(_)));
}

#[tokio::test]
async fn test_removed_blob_is_content_missing() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    assert!(pipeline.blobs().remove(&sealed.locator).await);
    let err = pipeline
        .retrieve(&sealed.proof.combined_hash, CREATOR)
        .await
        .unwrap_err();
    assert!(matches!(err, VerisealError::ContentMissing(_)));
}

#[tokio::test]
async fn test_swapped_blob_is_integrity_mismatch() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    // Validly sealed for the same creator, but not the recorded output.
    let fixture = TestFixture::with_creator(CREATOR);
    let forged = fixture.seal(b"substituted content").unwrap();
    pipeline
        .blobs()
        .overwrite(&sealed.locator, forged)
        .await
        .unwrap();

    let err = pipeline
        .retrieve(&sealed.proof.combined_hash, CREATOR)
        .await
        .unwrap_err();
    assert!(matches!(err, VerisealError::IntegrityMismatch(_)));
}

#[tokio::test]
async fn test_corrupted_blob_fails_authentication() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let mut framed = pipeline.blobs().get(&sealed.locator).await.unwrap().unwrap();
    let last = framed.len() - 1;
    framed[last] ^= 0x01;
    pipeline
        .blobs()
        .overwrite(&sealed.locator, framed)
        .await
        .unwrap();

    let err = pipeline
        .retrieve(&sealed.proof.combined_hash, CREATOR)
        .await
        .unwrap_err();
    assert!(err.is_authentication_failure());
}

#[tokio::test]
async fn test_resealing_same_proof_conflicts() {
    let pipeline = pipeline();
    let first = pipeline.seal(image_request(original())).await.unwrap();

    // Rejected before a second frame is encrypted or stored.
    let err = pipeline.seal(image_request(original())).await.unwrap_err();
    assert!(matches!(err, VerisealError::Store(StoreError::AlreadyExists(_))));

    let entry = pipeline
        .ledger()
        .lookup(&first.proof.combined_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.content_locator, first.locator);
    assert_eq!(pipeline.ledger().len().await, 1);
    assert_eq!(pipeline.blobs().len().await, 1);
}

#[tokio::test]
async fn test_music_artifact_metadata() {
    let pipeline = pipeline();
    let sealed = pipeline
        .seal(GenerationRequest {
            prompt: "lofi beat with rain".into(),
            output: pseudo_random_bytes(b"mp3", 4_096),
            creator_id: "creator-42".into(),
            kind: ContentKind::Music {
                duration_ms: 180_000,
                genre: Some("lofi".into()),
            },
            created_at: Some(1_700_000_000_123),
        })
        .await
        .unwrap();

    let json = serde_json::to_value(&sealed.metadata).unwrap();
    assert_eq!(json["kind"], "music");
    assert_eq!(json["duration_ms"], 180_000);
    assert_eq!(json["genre"], "lofi");
    assert_eq!(json["creatorId"], "creator-42");
    assert_eq!(json["createdAt"], 1_700_000_000_123i64);
}

#[tokio::test]
async fn test_report_serializes_camel_case() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();
    let report = pipeline
        .verify(&sealed.proof.combined_hash, &original())
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["combinedHash"], sealed.proof.combined_hash.as_str());
    assert_eq!(json["contentLocator"], sealed.locator.as_str());
    assert_eq!(json["verdict"], "authentic");
    assert_eq!(json["similarity"]["method"], "sampled");
    assert!(json["steganalysis"]["primaryMethod"].is_string());
    assert!(json["steganalysis"]["indicators"]["lsbBias"].is_number());
}

#[tokio::test]
async fn test_ledger_entry_survives_export() {
    let pipeline = pipeline();
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let json = pipeline.ledger().export_json().await.unwrap();
    let restored = MemoryLedger::import_json(&json).unwrap();
    let entry = restored
        .lookup(&sealed.proof.combined_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.content_locator, sealed.locator);
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator failures
// ─────────────────────────────────────────────────────────────────────────────

/// A blob store whose backend is down.
struct Unreachable;

#[async_trait]
impl BlobStore for Unreachable {
    async fn put(&self, _: &[u8]) -> veriseal::store::Result<ContentLocator> {
        Err(StoreError::Backend("connection refused".into()))
    }

    async fn get(&self, _: &ContentLocator) -> veriseal::store::Result<Option<Vec<u8>>> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

#[tokio::test]
async fn test_backend_failure_leaves_ledger_untouched() -> anyhow::Result<()> {
    init_tracing();
    let pipeline = Pipeline::new(MemoryLedger::new(), Unreachable, config())?;

    let err = pipeline.seal(image_request(original())).await.unwrap_err();
    assert!(matches!(err, VerisealError::Store(StoreError::Backend(_))));
    assert!(!err.is_authentication_failure());
    assert!(pipeline.ledger().is_empty().await);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Embedding comparator
// ─────────────────────────────────────────────────────────────────────────────

/// Coarse byte histogram.
struct Histogram;

impl EmbeddingModel for Histogram {
    fn embed(&self, content: &[u8]) -> veriseal::forensics::Result<Embedding> {
        let mut bins = vec![0f32; 16];
        for &b in content {
            bins[usize::from(b >> 4)] += 1.0;
        }
        Ok(Embedding::new(bins))
    }

    fn name(&self) -> &str {
        "histogram"
    }
}

struct Offline;

impl EmbeddingModel for Offline {
    fn embed(&self, _: &[u8]) -> veriseal::forensics::Result<Embedding> {
        Err(ForensicsError::Embedding("model offline".into()))
    }
}

fn exact_pipeline(model: Arc<dyn EmbeddingModel>) -> Pipeline<MemoryLedger, MemoryBlobStore> {
    init_tracing();
    let config = PipelineConfig {
        method: ComparisonMethod::Exact,
        ..config()
    };
    Pipeline::new(MemoryLedger::new(), MemoryBlobStore::new(), config)
        .unwrap()
        .with_embedding_model(model)
}

#[tokio::test]
async fn test_exact_method_uses_model() {
    let pipeline = exact_pipeline(Arc::new(Histogram));
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    let edited = flip_bytes(&original(), 10, &mut rng);
    let report = pipeline
        .verify(&sealed.proof.combined_hash, &edited)
        .await
        .unwrap();
    assert_eq!(report.similarity.method, ComparisonMethod::Exact);
    assert!(report.similarity.breakdown.is_none());
    assert_eq!(report.verdict, Verdict::Authentic);
}

#[tokio::test]
async fn test_exact_method_falls_back_when_model_fails() {
    let pipeline = exact_pipeline(Arc::new(Offline));
    let sealed = pipeline.seal(image_request(original())).await.unwrap();

    let unrelated = pseudo_random_bytes(b"unrelated", 10_000);
    let report = pipeline
        .verify(&sealed.proof.combined_hash, &unrelated)
        .await
        .unwrap();
    assert_eq!(report.similarity.method, ComparisonMethod::Sampled);
    assert!(report.similarity.breakdown.is_some());
    assert_eq!(report.verdict, Verdict::Mismatch);
}
