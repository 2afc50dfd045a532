//! Proptest generators for property-based testing.

use proptest::prelude::*;

use veriseal_core::{generate_proof, ContentKind, ProofRecord};

/// Generate a wallet-style creator id (`0x` + 40 hex digits, mixed case).
pub fn wallet_creator_id() -> impl Strategy<Value = String> {
    "0x[0-9a-fA-F]{40}".prop_map(String::from)
}

/// Generate a non-empty creator identifier.
pub fn creator_id() -> impl Strategy<Value = String> {
    prop_oneof![
        wallet_creator_id(),
        "[a-z][a-z0-9-]{0,31}".prop_map(String::from),
    ]
}

/// Generate a reasonable timestamp (Unix ms, up to 2100).
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000
}

/// Generate prompt text, including non-ASCII.
pub fn prompt() -> impl Strategy<Value = String> {
    ".{0,200}".prop_map(String::from)
}

/// Generate non-empty artifact bytes of at most `max_len`.
pub fn artifact(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=max_len.max(1))
}

/// Generate a 16-byte IV.
pub fn iv_bytes() -> impl Strategy<Value = [u8; 16]> {
    any::<[u8; 16]>()
}

/// Generate a ContentKind.
pub fn content_kind() -> impl Strategy<Value = ContentKind> {
    prop_oneof![
        (1u32..=8192, 1u32..=8192, prop_oneof![Just("png"), Just("jpeg"), Just("webp")]).prop_map(
            |(width, height, format)| ContentKind::Image {
                width,
                height,
                format: format.to_string(),
            }
        ),
        (1u64..=600_000, prop::option::of("[a-z]{3,12}")).prop_map(|(duration_ms, genre)| {
            ContentKind::Music { duration_ms, genre }
        }),
    ]
}

/// Parameters for generating a proof.
#[derive(Debug, Clone)]
pub struct ProofParams {
    pub prompt: String,
    pub output: Vec<u8>,
    pub creator_id: String,
    pub created_at: i64,
}

impl Arbitrary for ProofParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (prompt(), artifact(512), creator_id(), timestamp())
            .prop_map(|(prompt, output, creator_id, created_at)| ProofParams {
                prompt,
                output,
                creator_id,
                created_at,
            })
            .boxed()
    }
}

/// Generate a proof from parameters.
pub fn proof_from_params(params: &ProofParams) -> veriseal_core::Result<ProofRecord> {
    generate_proof(
        &params.prompt,
        &params.output,
        &params.creator_id,
        params.created_at,
    )
}
