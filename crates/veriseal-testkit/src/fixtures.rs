//! Test fixtures and helpers.
//!
//! Deterministic buffers, LSB embedding, and creator setups shared by the
//! integration tests and benchmarks.

use rand::seq::index;
use rand::Rng;
use sha2::{Digest, Sha256};

use veriseal_cipher::{CipherConfig, ContentCipher};
use veriseal_core::{generate_proof, ProofRecord};
use veriseal_store::{MemoryBlobStore, MemoryLedger};

/// PBKDF2 iterations used by fixtures. Far below production; tests only.
pub const FAST_KDF_ITERATIONS: u32 = 64;

/// Key derivation parameters that keep tests fast.
pub fn fast_cipher_config() -> CipherConfig {
    CipherConfig {
        iterations: FAST_KDF_ITERATIONS,
        ..CipherConfig::default()
    }
}

/// Deterministic pseudo-random bytes: SHA-256 in counter mode.
///
/// `sha256(seed || counter_le_u64)` blocks, concatenated and truncated.
/// Stable across platforms and independent of any RNG crate.
pub fn pseudo_random_bytes(seed: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + 32);
    let mut counter = 0u64;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(counter.to_le_bytes());
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(len);
    out
}

/// A buffer where every byte is `value`.
pub fn uniform_bytes(value: u8, len: usize) -> Vec<u8> {
    vec![value; len]
}

/// Hide `message` in the least-significant bits of `buf`.
///
/// Bits go most-significant first, one per byte, starting at `offset` and
/// advancing by `stride`.
///
/// # Panics
///
/// Panics if the message does not fit.
pub fn embed_lsb_message(buf: &mut [u8], message: &[u8], offset: usize, stride: usize) {
    let needed = offset + message.len() * 8 * stride;
    assert!(
        stride > 0 && needed < buf.len() + stride,
        "message of {} bytes does not fit",
        message.len()
    );

    let mut pos = offset;
    for byte in message {
        for bit in (0..8).rev() {
            buf[pos] = (buf[pos] & 0xFE) | ((byte >> bit) & 1);
            pos += stride;
        }
    }
}

/// Read back `len` bytes hidden by [`embed_lsb_message`].
pub fn extract_lsb_message(buf: &[u8], len: usize, offset: usize, stride: usize) -> Vec<u8> {
    (0..len)
        .map(|i| {
            (0..8).fold(0u8, |acc, bit| {
                let pos = offset + (i * 8 + bit) * stride;
                (acc << 1) | (buf[pos] & 1)
            })
        })
        .collect()
}

/// A 200-byte uppercase ASCII message with a strongly lopsided bit balance.
pub fn covert_message() -> Vec<u8> {
    b"HIDDEN PAYLOAD ".repeat(14)[..200].to_vec()
}

/// Copy of `buf` with `k` distinct positions XOR-ed with a non-zero byte.
pub fn flip_bytes<R: Rng + ?Sized>(buf: &[u8], k: usize, rng: &mut R) -> Vec<u8> {
    let mut out = buf.to_vec();
    for i in index::sample(rng, buf.len(), k.min(buf.len())) {
        out[i] ^= rng.gen_range(1..=255u8);
    }
    out
}

/// A test fixture with a creator identity and in-memory collaborators.
pub struct TestFixture {
    pub creator_id: String,
    pub cipher: ContentCipher,
    pub ledger: MemoryLedger,
    pub blobs: MemoryBlobStore,
}

impl TestFixture {
    /// Create a fixture for a fixed creator.
    pub fn new() -> Self {
        Self::with_creator("0xAbC0000000000000000000000000000000000001")
    }

    /// Create a fixture for `creator_id`.
    pub fn with_creator(creator_id: &str) -> Self {
        Self {
            creator_id: creator_id.to_string(),
            cipher: ContentCipher::new(fast_cipher_config()),
            ledger: MemoryLedger::new(),
            blobs: MemoryBlobStore::new(),
        }
    }

    /// Generate a proof for this creator.
    pub fn make_proof(
        &self,
        prompt: &str,
        output: &[u8],
        created_at: i64,
    ) -> veriseal_core::Result<ProofRecord> {
        generate_proof(prompt, output, &self.creator_id, created_at)
    }

    /// Encrypt and frame `output` for this creator.
    pub fn seal(&self, output: &[u8]) -> veriseal_cipher::Result<Vec<u8>> {
        self.cipher.seal(output, &self.creator_id)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures for `n` distinct creators.
pub fn multi_creator_fixtures(n: usize) -> Vec<TestFixture> {
    (0..n)
        .map(|i| TestFixture::with_creator(&format!("creator-{i}")))
        .collect()
}
