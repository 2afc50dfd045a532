//! Encrypted payload envelope.
//!
//! An encrypted artifact travels to storage as a fixed-offset binary frame:
//!
//! ```text
//! offset  0: key_hash   (32 bytes)
//! offset 32: iv         (16 bytes)
//! offset 48: tag        (16 bytes)
//! offset 64: ciphertext (same length as the plaintext)
//! ```

use tracing::warn;
use veriseal_core::ValidationError;

use crate::crypto::{AuthTag, CipherConfig, ContentKey, Iv, KeyHash, IV_LEN, TAG_LEN};
use crate::error::{AuthFailure, Result};

const KEY_HASH_LEN: usize = 32;
const IV_OFFSET: usize = KEY_HASH_LEN;
const TAG_OFFSET: usize = IV_OFFSET + IV_LEN;

/// Length of the fixed header preceding the ciphertext.
pub const HEADER_LEN: usize = TAG_OFFSET + TAG_LEN;

/// An encrypted artifact with the metadata needed to decrypt it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// SHA-256 of the key the artifact was encrypted under.
    pub key_hash: KeyHash,
    /// IV used for encryption (unique per encryption).
    pub iv: Iv,
    /// Detached GCM tag.
    pub tag: AuthTag,
    /// The encrypted artifact.
    pub ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    /// Frame the payload into its binary storage layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_payload(&self.ciphertext, &self.iv, &self.tag, &self.key_hash)
    }

    /// Parse a payload from its binary storage layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        unpack_payload(bytes)
    }

    /// Whether this payload was encrypted under `key`.
    ///
    /// A cheap pre-check. A `true` here does not replace tag verification.
    pub fn matches_key(&self, key: &ContentKey) -> bool {
        self.key_hash == key.key_hash()
    }

    /// Decrypt with `key`, verifying the tag.
    pub fn decrypt_with(&self, key: &ContentKey) -> Result<Vec<u8>> {
        key.decrypt(&self.ciphertext, &self.iv, &self.tag)
    }

    /// Size of the framed payload in bytes.
    pub fn framed_len(&self) -> usize {
        HEADER_LEN + self.ciphertext.len()
    }
}

/// Frame ciphertext and metadata into `[key_hash][iv][tag][ciphertext]`.
pub fn pack_payload(ciphertext: &[u8], iv: &Iv, tag: &AuthTag, key_hash: &KeyHash) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    buf.extend_from_slice(key_hash.as_bytes());
    buf.extend_from_slice(iv.as_bytes());
    buf.extend_from_slice(tag.as_bytes());
    buf.extend_from_slice(ciphertext);
    buf
}

/// Split a framed payload back into its parts.
///
/// Fails if the buffer is shorter than the fixed header.
pub fn unpack_payload(bytes: &[u8]) -> Result<EncryptedPayload> {
    if bytes.len() < HEADER_LEN {
        return Err(ValidationError::PayloadTooShort {
            len: bytes.len(),
            min: HEADER_LEN,
        }
        .into());
    }

    let mut key_hash = [0u8; KEY_HASH_LEN];
    key_hash.copy_from_slice(&bytes[..IV_OFFSET]);
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&bytes[IV_OFFSET..TAG_OFFSET]);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&bytes[TAG_OFFSET..HEADER_LEN]);

    Ok(EncryptedPayload {
        key_hash: KeyHash(key_hash),
        iv: Iv(iv),
        tag: AuthTag(tag),
        ciphertext: bytes[HEADER_LEN..].to_vec(),
    })
}

/// Creator-bound encryption with configurable key derivation.
#[derive(Debug, Clone, Default)]
pub struct ContentCipher {
    config: CipherConfig,
}

impl ContentCipher {
    /// Create a cipher with the given key derivation parameters.
    pub fn new(config: CipherConfig) -> Self {
        Self { config }
    }

    /// The key derivation parameters in use.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Derive the key for a creator.
    pub fn derive_key(&self, creator_id: &str) -> Result<ContentKey> {
        ContentKey::derive(creator_id, &self.config)
    }

    /// Encrypt `plaintext` for `creator_id` under a fresh random IV.
    pub fn encrypt(&self, plaintext: &[u8], creator_id: &str) -> Result<EncryptedPayload> {
        if plaintext.is_empty() {
            return Err(ValidationError::EmptyInput("plaintext").into());
        }
        let key = self.derive_key(creator_id)?;
        let iv = Iv::generate();
        let (ciphertext, tag) = key.encrypt(plaintext, &iv)?;

        Ok(EncryptedPayload {
            key_hash: key.key_hash(),
            iv,
            tag,
            ciphertext,
        })
    }

    /// Decrypt for `creator_id`, verifying the tag.
    ///
    /// Fails with [`AuthFailure::TagMismatch`] for the wrong creator, a
    /// corrupted ciphertext or tag, or the wrong IV.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        iv: &Iv,
        tag: &AuthTag,
        creator_id: &str,
    ) -> Result<Vec<u8>> {
        if ciphertext.is_empty() {
            return Err(ValidationError::EmptyInput("ciphertext").into());
        }
        let key = self.derive_key(creator_id)?;
        key.decrypt(ciphertext, iv, tag).map_err(|e| {
            warn!(error = %e, "payload tag verification failed");
            e
        })
    }

    /// Encrypt and frame in one step.
    pub fn seal(&self, plaintext: &[u8], creator_id: &str) -> Result<Vec<u8>> {
        Ok(self.encrypt(plaintext, creator_id)?.to_bytes())
    }

    /// Unframe, pre-check the key hash, then decrypt.
    ///
    /// A key-hash mismatch fails fast with [`AuthFailure::KeyMismatch`];
    /// otherwise the tag is still verified.
    pub fn open(&self, framed: &[u8], creator_id: &str) -> Result<Vec<u8>> {
        let payload = unpack_payload(framed)?;
        if payload.ciphertext.is_empty() {
            return Err(ValidationError::EmptyInput("ciphertext").into());
        }

        let key = self.derive_key(creator_id)?;
        if !payload.matches_key(&key) {
            warn!(
                stored = %payload.key_hash.to_hex(),
                "payload key hash does not match requesting creator"
            );
            return Err(AuthFailure::KeyMismatch.into());
        }
        payload.decrypt_with(&key).map_err(|e| {
            warn!(error = %e, "payload tag verification failed");
            e
        })
    }
}

/// Encrypt with the default key derivation parameters.
pub fn encrypt(plaintext: &[u8], creator_id: &str) -> Result<EncryptedPayload> {
    ContentCipher::default().encrypt(plaintext, creator_id)
}

/// Decrypt with the default key derivation parameters.
pub fn decrypt(ciphertext: &[u8], iv: &Iv, tag: &AuthTag, creator_id: &str) -> Result<Vec<u8>> {
    ContentCipher::default().decrypt(ciphertext, iv, tag, creator_id)
}
