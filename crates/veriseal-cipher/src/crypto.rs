//! Key derivation and AES-256-GCM primitives.
//!
//! GCM runs with a 16-byte IV rather than the common 12-byte nonce, matching
//! the payload frame already used in storage.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

use veriseal_core::{Sha256Hash, ValidationError};

use crate::error::{AuthFailure, CipherError, Result};

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;
/// IV length in bytes.
pub const IV_LEN: usize = 16;
/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// PBKDF2 iteration count for key derivation.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Fixed salt for creator key derivation.
/// NOT secret. Changing it orphans every payload already in storage.
pub const KEY_DERIVATION_SALT: &[u8] = b"veriseal/content-cipher/v1";

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Key derivation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// PBKDF2 salt.
    pub salt: Vec<u8>,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
            salt: KEY_DERIVATION_SALT.to_vec(),
        }
    }
}

/// SHA-256 of a derived key, stored in the payload frame.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHash(pub [u8; 32]);

impl KeyHash {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({}...)", &self.to_hex()[..8])
    }
}

/// A 128-bit GCM initialization vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iv(pub [u8; IV_LEN]);

impl Iv {
    /// Generate a fresh IV from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

/// A 128-bit GCM authentication tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTag(pub [u8; TAG_LEN]);

impl AuthTag {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }
}

/// A 256-bit AES key derived from a creator identifier.
///
/// Zeroed on drop.
#[derive(Clone)]
pub struct ContentKey(Zeroizing<[u8; KEY_LEN]>);

impl ContentKey {
    /// Derive the key for `creator_id` with the given parameters.
    ///
    /// The identifier is lowercased first, so `0xAB` and `0xab` derive the
    /// same key.
    pub fn derive(creator_id: &str, config: &CipherConfig) -> Result<Self> {
        if creator_id.is_empty() {
            return Err(ValidationError::EmptyCreatorId.into());
        }
        if config.iterations == 0 {
            return Err(ValidationError::InvalidArgument(
                "key derivation needs at least one iteration".into(),
            )
            .into());
        }

        let normalized = creator_id.to_lowercase();
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha256>(
            normalized.as_bytes(),
            &config.salt,
            config.iterations,
            &mut *key,
        );
        Ok(Self(key))
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get the raw bytes (secret key material).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// SHA-256 of the key.
    pub fn key_hash(&self) -> KeyHash {
        KeyHash(Sha256Hash::hash(&*self.0).0)
    }

    fn cipher(&self) -> Result<Aes256Gcm16> {
        Aes256Gcm16::new_from_slice(&*self.0).map_err(|e| CipherError::Encryption(e.to_string()))
    }

    /// Encrypt `plaintext`, returning the ciphertext and the detached tag.
    ///
    /// The ciphertext has exactly the plaintext's length.
    pub fn encrypt(&self, plaintext: &[u8], iv: &Iv) -> Result<(Vec<u8>, AuthTag)> {
        let cipher = self.cipher()?;
        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv.0), b"", &mut buffer)
            .map_err(|e| CipherError::Encryption(e.to_string()))?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);
        Ok((buffer, AuthTag(tag_bytes)))
    }

    /// Decrypt `ciphertext`, verifying the tag.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &Iv, tag: &AuthTag) -> Result<Vec<u8>> {
        let cipher = self.cipher()?;
        let mut buffer = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(&iv.0),
                b"",
                &mut buffer,
                Tag::from_slice(&tag.0),
            )
            .map_err(|_| AuthFailure::TagMismatch)?;
        Ok(buffer)
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({:?})", self.key_hash())
    }
}

/// Derive the key for `creator_id` with the default parameters.
pub fn derive_key(creator_id: &str) -> Result<ContentKey> {
    ContentKey::derive(creator_id, &CipherConfig::default())
}
