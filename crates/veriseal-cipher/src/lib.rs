//! # Veriseal Cipher
//!
//! Authenticated encryption of artifacts before they leave the trust boundary.
//!
//! ## Overview
//!
//! Artifacts are encrypted with AES-256-GCM under a key derived from the
//! creator identifier, then framed into a fixed-layout binary payload that a
//! blob store can keep as an opaque object:
//!
//! ```text
//! [key_hash: 32][iv: 16][tag: 16][ciphertext: plaintext.len()]
//! ```
//!
//! - **Key derivation**: PBKDF2-HMAC-SHA256 over the lowercased creator id,
//!   fixed salt, 100,000 iterations, 32-byte output.
//! - **Key hash**: SHA-256 of the derived key, stored in the frame so a reader
//!   can tell "wrong creator" apart without running the cipher.
//! - **IV**: 16 fresh bytes from the OS random source for every encryption.
//!
//! Decryption always verifies the GCM tag. The key-hash pre-check is only a
//! faster, clearer rejection path; correctness never depends on it.
//!
//! ## Key Material
//!
//! The key is a pure function of a creator identifier that is not secret.
//! Anyone who knows the identifier can derive the key. Treat the encryption as
//! access scoping, not as confidentiality against a determined party.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use veriseal_cipher::{ContentCipher, CipherConfig};
//!
//! let cipher = ContentCipher::new(CipherConfig::default());
//! let sealed = cipher.seal(b"artifact bytes", "0xCreator").unwrap();
//! let opened = cipher.open(&sealed, "0xcreator").unwrap();
//! assert_eq!(opened, b"artifact bytes");
//! ```

pub mod crypto;
pub mod envelope;
pub mod error;

pub use crypto::{
    derive_key, AuthTag, CipherConfig, ContentKey, Iv, KeyHash, IV_LEN, KEY_DERIVATION_SALT,
    KEY_LEN, PBKDF2_ITERATIONS, TAG_LEN,
};
pub use envelope::{
    decrypt, encrypt, pack_payload, unpack_payload, ContentCipher, EncryptedPayload, HEADER_LEN,
};
pub use error::{AuthFailure, CipherError, Result};
