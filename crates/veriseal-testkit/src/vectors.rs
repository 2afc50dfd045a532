//! Golden test vectors for deterministic verification.
//!
//! Expected values were computed with an independent SHA-256, PBKDF2 and
//! AES-GCM implementation. Any change to textual hash concatenation, key
//! derivation parameters or the 16-byte-IV GCM mode breaks them, and with
//! them every record and payload already persisted.

use veriseal_cipher::{ContentKey, Iv};
use veriseal_core::{generate_proof, hash_hex};

/// A proof golden vector.
#[derive(Debug, Clone)]
pub struct ProofVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub prompt: &'static str,
    pub output: &'static [u8],
    pub creator_id: &'static str,
    pub created_at: i64,
    pub expected_prompt_hash: &'static str,
    pub expected_output_hash: &'static str,
    pub expected_combined_hash: &'static str,
}

/// A key derivation golden vector (default parameters).
#[derive(Debug, Clone)]
pub struct KeyVector {
    pub name: &'static str,
    pub creator_id: &'static str,
    pub expected_key: &'static str,
    pub expected_key_hash: &'static str,
}

/// An AES-256-GCM golden vector under a derived key.
#[derive(Debug, Clone)]
pub struct CipherVector {
    pub name: &'static str,
    pub creator_id: &'static str,
    pub iv: [u8; 16],
    pub plaintext: &'static [u8],
    pub expected_ciphertext: &'static str,
    pub expected_tag: &'static str,
}

/// Get all proof vectors.
pub fn proof_vectors() -> Vec<ProofVector> {
    vec![
        ProofVector {
            name: "image proof with wallet creator",
            prompt: "a lighthouse at dusk, oil painting",
            output: b"\x89PNG\r\n\x1a\nfake-image-body",
            creator_id: "0xAbC0000000000000000000000000000000000001",
            created_at: 1736870400000,
            expected_prompt_hash: "ef6b32d3a93cd41710dff3d1f817b86228fe45dddecbb6aebd91b86e1040d692",
            expected_output_hash: "25c4e8b87268ef6ef63410612fab4647fcb91e66da73f96cf3ed74c9efbdfab0",
            expected_combined_hash:
                "7be1ea7678edbf82ac3eae7397a7fcaf39344221a78825aa871497112f54c3d8",
        },
        ProofVector {
            name: "music proof with plain creator",
            prompt: "lofi beat with rain",
            output: b"ID3\x04\x00fake-mp3",
            creator_id: "creator-42",
            created_at: 1700000000123,
            expected_prompt_hash: "4f546de7fb5b4c6799de8ec0f7a63ace8b4edd89937c322dd4d2e2c070245f95",
            expected_output_hash: "4d0cc10e2cde56aed5cb3145b128169dded07ad209a8b7a817886121d6f7b55d",
            expected_combined_hash:
                "f7ba949f028b782ad8d04dddfded33bca99dd242ef6f3fc179091aa86a376778",
        },
        ProofVector {
            name: "empty prompt at epoch",
            prompt: "",
            output: b"\x00",
            creator_id: "0x1",
            created_at: 0,
            expected_prompt_hash: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            expected_output_hash: "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d",
            expected_combined_hash:
                "cdc1d64561e7c2132efe89fda9605a8db169c17427fa20f829e650c502598526",
        },
    ]
}

/// Get all key derivation vectors.
pub fn key_vectors() -> Vec<KeyVector> {
    vec![
        KeyVector {
            name: "plain creator",
            creator_id: "creator-42",
            expected_key: "b614e0a68dda360282ddfadb2fb8628d0ae81357638c12d9c17f7c1a70126fa0",
            expected_key_hash: "b5a493ed432155f2c717088abcf79b89781112439c6adb74c5021f8975af8f46",
        },
        KeyVector {
            name: "mixed-case wallet creator",
            creator_id: "0xAbC0000000000000000000000000000000000001",
            expected_key: "2c5f2cff1fdaa01d0e3afae9af977158d7bdabb66a3797256087a85c9177bd12",
            expected_key_hash: "99b3f6a2a7d7e36fb8bb51317749f8f2c3cc70720dc3604e5d71f342aef9958c",
        },
    ]
}

/// Get all cipher vectors.
pub fn cipher_vectors() -> Vec<CipherVector> {
    vec![
        CipherVector {
            name: "counting IV",
            creator_id: "creator-42",
            iv: [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
            plaintext: b"sealed artifact bytes",
            expected_ciphertext: "e39987e3fdbf0fea54cac663cc03210154b136afb4",
            expected_tag: "339a6e8e4fefd8147738f788e049603d",
        },
        CipherVector {
            name: "constant IV, zero block",
            creator_id: "0xAbC0000000000000000000000000000000000001",
            iv: [0xA5; 16],
            plaintext: &[0u8; 32],
            expected_ciphertext:
                "90e780e7adcfab130ee18fce5a0b9704f94e2b922a6ac25af7904ef94a8e7c6d",
            expected_tag: "4c108e9bd2a37ca03d81b078c9596ee1",
        },
    ]
}

/// Verify all golden vectors against this implementation.
///
/// Returns `(name, matches, detail)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();

    for v in proof_vectors() {
        let outcome = generate_proof(v.prompt, v.output, v.creator_id, v.created_at);
        let (ok, detail) = match outcome {
            Ok(proof) => (
                proof.prompt_hash == v.expected_prompt_hash
                    && proof.output_hash == v.expected_output_hash
                    && proof.combined_hash == v.expected_combined_hash,
                proof.combined_hash,
            ),
            Err(e) => (false, e.to_string()),
        };
        results.push((v.name.to_string(), ok, detail));
    }

    for v in key_vectors() {
        let (ok, detail) = match veriseal_cipher::derive_key(v.creator_id) {
            Ok(key) => {
                let hex_key = hex::encode(key.as_bytes());
                (
                    hex_key == v.expected_key && key.key_hash().to_hex() == v.expected_key_hash,
                    key.key_hash().to_hex(),
                )
            }
            Err(e) => (false, e.to_string()),
        };
        results.push((v.name.to_string(), ok, detail));
    }

    for v in cipher_vectors() {
        let outcome = veriseal_cipher::derive_key(v.creator_id)
            .and_then(|key: ContentKey| key.encrypt(v.plaintext, &Iv::from_bytes(v.iv)));
        let (ok, detail) = match outcome {
            Ok((ciphertext, tag)) => (
                hex::encode(&ciphertext) == v.expected_ciphertext
                    && hex::encode(tag.as_bytes()) == v.expected_tag,
                hex::encode(tag.as_bytes()),
            ),
            Err(e) => (false, e.to_string()),
        };
        results.push((v.name.to_string(), ok, detail));
    }

    results
}

/// SHA-256 hex of a vector's output, for quick spot checks.
pub fn output_digest(v: &ProofVector) -> String {
    hash_hex(v.output)
}
