//! Golden vectors through the public facade.
//!
//! Every deployment must produce identical:
//! - prompt_hash, output_hash, combined_hash (textual SHA-256 concatenation)
//! - derived key and key hash (PBKDF2-HMAC-SHA256, lowercased creator id)
//! - ciphertext and tag (AES-256-GCM, 16-byte IV)

use veriseal::cipher::{AuthTag, Iv, KeyHash};
use veriseal::{
    combined_hash, decrypt, derive_key, generate_proof, hash_hex, pack_payload, unpack_payload,
};
use veriseal_testkit::vectors::{cipher_vectors, key_vectors, proof_vectors, verify_all_vectors};

#[test]
fn test_all_vectors_verify() {
    let results = verify_all_vectors();
    assert_eq!(results.len(), 7);
    for (name, ok, detail) in results {
        assert!(ok, "vector '{name}' failed: {detail}");
    }
}

#[test]
fn test_combined_hash_from_component_hashes() {
    for v in proof_vectors() {
        let combined = combined_hash(
            &hash_hex(v.prompt.as_bytes()),
            &hash_hex(v.output),
            v.creator_id,
            v.created_at,
        );
        assert_eq!(combined, v.expected_combined_hash, "{}", v.name);
    }
}

#[test]
fn test_combined_hash_is_textual_concatenation() {
    let v = &proof_vectors()[1];
    let text = format!(
        "{}{}{}{}",
        v.expected_prompt_hash, v.expected_output_hash, v.creator_id, v.created_at
    );
    assert_eq!(hash_hex(text.as_bytes()), v.expected_combined_hash);
}

#[test]
fn test_proofs_are_creator_case_sensitive() {
    let v = &proof_vectors()[0];
    let lowered = generate_proof(
        v.prompt,
        v.output,
        &v.creator_id.to_lowercase(),
        v.created_at,
    )
    .unwrap();
    assert_ne!(lowered.combined_hash, v.expected_combined_hash);
}

#[test]
fn test_key_derivation_is_case_insensitive() {
    for v in key_vectors() {
        let upper = derive_key(&v.creator_id.to_uppercase()).unwrap();
        let lower = derive_key(&v.creator_id.to_lowercase()).unwrap();
        assert_eq!(hex::encode(upper.as_bytes()), v.expected_key, "{}", v.name);
        assert_eq!(upper.key_hash(), lower.key_hash());
    }
}

#[test]
fn test_cipher_vectors_decrypt() {
    for v in cipher_vectors() {
        let ciphertext = hex::decode(v.expected_ciphertext).unwrap();
        let tag: [u8; 16] = hex::decode(v.expected_tag).unwrap().try_into().unwrap();

        let plaintext = decrypt(
            &ciphertext,
            &Iv::from_bytes(v.iv),
            &AuthTag::from_bytes(tag),
            v.creator_id,
        )
        .unwrap();
        assert_eq!(plaintext, v.plaintext, "{}", v.name);
    }
}

#[test]
fn test_cipher_vector_frame_layout() {
    let v = &cipher_vectors()[0];
    let key = derive_key(v.creator_id).unwrap();
    let key_hash: KeyHash = key.key_hash();
    let ciphertext = hex::decode(v.expected_ciphertext).unwrap();
    let tag: [u8; 16] = hex::decode(v.expected_tag).unwrap().try_into().unwrap();

    let framed = pack_payload(
        &ciphertext,
        &Iv::from_bytes(v.iv),
        &AuthTag::from_bytes(tag),
        &key_hash,
    );
    let expected = format!(
        "{}{}{}{}",
        key_vectors()[0].expected_key_hash,
        hex::encode(v.iv),
        v.expected_tag,
        v.expected_ciphertext
    );
    assert_eq!(hex::encode(&framed), expected);

    let payload = unpack_payload(&framed).unwrap();
    assert!(payload.matches_key(&key));
    assert_eq!(payload.decrypt_with(&key).unwrap(), v.plaintext);
}

#[test]
fn test_tampered_vector_tag_is_rejected() {
    let v = &cipher_vectors()[1];
    let key = derive_key(v.creator_id).unwrap();
    let ciphertext = hex::decode(v.expected_ciphertext).unwrap();
    let mut tag: [u8; 16] = hex::decode(v.expected_tag).unwrap().try_into().unwrap();
    tag[0] ^= 0x80;

    let err = key
        .decrypt(&ciphertext, &Iv::from_bytes(v.iv), &AuthTag::from_bytes(tag))
        .unwrap_err();
    assert!(err.is_authentication_failure());
}
