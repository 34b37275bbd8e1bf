// Golden vector integration test for MetaClaw artifact signatures
//
// Validates the implementation against the canonical test vector in
// fixtures/golden_vectors.json. Any difference means signer and verifier
// implementations would disagree, so every value must match exactly.

use std::collections::BTreeMap;
use std::fs;

use ed25519_dalek::SigningKey;
use metaclaw_crypto::{
    derive_key_id, encode_public_key, sign_payload, verify_payload, SignaturePayload,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct GoldenPayload {
    kind: String,
    name: String,
    version: String,
    #[serde(rename = "ociRef")]
    oci_ref: String,
    digest: String,
    metadata: BTreeMap<String, String>,
}

/// Structure for parsing the golden vector file
#[derive(Deserialize)]
struct GoldenVector {
    seed_hex: String,
    public_key_base64: String,
    key_id: String,
    payload: GoldenPayload,
    canonical_jcs: String,
    signature_base64: String,
}

fn load_golden_vector() -> GoldenVector {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/golden_vectors.json");
    let content = fs::read_to_string(path).expect("Failed to read golden_vectors.json");
    serde_json::from_str(&content).expect("Failed to parse golden_vectors.json")
}

fn signing_key(golden: &GoldenVector) -> SigningKey {
    let seed: [u8; 32] = hex::decode(&golden.seed_hex)
        .expect("valid seed hex")
        .try_into()
        .expect("32 bytes");
    SigningKey::from_bytes(&seed)
}

fn payload(golden: &GoldenVector) -> SignaturePayload {
    SignaturePayload {
        kind: golden.payload.kind.clone(),
        name: golden.payload.name.clone(),
        version: golden.payload.version.clone(),
        oci_ref: golden.payload.oci_ref.clone(),
        digest: golden.payload.digest.clone(),
        metadata: golden.payload.metadata.clone(),
    }
}

#[test]
fn test_public_key_and_key_id() {
    let golden = load_golden_vector();
    let verifying_key = signing_key(&golden).verifying_key();

    assert_eq!(
        encode_public_key(&verifying_key),
        golden.public_key_base64,
        "Public key derivation mismatch"
    );
    assert_eq!(derive_key_id(&verifying_key), golden.key_id, "Key id mismatch");
}

#[test]
fn test_canonical_payload_bytes() {
    let golden = load_golden_vector();
    let canonical = payload(&golden).canonical_bytes().expect("canonicalize");

    assert_eq!(
        String::from_utf8(canonical).expect("utf-8"),
        golden.canonical_jcs,
        "Canonical payload mismatch"
    );
}

#[test]
fn test_signature_matches_vector() {
    let golden = load_golden_vector();
    let signature = sign_payload(&signing_key(&golden), &payload(&golden)).expect("sign");

    assert_eq!(signature.value, golden.signature_base64, "Signature mismatch");
    assert_eq!(signature.key_id.as_deref(), Some(golden.key_id.as_str()));
}

#[test]
fn test_vector_signature_verifies() {
    let golden = load_golden_vector();
    let signature = metaclaw_crypto::ArtifactSignature {
        algorithm: "ed25519".to_string(),
        key_id: Some(golden.key_id.clone()),
        public_key: golden.public_key_base64.clone(),
        value: golden.signature_base64.clone(),
    };

    let derived = verify_payload(&signature, &payload(&golden)).expect("vector should verify");
    assert_eq!(derived, golden.key_id);
}
