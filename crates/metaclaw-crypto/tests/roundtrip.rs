// Roundtrip test for signing and verification
//
// This test validates that:
// 1. A fresh key can sign an artifact payload
// 2. The signature verifies immediately
// 3. Changing any covered field breaks verification

use std::collections::BTreeMap;

use metaclaw_crypto::{
    derive_key_id, generate_keypair, sign_payload, verify_payload, SignaturePayload, VerifyError,
};

fn payload() -> SignaturePayload {
    SignaturePayload {
        kind: "skill".to_string(),
        name: "notes.summarize".to_string(),
        version: "v0.3.1".to_string(),
        oci_ref: "ghcr.io/x/skills/notes.summarize:v0.3.1".to_string(),
        digest: format!("sha256:{}", "c".repeat(64)),
        metadata: BTreeMap::from([
            ("license".to_string(), "MIT".to_string()),
            ("author".to_string(), "Test Agent".to_string()),
        ]),
    }
}

#[test]
fn test_signing_roundtrip() {
    let (signing_key, verifying_key) = generate_keypair();

    let signature = sign_payload(&signing_key, &payload()).expect("Signing should succeed");
    let derived = verify_payload(&signature, &payload()).expect("Verification should succeed");

    assert_eq!(derived, derive_key_id(&verifying_key));
}

#[test]
fn test_every_covered_field_is_bound() {
    let (signing_key, _) = generate_keypair();
    let signature = sign_payload(&signing_key, &payload()).expect("Signing should succeed");

    let tampers: Vec<fn(&mut SignaturePayload)> = vec![
        |p| p.kind = "capsule".to_string(),
        |p| p.name = "notes.summarise".to_string(),
        |p| p.version = "v0.3.2".to_string(),
        |p| p.oci_ref = "ghcr.io/y/skills/notes.summarize:v0.3.1".to_string(),
        |p| p.digest = format!("sha256:{}", "d".repeat(64)),
        |p| {
            p.metadata.insert("license".to_string(), "GPL-3.0".to_string());
        },
        |p| p.metadata.clear(),
    ];

    for (i, tamper) in tampers.into_iter().enumerate() {
        let mut tampered = payload();
        tamper(&mut tampered);
        assert_eq!(
            verify_payload(&signature, &tampered),
            Err(VerifyError::SignatureMismatch),
            "tamper #{} should break verification",
            i
        );
    }
}

#[test]
fn test_tampered_signature_bytes_fail() {
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use base64::Engine;

    let (signing_key, _) = generate_keypair();
    let mut signature = sign_payload(&signing_key, &payload()).expect("Signing should succeed");

    let mut raw = BASE64_STANDARD.decode(&signature.value).expect("decode");
    raw[0] ^= 0x01;
    signature.value = BASE64_STANDARD.encode(raw);

    assert_eq!(
        verify_payload(&signature, &payload()),
        Err(VerifyError::SignatureMismatch)
    );
}

#[test]
fn test_key_id_from_another_signer_is_rejected() {
    let (signing_key, _) = generate_keypair();
    let (_, other_key) = generate_keypair();

    let mut signature = sign_payload(&signing_key, &payload()).expect("Signing should succeed");
    signature.key_id = Some(derive_key_id(&other_key));

    assert!(matches!(
        verify_payload(&signature, &payload()),
        Err(VerifyError::KeyIdMismatch { .. })
    ));
}
