// Signature verification for MetaClaw artifacts
//
// Checks an ArtifactSignature against the canonical payload of the artifact
// it is attached to.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use ed25519_dalek::{Signature, Verifier};

use crate::keys::{decode_public_key, derive_key_id};
use crate::types::{ArtifactSignature, SignaturePayload, ED25519};

/// Reasons a signature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("unsupported signature algorithm: '{0}' (expected 'ed25519')")]
    UnsupportedAlgorithm(String),

    #[error("invalid signature publicKey: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature value encoding: {0}")]
    InvalidSignatureEncoding(String),

    #[error("signature verification failed: invalid signature")]
    SignatureMismatch,

    #[error("signature keyId mismatch: expected {expected} got {declared}")]
    KeyIdMismatch { expected: String, declared: String },

    #[error("failed to canonicalize signature payload: {0}")]
    Canonicalization(String),
}

/// Verifies `signature` over the canonical bytes of `payload`.
///
/// Checks run in a fixed order:
/// 1. The algorithm must be `ed25519`
/// 2. The public key must decode to a 32-byte Ed25519 key
/// 3. The signature value must be valid base64
/// 4. The signature must verify over the JCS-canonical payload
/// 5. A non-empty declared key id must equal the one derived from the key
///
/// Returns the derived key id on success.
pub fn verify_payload(
    signature: &ArtifactSignature,
    payload: &SignaturePayload,
) -> Result<String, VerifyError> {
    if signature.algorithm != ED25519 {
        return Err(VerifyError::UnsupportedAlgorithm(signature.algorithm.clone()));
    }

    let verifying_key = decode_public_key(&signature.public_key)?;

    let signature_bytes = BASE64_STANDARD
        .decode(&signature.value)
        .map_err(|e| VerifyError::InvalidSignatureEncoding(e.to_string()))?;

    let canonical_bytes = payload
        .canonical_bytes()
        .map_err(|e| VerifyError::Canonicalization(e.to_string()))?;

    // A well-encoded value of the wrong length can never verify.
    let ed_signature =
        Signature::from_slice(&signature_bytes).map_err(|_| VerifyError::SignatureMismatch)?;

    verifying_key
        .verify(&canonical_bytes, &ed_signature)
        .map_err(|_| VerifyError::SignatureMismatch)?;

    let derived = derive_key_id(&verifying_key);
    if let Some(declared) = signature.declared_key_id() {
        if declared != derived {
            return Err(VerifyError::KeyIdMismatch {
                expected: derived,
                declared: declared.to_string(),
            });
        }
    }

    Ok(derived)
}
