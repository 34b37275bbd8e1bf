// Payload signing for MetaClaw artifacts
//
// Produces the ArtifactSignature a client attaches to an artifact record
// before registering it.

use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};

use crate::keys::{derive_key_id, encode_public_key};
use crate::types::{ArtifactSignature, SignaturePayload, ED25519};

/// Signs the canonical bytes of `payload` and returns a complete signature block.
///
/// This function:
/// 1. Canonicalizes the payload with JCS (RFC 8785)
/// 2. Signs the canonical bytes with Ed25519
/// 3. Fills in the base64 public key, the base64 signature and the derived key id
pub fn sign_payload(signing_key: &SigningKey, payload: &SignaturePayload) -> Result<ArtifactSignature> {
    let canonical_bytes = payload.canonical_bytes()?;
    let signature = signing_key.sign(&canonical_bytes);
    let verifying_key = signing_key.verifying_key();

    Ok(ArtifactSignature {
        algorithm: ED25519.to_string(),
        key_id: Some(derive_key_id(&verifying_key)),
        public_key: encode_public_key(&verifying_key),
        value: BASE64_STANDARD.encode(signature.to_bytes()),
    })
}
