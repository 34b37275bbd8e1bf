// MetaClaw Crypto - Key generation, decoding and key-id derivation

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand_core::OsRng;

use crate::hash::sha256;
use crate::types::{ED25519, ED25519_PUBLIC_KEY_LEN};
use crate::verify::VerifyError;

/// Number of hash bytes kept in a derived key id.
const KEY_ID_HASH_BYTES: usize = 8;

/// Generates a new Ed25519 keypair using secure random bytes from the OS.
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// Derives the key identifier of an Ed25519 public key.
///
/// The identifier is `ed25519:` followed by the hex encoding of the first
/// eight bytes of SHA-256 over the raw 32-byte key. It depends on the key
/// alone, so a client-supplied label can never name a different signer.
pub fn derive_key_id(public_key: &VerifyingKey) -> String {
    let digest = sha256(public_key.as_bytes());
    format!("{}:{}", ED25519, hex::encode(&digest[..KEY_ID_HASH_BYTES]))
}

/// Decodes a base64 Ed25519 public key.
///
/// Fails with [`VerifyError::InvalidPublicKey`] when the text is not base64,
/// is not exactly 32 bytes, or is not a valid curve point.
pub fn decode_public_key(encoded: &str) -> Result<VerifyingKey, VerifyError> {
    let raw = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| VerifyError::InvalidPublicKey(format!("invalid base64: {}", e)))?;

    let raw_len = raw.len();
    let key_bytes: [u8; ED25519_PUBLIC_KEY_LEN] = raw.try_into().map_err(|_| {
        VerifyError::InvalidPublicKey(format!(
            "expected {} bytes, got {}",
            ED25519_PUBLIC_KEY_LEN, raw_len
        ))
    })?;

    VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| VerifyError::InvalidPublicKey(format!("not a valid ed25519 key: {}", e)))
}

/// Encodes a public key the way artifact signatures carry it.
pub fn encode_public_key(public_key: &VerifyingKey) -> String {
    BASE64_STANDARD.encode(public_key.as_bytes())
}
