// SHA-256 hashing utilities for MetaClaw

use sha2::{Digest, Sha256};

/// Prefix used by OCI-style content digests.
pub const SHA256_DIGEST_PREFIX: &str = "sha256:";

/// Computes the SHA-256 hash of the input bytes and returns it as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

/// Computes the raw SHA-256 hash of the input bytes.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Returns an OCI-style content digest (`sha256:<64 hex>`) for the given bytes.
pub fn sha256_digest(bytes: &[u8]) -> String {
    format!("{}{}", SHA256_DIGEST_PREFIX, sha256_hex(bytes))
}
