// MetaClaw Crypto - Canonical payloads and signatures for registry artifacts

pub mod hash;
pub mod jcs;
pub mod keys;
pub mod sign;
pub mod types;
pub mod verify;

pub use hash::{sha256_digest, sha256_hex};
pub use jcs::jcs_canonical_bytes;
pub use keys::{decode_public_key, derive_key_id, encode_public_key, generate_keypair};
pub use sign::sign_payload;
pub use types::{ArtifactSignature, SignaturePayload, ED25519, ED25519_PUBLIC_KEY_LEN};
pub use verify::{verify_payload, VerifyError};
