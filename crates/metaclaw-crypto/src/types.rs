//! Type definitions for signed registry artifacts.
//!
//! A signature never covers the whole wire record. It covers a
//! [`SignaturePayload`]: the content fields of an artifact, canonicalized with
//! RFC 8785 JCS. Server-assigned fields such as the creation timestamp are
//! not covered.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::jcs::jcs_canonical_bytes;

/// The only signature algorithm accepted by the registry.
pub const ED25519: &str = "ed25519";

/// Length in bytes of a raw Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;

/// The content fields of an artifact that a signature commits to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignaturePayload {
    /// Artifact kind as it appears on the wire ("skill" or "capsule")
    pub kind: String,
    pub name: String,
    pub version: String,
    /// Location of the underlying image
    #[serde(rename = "ociRef")]
    pub oci_ref: String,
    /// Content digest, `sha256:<hex>`
    pub digest: String,
    /// Always present; absent metadata is signed as `{}`
    pub metadata: BTreeMap<String, String>,
}

impl SignaturePayload {
    /// Returns the canonical bytes that are signed and verified.
    ///
    /// The encoding is RFC 8785 JCS, which writes `<`, `>` and `&` literally.
    /// Signers that HTML-escape them (as `\u003c`, `\u003e`, `\u0026`) produce
    /// different bytes, so their signatures over such payloads will not verify.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        jcs_canonical_bytes(self)
    }
}

/// A detached signature attached to an artifact record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSignature {
    /// Signature algorithm, e.g. "ed25519"
    pub algorithm: String,

    /// Optional declared key identifier; checked against the derived one when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// Base64-encoded raw public key
    pub public_key: String,

    /// Base64-encoded signature over the canonical payload
    pub value: String,
}

impl ArtifactSignature {
    /// Returns the declared key id, treating an empty string as absent.
    pub fn declared_key_id(&self) -> Option<&str> {
        self.key_id.as_deref().filter(|id| !id.is_empty())
    }
}
