//! Structural validation of artifact submissions.

use crate::error::ValidationError;
use crate::models::{ArtifactKind, NewArtifact};

const DIGEST_PREFIX: &str = "sha256:";
const DIGEST_HEX_LEN: usize = 64;

/// Checks the shape of a submission and returns its parsed kind.
///
/// Fields are trimmed only for checking; the submission itself is not
/// modified. Rules are applied in order: kind, name, version, ociRef, digest.
pub fn validate(artifact: &NewArtifact) -> Result<ArtifactKind, ValidationError> {
    let kind: ArtifactKind = artifact.kind.parse()?;

    if artifact.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if artifact.version.trim().is_empty() {
        return Err(ValidationError::MissingVersion);
    }
    if artifact.oci_ref.trim().is_empty() {
        return Err(ValidationError::MissingReference);
    }
    if !is_sha256_digest(artifact.digest.trim()) {
        return Err(ValidationError::InvalidDigest);
    }

    Ok(kind)
}

/// Returns true for `sha256:` followed by exactly 64 hex digits of either case.
pub fn is_sha256_digest(digest: &str) -> bool {
    match digest.strip_prefix(DIGEST_PREFIX) {
        Some(hex) => hex.len() == DIGEST_HEX_LEN && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
