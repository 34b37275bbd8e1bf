// JCS (JSON Canonicalization Scheme) - RFC 8785 canonical bytes for signing

use anyhow::Result;
use serde::Serialize;

/// Canonicalizes a serializable value according to RFC 8785 (JCS) and returns the UTF-8 bytes.
///
/// The value is first lowered into a generic `serde_json::Value` and only then
/// canonicalized, so the output never depends on struct field declaration
/// order or on the iteration order of any map inside the value:
/// - Object keys are sorted lexicographically (by UTF-16 code units)
/// - No insignificant whitespace
/// - Strings use the minimal JSON escaping
///
/// Signer and verifier must both go through this function.
pub fn jcs_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let generic = serde_json::to_value(value)?;
    let canonical = serde_jcs::to_string(&generic)?;
    Ok(canonical.into_bytes())
}
