// Artifact record files - the JSON a publisher signs and pushes to a registry

use anyhow::{anyhow, Context, Result};
use metaclaw_crypto::{ArtifactSignature, SignaturePayload};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// An artifact record as submitted to `POST /v1/artifacts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub kind: String,
    pub name: String,
    pub version: String,
    pub digest: String,
    pub oci_ref: String,
    /// Passed through untouched; the registry assigns one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<ArtifactSignature>,
}

impl ArtifactRecord {
    /// Loads a record from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read '{}': {}", path.display(), e))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact record '{}'", path.display()))
    }

    /// The content fields a signature over this record covers.
    pub fn signature_payload(&self) -> SignaturePayload {
        SignaturePayload {
            kind: self.kind.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            oci_ref: self.oci_ref.clone(),
            digest: self.digest.clone(),
            metadata: self.metadata.clone().unwrap_or_default(),
        }
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Output path for a signed record: `app.json` becomes `app.signed.json`.
pub fn signed_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!("{}.signed.json", stem))
}
