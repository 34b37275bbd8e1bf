//! Artifact model for registered skills and capsules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use metaclaw_crypto::{ArtifactSignature, SignaturePayload};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default number of entries returned by a listing.
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Classification of a registered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Skill,
    Capsule,
}

impl ArtifactKind {
    /// Returns the wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Skill => "skill",
            ArtifactKind::Capsule => "capsule",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = ValidationError;

    /// Parses an exact wire name; no case folding or trimming.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(ArtifactKind::Skill),
            "capsule" => Ok(ArtifactKind::Capsule),
            other => Err(ValidationError::InvalidKind(other.to_string())),
        }
    }
}

/// Catalog slot of an artifact: kind plus normalized name and version.
///
/// Names compare case-insensitively and both names and versions ignore
/// surrounding whitespace. The stored record keeps its original spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub kind: ArtifactKind,
    pub name: String,
    pub version: String,
}

impl ArtifactKey {
    pub fn new(kind: ArtifactKind, name: &str, version: &str) -> Self {
        Self {
            kind,
            name: name.trim().to_lowercase(),
            version: version.trim().to_string(),
        }
    }
}

/// A registered artifact as stored in the catalog and returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub name: String,
    pub version: String,
    /// Content digest, `sha256:<64 hex>`.
    pub digest: String,
    /// Location of the underlying image.
    pub oci_ref: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<ArtifactSignature>,
}

impl Artifact {
    /// Returns the catalog slot this artifact occupies.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(self.kind, &self.name, &self.version)
    }
}

/// An artifact as submitted for registration, before admission.
///
/// `kind` stays a raw string so an unknown value surfaces as a validation
/// error instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtifact {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub oci_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<ArtifactSignature>,
}

impl NewArtifact {
    /// Returns the content fields a signature over this artifact covers.
    ///
    /// Absent metadata is projected as an empty map, so defaulting it on
    /// admission never changes what the client signed.
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

    /// Converts an admitted submission into a stored artifact.
    ///
    /// `now` is used only when the client left `createdAt` unset.
    pub fn into_artifact(self, kind: ArtifactKind, now: DateTime<Utc>) -> Artifact {
        Artifact {
            kind,
            name: self.name,
            version: self.version,
            digest: self.digest,
            oci_ref: self.oci_ref,
            created_at: self.created_at.unwrap_or(now),
            metadata: self.metadata.unwrap_or_default(),
            signature: self.signature,
        }
    }
}

impl From<Artifact> for NewArtifact {
    fn from(artifact: Artifact) -> Self {
        Self {
            kind: artifact.kind.as_str().to_string(),
            name: artifact.name,
            version: artifact.version,
            digest: artifact.digest,
            oci_ref: artifact.oci_ref,
            created_at: Some(artifact.created_at),
            metadata: Some(artifact.metadata),
            signature: artifact.signature,
        }
    }
}

/// Criteria for listing catalog entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Exact kind match.
    pub kind: Option<ArtifactKind>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Maximum number of entries; `None` or zero means [`DEFAULT_LIST_LIMIT`].
    pub limit: Option<usize>,
}

impl ListFilter {
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_LIST_LIMIT,
        }
    }

    /// Lower-cased, trimmed name query; `None` when blank.
    pub fn name_query(&self) -> Option<String> {
        self.name
            .as_deref()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        if let Some(kind) = self.kind {
            if artifact.kind != kind {
                return false;
            }
        }
        match self.name_query() {
            Some(query) => artifact.name.to_lowercase().contains(&query),
            None => true,
        }
    }
}
