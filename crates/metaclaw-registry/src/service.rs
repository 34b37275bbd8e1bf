//! Admission service: the operations the transport layer calls.

use std::sync::Arc;

use chrono::Utc;
use metaclaw_crypto::verify_payload;

use crate::error::RegistryError;
use crate::models::{Artifact, ArtifactKind, ListFilter, NewArtifact};
use crate::store::CatalogStore;
use crate::validate::validate;

/// Gatekeeper in front of the catalog store.
///
/// Holds no state besides the store handle; cloning is cheap.
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn CatalogStore>,
}

impl Registry {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Admits an artifact into the catalog.
    ///
    /// This function:
    /// 1. Validates the submission; nothing else runs if it is malformed
    /// 2. Verifies the attached signature, if any, over the submitted content fields
    /// 3. Defaults `createdAt` to now (UTC) and `metadata` to `{}`
    /// 4. Upserts the result and returns it as stored
    pub fn register(&self, input: NewArtifact) -> Result<Artifact, RegistryError> {
        let kind = validate(&input).inspect_err(|e| {
            tracing::warn!(kind = %input.kind, name = %input.name, error = %e, "artifact rejected");
        })?;

        let key_id = match &input.signature {
            Some(signature) => {
                let derived = verify_payload(signature, &input.signature_payload()).inspect_err(|e| {
                    tracing::warn!(
                        kind = %kind,
                        name = %input.name,
                        version = %input.version,
                        error = %e,
                        "artifact signature rejected"
                    );
                })?;
                Some(derived)
            }
            None => None,
        };

        let artifact = input.into_artifact(kind, Utc::now());
        self.store.upsert(artifact.clone()).inspect_err(|e| {
            tracing::error!(
                kind = %artifact.kind,
                name = %artifact.name,
                version = %artifact.version,
                error = %e,
                "failed to persist artifact"
            );
        })?;

        tracing::info!(
            kind = %artifact.kind,
            name = %artifact.name,
            version = %artifact.version,
            signed = key_id.is_some(),
            key_id = key_id.as_deref().unwrap_or("-"),
            "artifact registered"
        );
        Ok(artifact)
    }

    pub fn get(&self, kind: ArtifactKind, name: &str, version: &str) -> Option<Artifact> {
        self.store.get(kind, name, version)
    }

    pub fn list(&self, filter: &ListFilter) -> Vec<Artifact> {
        self.store.list(filter)
    }
}
