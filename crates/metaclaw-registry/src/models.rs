//! Data model for the artifact catalog.

pub mod artifact;

pub use artifact::{Artifact, ArtifactKey, ArtifactKind, ListFilter, NewArtifact, DEFAULT_LIST_LIMIT};
