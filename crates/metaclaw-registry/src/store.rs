//! Catalog storage.
//!
//! The catalog lives in memory as the authoritative working copy and is
//! mirrored to a single JSON snapshot file. Every mutation rewrites the whole
//! snapshot. One readers-writer lock covers both the map and the snapshot
//! write, so no reader can observe memory and disk disagreeing.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::models::{Artifact, ArtifactKey, ArtifactKind, ListFilter};

/// Operations the admission service needs from a catalog backend.
pub trait CatalogStore: Send + Sync {
    /// Inserts or fully replaces the entry at the artifact's identity key.
    fn upsert(&self, artifact: Artifact) -> Result<(), StoreError>;

    /// Exact lookup; the name is matched case-insensitively, name and version ignore surrounding whitespace.
    fn get(&self, kind: ArtifactKind, name: &str, version: &str) -> Option<Artifact>;

    /// Filtered listing, newest first.
    fn list(&self, filter: &ListFilter) -> Vec<Artifact>;
}

type Catalog = HashMap<ArtifactKey, Artifact>;

/// File-backed catalog store.
#[derive(Debug)]
pub struct FileStore {
    /// `None` keeps the catalog in memory only.
    path: Option<PathBuf>,
    entries: RwLock<Catalog>,
}

impl FileStore {
    /// Opens the store backed by `path`, loading any existing snapshot.
    ///
    /// A missing or blank file yields an empty catalog. A file that cannot be
    /// read or parsed is an error: the caller must not serve an ambiguous
    /// catalog.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = load_snapshot(&path)?;
        tracing::info!(path = %path.display(), entries = entries.len(), "catalog loaded");
        Ok(Self {
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    /// Creates a store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Path of the backing snapshot, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoned guards are recovered: the catalog is only ever replaced whole.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Catalog> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Catalog> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &Catalog) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_snapshot(path, entries),
            None => Ok(()),
        }
    }
}

impl CatalogStore for FileStore {
    fn upsert(&self, artifact: Artifact) -> Result<(), StoreError> {
        let mut guard = self.write();

        // Apply to a copy and persist it first; the live map changes only
        // once the snapshot is durable.
        let mut next = guard.clone();
        next.insert(artifact.key(), artifact);
        self.persist(&next)?;
        *guard = next;

        Ok(())
    }

    fn get(&self, kind: ArtifactKind, name: &str, version: &str) -> Option<Artifact> {
        self.read().get(&ArtifactKey::new(kind, name, version)).cloned()
    }

    fn list(&self, filter: &ListFilter) -> Vec<Artifact> {
        let mut items: Vec<Artifact> = self
            .read()
            .values()
            .filter(|artifact| filter.matches(artifact))
            .cloned()
            .collect();

        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| b.version.cmp(&a.version))
        });
        items.truncate(filter.effective_limit());
        items
    }
}

fn load_snapshot(path: &Path) -> Result<Catalog, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let items: Vec<Artifact> =
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    // Duplicate keys in a hand-edited snapshot collapse last-wins.
    Ok(items
        .into_iter()
        .map(|artifact| (artifact.key(), artifact))
        .collect())
}

/// Renders the snapshot: entries sorted by (kind, name, version), pretty-printed, newline-terminated.
fn render_snapshot(entries: &Catalog) -> Result<Vec<u8>, StoreError> {
    let mut items: Vec<&Artifact> = entries.values().collect();
    items.sort_by(|a, b| {
        a.kind
            .as_str()
            .cmp(b.kind.as_str())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.version.cmp(&b.version))
    });

    let mut bytes = serde_json::to_vec_pretty(&items).map_err(StoreError::Serialize)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Replaces the snapshot atomically.
///
/// This function:
/// 1. Writes the rendered catalog to a randomly named temp file beside the snapshot
/// 2. Syncs the temp file and renames it over the snapshot
/// 3. Syncs the parent directory so the rename itself survives a crash
fn write_snapshot(path: &Path, entries: &Catalog) -> Result<(), StoreError> {
    let bytes = render_snapshot(entries)?;
    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(write_err)?;

    // Dropped (and removed) on any early return.
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.as_file_mut().write_all(&bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    sync_dir(dir).map_err(write_err)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
