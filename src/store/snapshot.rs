//! store::snapshot
//!
//! Versioned JSON persistence for a whole store.
//!
//! # Schema
//!
//! A snapshot is a single self-describing JSON document with a `kind` and
//! `version` header. Parsing is strict: an unknown kind, an unsupported
//! version, or a structurally invalid node set (missing parents, cycles,
//! cross-field edges) is rejected as a whole, never half-loaded.
//!
//! # Locking
//!
//! [`SnapshotLock`] provides an OS-level exclusive lock on a sibling
//! `.lock` file so two processes cannot interleave a load-modify-save
//! cycle. The lock is released on drop (RAII) and acquisition is
//! non-blocking.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{TaxonomyNode, TaxonomyStore};
use crate::core::types::{FieldId, ItemId, NodeId};

/// Snapshot document kind marker.
pub const SNAPSHOT_KIND: &str = "vocabtree/snapshot";

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write snapshot '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot: {0}")]
    ParseError(String),

    #[error("not a vocabtree snapshot (kind '{0}')")]
    WrongKind(String),

    #[error("unsupported snapshot version {0} (supported: {SCHEMA_VERSION})")]
    UnsupportedVersion(u32),

    #[error("invalid snapshot: {0}")]
    Invalid(String),

    #[error("snapshot is locked by another process")]
    AlreadyLocked,

    #[error("lock i/o error: {0}")]
    LockIo(std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct AssociationRow {
    node: NodeId,
    items: Vec<ItemId>,
}

/// The on-disk document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SnapshotV1 {
    kind: String,
    version: u32,
    saved_at: DateTime<Utc>,
    next_id: u64,
    nodes: Vec<TaxonomyNode>,
    associations: Vec<AssociationRow>,
    fields_needing_recount: Vec<FieldId>,
}

/// Serialize a store to its canonical JSON form.
///
/// Nodes are emitted in id order and associations in node order, so equal
/// stores produce byte-identical documents apart from `saved_at`.
pub fn to_json(store: &TaxonomyStore) -> Result<String, SnapshotError> {
    let (nodes, associations, flags, next_id) = store.to_parts();
    let doc = SnapshotV1 {
        kind: SNAPSHOT_KIND.to_string(),
        version: SCHEMA_VERSION,
        saved_at: Utc::now(),
        next_id,
        nodes,
        associations: associations
            .into_iter()
            .map(|(node, items)| AssociationRow {
                node,
                items: items.into_iter().collect(),
            })
            .collect(),
        fields_needing_recount: flags.into_iter().collect(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| SnapshotError::ParseError(e.to_string()))
}

/// Parse and validate a snapshot document into a store.
pub fn parse(json: &str) -> Result<TaxonomyStore, SnapshotError> {
    let doc: SnapshotV1 =
        serde_json::from_str(json).map_err(|e| SnapshotError::ParseError(e.to_string()))?;

    if doc.kind != SNAPSHOT_KIND {
        return Err(SnapshotError::WrongKind(doc.kind));
    }
    if doc.version != SCHEMA_VERSION {
        return Err(SnapshotError::UnsupportedVersion(doc.version));
    }

    let associations: BTreeMap<NodeId, BTreeSet<ItemId>> = doc
        .associations
        .into_iter()
        .map(|row| (row.node, row.items.into_iter().collect()))
        .collect();
    let flags: BTreeSet<FieldId> = doc.fields_needing_recount.into_iter().collect();

    TaxonomyStore::restore(doc.nodes, associations, flags, doc.next_id)
        .map_err(SnapshotError::Invalid)
}

/// A snapshot on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Point at a snapshot file (which need not exist yet).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load and validate the store from disk.
    pub fn load(&self) -> Result<TaxonomyStore, SnapshotError> {
        let json = fs::read_to_string(&self.path).map_err(|source| SnapshotError::ReadError {
            path: self.path.clone(),
            source,
        })?;
        parse(&json)
    }

    /// Write the store to disk.
    pub fn save(&self, store: &TaxonomyStore) -> Result<(), SnapshotError> {
        let json = to_json(store)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| SnapshotError::WriteError {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        fs::write(&self.path, json).map_err(|source| SnapshotError::WriteError {
            path: self.path.clone(),
            source,
        })
    }

    /// Acquire the exclusive lock guarding this snapshot.
    pub fn lock(&self) -> Result<SnapshotLock, SnapshotError> {
        SnapshotLock::acquire(&self.path)
    }
}

/// Exclusive lock over a snapshot file's load-modify-save cycle.
///
/// Released automatically on drop, even if the holder panics.
#[derive(Debug)]
pub struct SnapshotLock {
    file: File,
    path: PathBuf,
}

impl SnapshotLock {
    fn acquire(snapshot_path: &Path) -> Result<Self, SnapshotError> {
        let path = lock_path(snapshot_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(SnapshotError::LockIo)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(SnapshotError::LockIo)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file, path }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(SnapshotError::AlreadyLocked)
            }
            Err(e) => Err(SnapshotError::LockIo(e)),
        }
    }

    /// The lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

fn lock_path(snapshot_path: &Path) -> PathBuf {
    let mut name = snapshot_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    name.push(".lock");
    snapshot_path.with_file_name(name)
}
