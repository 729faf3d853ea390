//! Remote-authoritative checksum index.
//!
//! The index maps a document's relative path to the checksum of the content
//! last seen on the remote. The engine only reads it; whoever drives the sync
//! loop refreshes it after dispatch completes.

use std::collections::HashMap;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::document::{collect_json_paths, Document};

/// Compute the checksum (lowercase hex SHA-256) of raw document content.
pub fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Mapping from relative path to last-known-synced checksum.
#[derive(Debug, Clone, Default)]
pub struct ChecksumIndex {
    entries: HashMap<String, String>,
}

impl ChecksumIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from the JSON documents currently stored under `dir`.
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let mut index = Self::new();
        for rel in collect_json_paths(dir)? {
            let bytes = std::fs::read(dir.join(&rel))?;
            index.insert(rel, checksum(&bytes));
        }
        debug!(dir = %dir.display(), entries = index.len(), "built checksum index");
        Ok(index)
    }

    pub fn insert(&mut self, path: impl Into<String>, checksum: impl Into<String>) {
        self.entries.insert(path.into(), checksum.into());
    }

    /// Recorded checksum for `path`, if the remote has that document.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    /// Whether the remote holds a document at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Whether the document's local content differs from the recorded remote
    /// checksum.
    ///
    /// A missing index entry counts as changed (first sync). An unreadable
    /// local document also counts as changed; existence is checked by the
    /// readiness oracle, not here.
    pub fn has_changed(&self, document: &Document) -> bool {
        match self.get(document.relative_path()) {
            None => true,
            Some(recorded) => document.checksum().as_deref() != Some(recorded),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
