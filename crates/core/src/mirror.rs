//! A remote store backed by a directory.
//!
//! [`MirrorStore`] treats a second directory tree as the remote copy of the
//! theme. It backs the CLI and the end-to-end tests; a hosted store plugs in
//! through the same [`RemoteStore`] trait.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::document::Document;
use crate::errors::StoreError;
use crate::merge::Merger;
use crate::store::{DispatchOutcome, RemoteStore};

/// Remote store mirroring documents into `remote_root`.
#[derive(Debug, Clone)]
pub struct MirrorStore {
    remote_root: PathBuf,
}

impl MirrorStore {
    pub fn new(remote_root: impl Into<PathBuf>) -> Self {
        Self {
            remote_root: remote_root.into(),
        }
    }

    pub fn remote_root(&self) -> &Path {
        &self.remote_root
    }

    fn remote_path(&self, document: &Document) -> PathBuf {
        self.remote_root.join(document.relative_path())
    }

    fn fetch_one(&self, document: &Document) -> Result<(), StoreError> {
        let src = self.remote_path(document);
        if !src.is_file() {
            return Err(StoreError::NotFound(document.to_string()));
        }
        copy_file(&src, document.absolute_path())?;
        debug!(path = %document, "fetched remote document");
        Ok(())
    }

    fn push_one(&self, document: &Document) -> Result<(), StoreError> {
        let dst = self.remote_path(document);
        copy_file(document.absolute_path(), &dst)?;
        debug!(path = %document, "pushed local document");
        Ok(())
    }

    fn merge_one(&self, document: &Document) -> Result<(), StoreError> {
        let remote_path = self.remote_path(document);
        if !remote_path.is_file() {
            return Err(StoreError::NotFound(document.to_string()));
        }
        let local = read_string(document.absolute_path())?;
        let remote = read_string(&remote_path)?;

        let result = Merger::union_merge(&local, &remote)?;
        if result.has_conflicts() {
            warn!(
                path = %document,
                conflicts = ?result.conflicts,
                "union merge kept local values where both sides differed"
            );
        }

        write_file(document.absolute_path(), &result.merged_content)?;
        write_file(&remote_path, &result.merged_content)?;
        debug!(path = %document, "union-merged document");
        Ok(())
    }

    fn run(
        &self,
        documents: &[Document],
        op: &str,
        f: impl Fn(&Self, &Document) -> Result<(), StoreError>,
    ) -> Vec<DispatchOutcome> {
        info!(op, count = documents.len(), remote = %self.remote_root.display(), "dispatching batch");
        documents
            .iter()
            .map(|doc| match f(self, doc) {
                Ok(()) => DispatchOutcome::ok(doc),
                Err(e) => {
                    warn!(op, path = %doc, error = %e, "document operation failed");
                    DispatchOutcome::failed(doc, e)
                }
            })
            .collect()
    }
}

impl RemoteStore for MirrorStore {
    fn fetch(&mut self, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.run(documents, "fetch", Self::fetch_one)
    }

    fn push(&mut self, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.run(documents, "push", Self::push_one)
    }

    fn union_merge(&mut self, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.run(documents, "union_merge", Self::merge_one)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<(), StoreError> {
    ensure_parent(dst)?;
    std::fs::copy(src, dst).map_err(|e| io_error(src, e))?;
    Ok(())
}

fn read_string(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    ensure_parent(path)?;
    std::fs::write(path, content).map_err(|e| io_error(path, e))
}
