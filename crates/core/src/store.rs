//! Collaborators that carry out reconciliation decisions.
//!
//! [`RemoteStore`] receives the batched fetch / push / merge queues and
//! reports success or failure per document. [`LocalFs`] removes stale local
//! documents. Retries, backoff and parallelism are the store's business; the
//! engine calls each batch once.

#[cfg(test)]
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::StoreError;

/// A batched remote operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Download the remote version over the local one.
    Fetch,
    /// Upload the local version over the remote one.
    Push,
    /// Union-merge local and remote, then store the result on both sides.
    UnionMerge,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Push => write!(f, "push"),
            Self::UnionMerge => write!(f, "union_merge"),
        }
    }
}

/// Per-document result of a batched remote operation.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub path: String,
    pub result: Result<(), StoreError>,
}

impl DispatchOutcome {
    pub fn ok(document: &Document) -> Self {
        Self {
            path: document.relative_path().to_string(),
            result: Ok(()),
        }
    }

    pub fn failed(document: &Document, error: StoreError) -> Self {
        Self {
            path: document.relative_path().to_string(),
            result: Err(error),
        }
    }
}

/// The remote content store.
pub trait RemoteStore {
    fn fetch(&mut self, documents: &[Document]) -> Vec<DispatchOutcome>;
    fn push(&mut self, documents: &[Document]) -> Vec<DispatchOutcome>;
    fn union_merge(&mut self, documents: &[Document]) -> Vec<DispatchOutcome>;
}

/// Local filesystem side effects.
pub trait LocalFs {
    fn delete(&mut self, document: &Document) -> std::io::Result<()>;
}

/// [`LocalFs`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFs;

impl LocalFs for StdFs {
    fn delete(&mut self, document: &Document) -> std::io::Result<()> {
        std::fs::remove_file(document.absolute_path())
    }
}

// ---------------------------------------------------------------------------
// Recording store
// ---------------------------------------------------------------------------

/// A [`RemoteStore`] that records every batch it receives.
///
/// Documents listed with [`fail_on`](Self::fail_on) are reported as
/// [`StoreError::NotFound`]; everything else succeeds.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingStore {
    calls: Vec<(Operation, Vec<String>)>,
    failing: HashSet<String>,
}

#[cfg(test)]
impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, rel_path: impl Into<String>) -> Self {
        self.failing.insert(rel_path.into());
        self
    }

    /// Every batch received so far, in call order.
    pub fn calls(&self) -> &[(Operation, Vec<String>)] {
        &self.calls
    }

    /// Every path received for `op`, across batches.
    pub fn paths_for(&self, op: Operation) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|(o, _)| *o == op)
            .flat_map(|(_, paths)| paths.iter().map(String::as_str))
            .collect()
    }

    fn record(&mut self, op: Operation, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.calls.push((
            op,
            documents
                .iter()
                .map(|d| d.relative_path().to_string())
                .collect(),
        ));
        documents
            .iter()
            .map(|doc| {
                if self.failing.contains(doc.relative_path()) {
                    DispatchOutcome::failed(doc, StoreError::NotFound(doc.to_string()))
                } else {
                    DispatchOutcome::ok(doc)
                }
            })
            .collect()
    }
}

#[cfg(test)]
impl RemoteStore for RecordingStore {
    fn fetch(&mut self, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.record(Operation::Fetch, documents)
    }

    fn push(&mut self, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.record(Operation::Push, documents)
    }

    fn union_merge(&mut self, documents: &[Document]) -> Vec<DispatchOutcome> {
        self.record(Operation::UnionMerge, documents)
    }
}
