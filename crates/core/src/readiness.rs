//! Change detection: is a document a candidate for reconciliation?
//!
//! A document is ready when it is not ignored, exists locally, and its local
//! checksum differs from the checksum index. None of these checks can fail;
//! anything unexpected degrades to "not ready".

use tracing::trace;

use crate::checksum::ChecksumIndex;
use crate::document::Document;
use crate::ignore::IgnoreMatcher;

/// Why a document is or is not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// Excluded by an ignore rule.
    Ignored,
    /// Not present on the local filesystem.
    Missing,
    /// Local content matches the last synced checksum.
    Unchanged,
}

impl Readiness {
    /// Short human-readable label for logging and status output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Ignored => "ignored",
            Self::Missing => "missing",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Combines ignore rules and checksum state into a readiness predicate.
#[derive(Clone, Copy)]
pub struct ReadinessOracle<'a> {
    ignore: &'a dyn IgnoreMatcher,
    checksums: &'a ChecksumIndex,
}

impl<'a> ReadinessOracle<'a> {
    pub fn new(ignore: &'a dyn IgnoreMatcher, checksums: &'a ChecksumIndex) -> Self {
        Self { ignore, checksums }
    }

    /// Classify a document. Checks run in order: ignore, existence, checksum.
    pub fn check(&self, document: &Document) -> Readiness {
        let readiness = if self.ignore.matches(document.relative_path()) {
            Readiness::Ignored
        } else if !document.exists() {
            Readiness::Missing
        } else if !self.checksums.has_changed(document) {
            Readiness::Unchanged
        } else {
            Readiness::Ready
        };
        trace!(path = %document, readiness = %readiness, "readiness checked");
        readiness
    }

    pub fn ready(&self, document: &Document) -> bool {
        self.check(document) == Readiness::Ready
    }

    /// Whether the remote holds the document (the index has an entry for it).
    pub fn exists_remotely(&self, document: &Document) -> bool {
        self.checksums.contains(document.relative_path())
    }
}
