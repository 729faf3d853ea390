//! Dependency documents and batch ordering.
//!
//! Dependency documents (by default the settings schema and settings data)
//! are applied only after every other document in a batch. The set is an
//! ordered list of relative paths.

use crate::document::Document;

/// Relative path of the settings schema document.
pub const SETTINGS_SCHEMA: &str = "config/settings_schema.json";

/// Relative path of the settings data document.
pub const SETTINGS_DATA: &str = "config/settings_data.json";

/// Ordered set of relative paths whose documents are applied last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    keys: Vec<String>,
}

impl Default for DependencySet {
    fn default() -> Self {
        Self::new([SETTINGS_SCHEMA, SETTINGS_DATA])
    }
}

impl DependencySet {
    /// Build a set from relative paths. Keys are normalized with
    /// [`normalize_key`]; duplicates keep their first position.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for key in keys {
            let key = normalize_key(&key.into());
            if !out.contains(&key) {
                out.push(key);
            }
        }
        Self { keys: out }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, rel_path: &str) -> bool {
        self.keys.iter().any(|k| k == rel_path)
    }

    pub fn is_dependency(&self, document: &Document) -> bool {
        self.contains(document.relative_path())
    }

    /// Stable-partition `documents` so dependency documents come after every
    /// other document. Relative order on both sides is preserved.
    pub fn order_last(&self, documents: Vec<Document>) -> Vec<Document> {
        let (mut ordered, delayed): (Vec<_>, Vec<_>) = documents
            .into_iter()
            .partition(|doc| !self.is_dependency(doc));
        ordered.extend(delayed);
        ordered
    }

    /// Drop dependency documents from `documents`, keeping the rest in order.
    pub fn exclude(&self, documents: Vec<Document>) -> Vec<Document> {
        documents
            .into_iter()
            .filter(|doc| !self.is_dependency(doc))
            .collect()
    }
}

/// Canonical form of a relative document path, matching the keys produced
/// by [`collect_json_paths`](crate::document::collect_json_paths): forward
/// slashes, no empty or `.` segments.
pub fn normalize_key(key: &str) -> String {
    key.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}
