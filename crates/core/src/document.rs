//! Local documents taking part in a reconciliation.

use std::path::{Path, PathBuf};

/// A JSON document on the local filesystem.
///
/// `relative_path` is the stable key shared with the remote store and the
/// checksum index; it always uses forward slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    relative_path: String,
    absolute_path: PathBuf,
}

impl Document {
    /// Build a document for `relative_path` under the local `root`.
    pub fn new(root: &Path, relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into().replace('\\', "/");
        let absolute_path = root.join(&relative_path);
        Self {
            relative_path,
            absolute_path,
        }
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Whether the document currently exists as a regular file.
    pub fn exists(&self) -> bool {
        self.absolute_path.is_file()
    }

    /// Read the raw bytes of the local document.
    pub fn read(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.absolute_path)
    }

    /// Checksum of the current local content, or `None` if unreadable.
    pub fn checksum(&self) -> Option<String> {
        self.read().ok().map(|bytes| crate::checksum::checksum(&bytes))
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.relative_path)
    }
}

/// Recursively list the relative paths of every `*.json` file under `root`.
///
/// Hidden entries (starting with `.`) are skipped at every level. The result
/// is sorted so callers get a deterministic batch order.
pub fn collect_json_paths(root: &Path) -> std::io::Result<Vec<String>> {
    let mut paths = Vec::new();
    collect_inner(root, "", &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_inner(dir: &Path, prefix: &str, out: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let rel = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", prefix, name)
        };

        let path = entry.path();
        if path.is_dir() {
            collect_inner(&path, &rel, out)?;
        } else if rel.ends_with(".json") {
            out.push(rel);
        }
    }
    Ok(())
}
