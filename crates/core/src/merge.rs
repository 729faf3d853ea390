//! Structural union merge of JSON documents.
//!
//! Used when both the local and remote copy of a document changed and the
//! user asked to keep both. Objects are unioned key by key, arrays are unioned
//! element by element, and where the two sides hold different scalar values
//! the local value wins and the location is reported.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::MergeError;

/// The result of a union merge.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Pretty-printed merged document, terminated by a newline.
    pub merged_content: String,
    /// JSON pointers where local and remote disagreed on a scalar value.
    pub conflicts: Vec<String>,
}

impl MergeResult {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Stateless JSON union merge engine.
pub struct Merger;

impl Merger {
    /// Merge `local` and `remote` JSON text.
    pub fn union_merge(local: &str, remote: &str) -> Result<MergeResult, MergeError> {
        info!("performing JSON union merge");

        let local_value = parse(local, "local")?;
        let remote_value = parse(remote, "remote")?;

        let mut conflicts = Vec::new();
        let merged = union_values(remote_value, local_value, "", &mut conflicts);

        let mut merged_content = serde_json::to_string_pretty(&merged)
            .map_err(|e| MergeError::Serialize(e.to_string()))?;
        merged_content.push('\n');

        debug!(conflicts = conflicts.len(), "union merge complete");
        Ok(MergeResult {
            merged_content,
            conflicts,
        })
    }
}

fn parse(content: &str, side: &'static str) -> Result<Value, MergeError> {
    serde_json::from_str(content).map_err(|e| MergeError::InvalidJson {
        side,
        detail: e.to_string(),
    })
}

/// Union `local` into `remote`. Remote ordering comes first.
fn union_values(remote: Value, local: Value, pointer: &str, conflicts: &mut Vec<String>) -> Value {
    match (remote, local) {
        (Value::Object(remote), Value::Object(local)) => {
            Value::Object(union_objects(remote, local, pointer, conflicts))
        }
        (Value::Array(remote), Value::Array(local)) => {
            let mut merged = remote;
            for item in local {
                if !merged.contains(&item) {
                    merged.push(item);
                }
            }
            Value::Array(merged)
        }
        (remote, local) => {
            if remote != local {
                debug!(pointer, "scalar disagreement, keeping local value");
                conflicts.push(if pointer.is_empty() {
                    "/".to_string()
                } else {
                    pointer.to_string()
                });
            }
            local
        }
    }
}

fn union_objects(
    remote: Map<String, Value>,
    local: Map<String, Value>,
    pointer: &str,
    conflicts: &mut Vec<String>,
) -> Map<String, Value> {
    let mut local: Vec<(String, Value)> = local.into_iter().collect();
    let mut merged = Map::new();
    for (key, remote_value) in remote {
        let shared = local.iter().position(|(k, _)| *k == key);
        let value = match shared.map(|idx| local.remove(idx).1) {
            Some(local_value) => {
                let child = format!("{}/{}", pointer, escape_pointer(&key));
                union_values(remote_value, local_value, &child, conflicts)
            }
            None => remote_value,
        };
        merged.insert(key, value);
    }
    // Keys only present locally, in local order.
    for (key, local_value) in local {
        merged.insert(key, local_value);
    }
    merged
}

/// Escape a key for use in a JSON pointer (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
