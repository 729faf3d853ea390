//! Error types for the themesync core library.
//!
//! Each subsystem has its own error type derived with `thiserror`.
//!
//! Readiness checks have no error type: an unreadable or missing document is
//! simply not ready.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Reconciliation errors
// ---------------------------------------------------------------------------

/// Errors that abort a whole reconciliation call.
///
/// Per-document failures (local deletes, remote dispatch) are not here: they
/// are collected into the [`DispatchReport`](crate::engine::DispatchReport).
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The strategy prompt failed; nothing was dispatched to the remote.
    #[error("conflict resolution aborted: {0}")]
    Prompt(#[from] PromptError),
}

// ---------------------------------------------------------------------------
// Prompt errors
// ---------------------------------------------------------------------------

/// Errors raised by a [`StrategyPrompter`](crate::strategy::StrategyPrompter).
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user cancelled the prompt (Esc, Ctrl-C, closed stdin).
    #[error("prompt aborted by user")]
    Aborted,

    /// A scripted prompter ran out of answers or was misconfigured.
    #[error("scripted prompt failed: {0}")]
    Script(String),

    /// Terminal I/O failure while prompting.
    #[error("prompt I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Local delete errors
// ---------------------------------------------------------------------------

/// Failure to remove a stale local document during `keep_remote` resolution.
#[derive(Debug, Error)]
#[error("failed to delete local document '{path}': {source}")]
pub struct LocalDeleteError {
    /// Relative path of the document.
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

// ---------------------------------------------------------------------------
// Remote store errors
// ---------------------------------------------------------------------------

/// Per-document failures returned by a [`RemoteStore`](crate::store::RemoteStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document does not exist on the remote.
    #[error("remote document not found: {0}")]
    NotFound(String),

    /// The union merge of local and remote content failed.
    #[error("union merge failed: {0}")]
    Merge(#[from] MergeError),

    /// Generic I/O wrapper.
    #[error("store I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Merge errors
// ---------------------------------------------------------------------------

/// Errors from the JSON union merge.
#[derive(Debug, Error)]
pub enum MergeError {
    /// One side is not valid JSON.
    #[error("{side} content is not valid JSON: {detail}")]
    InvalidJson { side: &'static str, detail: String },

    /// Serializing the merged document failed.
    #[error("failed to serialize merged document: {0}")]
    Serialize(String),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = PromptError::Aborted;
        assert_eq!(err.to_string(), "prompt aborted by user");

        let err = LocalDeleteError {
            path: "config/settings_data.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("config/settings_data.json"));

        let err = MergeError::InvalidJson {
            side: "remote",
            detail: "expected value".into(),
        };
        assert_eq!(
            err.to_string(),
            "remote content is not valid JSON: expected value"
        );

        let err = ConfigError::InvalidValue {
            field: "sync.remote_dir".into(),
            detail: "must not be empty".into(),
        };
        assert!(err.to_string().contains("sync.remote_dir"));
    }

    #[test]
    fn test_from_conversions() {
        let reconcile: ReconcileError = PromptError::Script("empty".into()).into();
        assert!(matches!(reconcile, ReconcileError::Prompt(PromptError::Script(_))));

        let store: StoreError = MergeError::Serialize("boom".into()).into();
        assert!(matches!(store, StoreError::Merge(_)));
    }
}
