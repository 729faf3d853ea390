//! TOML-based configuration for themesync.
//!
//! Relative paths in `[sync]` are resolved against the directory holding the
//! config file by [`AppConfig::resolve_paths`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dependency::{normalize_key, DependencySet, SETTINGS_DATA, SETTINGS_SCHEMA};
use crate::engine::ReconcileOptions;
use crate::errors::ConfigError;
use crate::ignore::IgnoreRules;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Sync behaviour settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

/// Sync behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Local theme root.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Directory mirrored as the remote store.
    #[serde(default = "default_remote_dir")]
    pub remote_dir: PathBuf,

    /// Local always wins; dependency documents are pushed last.
    #[serde(default)]
    pub overwrite_json: bool,

    /// Glob patterns (relative to `root`) that are never synced.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Documents applied after every other document, in this order.
    #[serde(default = "default_dependency_documents")]
    pub dependency_documents: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_remote_dir() -> PathBuf {
    PathBuf::from("../remote-theme")
}
fn default_dependency_documents() -> Vec<String> {
    vec![SETTINGS_SCHEMA.into(), SETTINGS_DATA.into()]
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            remote_dir: default_remote_dir(),
            overwrite_json: false,
            ignore_patterns: Vec::new(),
            dependency_documents: default_dependency_documents(),
        }
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize back to TOML, as written by `themesync init`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Make relative `root` and `remote_dir` relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.sync.root.is_relative() {
            self.sync.root = base.join(&self.sync.root);
        }
        if self.sync.remote_dir.is_relative() {
            self.sync.remote_dir = base.join(&self.sync.remote_dir);
        }
    }

    /// Validate semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.remote_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sync.remote_dir".into(),
                detail: "remote directory must not be empty".into(),
            });
        }

        let mut seen: Vec<String> = Vec::new();
        for key in &self.sync.dependency_documents {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "sync.dependency_documents".into(),
                    detail: "entries must not be empty".into(),
                });
            }
            if key.starts_with('/') || key.starts_with('\\') || Path::new(key).is_absolute() {
                return Err(ConfigError::InvalidValue {
                    field: "sync.dependency_documents".into(),
                    detail: format!("'{}' must be relative to the theme root", key),
                });
            }
            let normalized = normalize_key(key);
            if normalized.is_empty() || normalized.split('/').any(|segment| segment == "..") {
                return Err(ConfigError::InvalidValue {
                    field: "sync.dependency_documents".into(),
                    detail: format!("'{}' must name a document inside the theme root", key),
                });
            }
            if seen.contains(&normalized) {
                return Err(ConfigError::InvalidValue {
                    field: "sync.dependency_documents".into(),
                    detail: format!("'{}' is listed more than once", key),
                });
            }
            seen.push(normalized);
        }

        if self.sync.ignore_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "sync.ignore_patterns".into(),
                detail: "patterns must not be empty".into(),
            });
        }

        if !LOG_LEVELS.contains(&self.log.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".into(),
                detail: format!("'{}' is not one of {}", self.log.level, LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Load, resolve paths against the config file's directory, and validate.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::load_from_file(path)?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    pub fn ignore_rules(&self) -> IgnoreRules {
        IgnoreRules::new(self.sync.ignore_patterns.clone())
    }

    pub fn dependency_set(&self) -> DependencySet {
        DependencySet::new(self.sync.dependency_documents.iter().cloned())
    }

    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            overwrite_json: self.sync.overwrite_json,
            dependencies: self.dependency_set(),
        }
    }
}
