//! Ignore rules for candidate documents.
//!
//! [`IgnoreRules`] holds glob patterns from the `[sync]` config section and
//! answers whether a relative path is excluded from reconciliation. Anything
//! else that can answer that question (e.g. an ignore file loaded by the
//! outer sync loop) plugs in through [`IgnoreMatcher`].

use tracing::debug;

/// Decides whether a relative path is excluded from sync.
pub trait IgnoreMatcher {
    fn matches(&self, rel_path: &str) -> bool;
}

/// The outcome of evaluating a path against the ignore rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreDecision {
    /// Path passes all checks.
    Allow,
    /// Path matches an ignore pattern.
    Ignored { pattern: String },
}

/// Glob-based ignore rules, matched against forward-slash relative paths.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<String>,
}

impl IgnoreRules {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Evaluate a path. The first matching pattern wins.
    pub fn evaluate(&self, rel_path: &str) -> IgnoreDecision {
        let path = rel_path.replace('\\', "/");
        for pattern in &self.patterns {
            let pat = pattern.replace('\\', "/");
            if glob_match::glob_match(&pat, &path) {
                debug!(
                    path = rel_path,
                    pattern = pattern.as_str(),
                    "document matches ignore pattern"
                );
                return IgnoreDecision::Ignored {
                    pattern: pattern.clone(),
                };
            }
        }
        IgnoreDecision::Allow
    }
}

impl IgnoreMatcher for IgnoreRules {
    fn matches(&self, rel_path: &str) -> bool {
        matches!(self.evaluate(rel_path), IgnoreDecision::Ignored { .. })
    }
}
