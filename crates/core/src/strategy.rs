//! Per-document update strategy resolution.
//!
//! The [`StrategyResolver`] decides how each conflicting document is
//! reconciled: either from a user prompt (through an injected
//! [`StrategyPrompter`]) or from an "apply to all" decision made earlier in the
//! same reconciliation call.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::Document;
use crate::errors::PromptError;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a document that changed locally is reconciled with the remote.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// The remote version wins (or the local file is removed if the remote
    /// has none).
    KeepRemote,
    /// The local version wins.
    KeepLocal,
    /// Structural union of local and remote content.
    UnionMerge,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Self::KeepRemote, Self::KeepLocal, Self::UnionMerge];

    /// Prompt label, worded for whether the remote holds the document.
    pub fn describe(&self, exists_remotely: bool) -> &'static str {
        match (self, exists_remotely) {
            (Self::KeepRemote, true) => "Keep the remote version",
            (Self::KeepRemote, false) => "Keep the remote version (deletes the local file)",
            (Self::KeepLocal, _) => "Keep the local version",
            (Self::UnionMerge, true) => "Merge the local and remote versions",
            (Self::UnionMerge, false) => "Merge the local and remote versions (uploads the local file)",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeepRemote => write!(f, "keep_remote"),
            Self::KeepLocal => write!(f, "keep_local"),
            Self::UnionMerge => write!(f, "union_merge"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_remote" | "remote" => Ok(Self::KeepRemote),
            "keep_local" | "local" => Ok(Self::KeepLocal),
            "union_merge" | "merge" => Ok(Self::UnionMerge),
            other => Err(format!(
                "invalid strategy '{}': use keep_remote, keep_local or union_merge",
                other
            )),
        }
    }
}

/// A prompter's answer for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptAnswer {
    pub strategy: Strategy,
    /// Reuse `strategy` for every remaining document in the batch.
    pub apply_to_all: bool,
}

impl PromptAnswer {
    pub fn once(strategy: Strategy) -> Self {
        Self {
            strategy,
            apply_to_all: false,
        }
    }

    pub fn for_all(strategy: Strategy) -> Self {
        Self {
            strategy,
            apply_to_all: true,
        }
    }
}

/// "Apply to all remaining" decision, scoped to one reconciliation call.
///
/// Once set it never changes for the remainder of the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyToAll {
    value: Option<Strategy>,
}

impl ApplyToAll {
    pub fn value(&self) -> Option<Strategy> {
        self.value
    }

    /// Record the decision. Later calls are ignored.
    pub fn set(&mut self, strategy: Strategy) {
        if self.value.is_none() {
            self.value = Some(strategy);
        }
    }
}

// ---------------------------------------------------------------------------
// Prompter capability
// ---------------------------------------------------------------------------

/// Asks the user how to reconcile one document.
///
/// Implementations block until the user answers. `remaining` counts the
/// documents still to be resolved in this batch, including this one; an
/// "apply to all" choice only makes sense when it is greater than one.
pub trait StrategyPrompter {
    fn ask_strategy(
        &mut self,
        document: &Document,
        exists_remotely: bool,
        remaining: usize,
    ) -> Result<PromptAnswer, PromptError>;
}

/// A prompter that replays a fixed script of answers.
///
/// Once the script is exhausted it falls back to `fallback` if set, and
/// otherwise fails with [`PromptError::Script`].
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<PromptAnswer>,
    fallback: Option<Strategy>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = PromptAnswer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Answer every prompt with `strategy`, never setting apply-to-all.
    pub fn always(strategy: Strategy) -> Self {
        Self {
            fallback: Some(strategy),
            ..Default::default()
        }
    }

    /// Relative paths of every document the prompter was asked about.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl StrategyPrompter for ScriptedPrompter {
    fn ask_strategy(
        &mut self,
        document: &Document,
        _exists_remotely: bool,
        _remaining: usize,
    ) -> Result<PromptAnswer, PromptError> {
        self.asked.push(document.relative_path().to_string());
        if let Some(answer) = self.answers.pop_front() {
            return Ok(answer);
        }
        match self.fallback {
            Some(strategy) => Ok(PromptAnswer::once(strategy)),
            None => Err(PromptError::Script(format!(
                "no scripted answer left for '{}'",
                document.relative_path()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves a strategy per document for one reconciliation call.
pub struct StrategyResolver<'p> {
    prompter: &'p mut dyn StrategyPrompter,
    apply_to_all: ApplyToAll,
}

impl<'p> StrategyResolver<'p> {
    /// Start a resolution pass with a fresh [`ApplyToAll`] decision.
    pub fn new(prompter: &'p mut dyn StrategyPrompter) -> Self {
        Self {
            prompter,
            apply_to_all: ApplyToAll::default(),
        }
    }

    /// Strategy for `document`: the apply-to-all value if set, else a prompt.
    pub fn resolve(
        &mut self,
        document: &Document,
        exists_remotely: bool,
        remaining: usize,
    ) -> Result<Strategy, PromptError> {
        if let Some(strategy) = self.apply_to_all.value() {
            debug!(path = %document, %strategy, "strategy applied to all");
            return Ok(strategy);
        }

        let answer = self
            .prompter
            .ask_strategy(document, exists_remotely, remaining)?;
        if answer.apply_to_all {
            info!(strategy = %answer.strategy, "applying strategy to all remaining documents");
            self.apply_to_all.set(answer.strategy);
        }
        debug!(path = %document, strategy = %answer.strategy, "strategy chosen");
        Ok(answer.strategy)
    }

    pub fn apply_to_all(&self) -> ApplyToAll {
        self.apply_to_all
    }
}
