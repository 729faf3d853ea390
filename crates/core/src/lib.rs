//! themesync core library.
//!
//! This crate reconciles JSON documents between a local theme directory and a
//! remote content store: readiness checks, dependency ordering, conflict
//! strategy resolution, JSON union merge, and batched dispatch to the store.

pub mod checksum;
pub mod config;
pub mod dependency;
pub mod document;
pub mod engine;
pub mod errors;
pub mod ignore;
pub mod merge;
pub mod mirror;
pub mod readiness;
pub mod store;
pub mod strategy;

// Re-exports for convenience.
pub use checksum::ChecksumIndex;
pub use config::AppConfig;
pub use dependency::DependencySet;
pub use document::Document;
pub use engine::{DispatchQueues, DispatchReport, ReconcileEngine, ReconcileOptions};
pub use ignore::IgnoreRules;
pub use mirror::MirrorStore;
pub use readiness::{Readiness, ReadinessOracle};
pub use store::{LocalFs, Operation, RemoteStore, StdFs};
pub use strategy::{PromptAnswer, ScriptedPrompter, Strategy, StrategyPrompter};
