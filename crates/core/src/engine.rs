//! Reconciliation engine for JSON documents.
//!
//! The [`ReconcileEngine`] takes a batch of candidate documents from the
//! outer sync loop and turns it into remote operations:
//!
//! 1. Keep only documents that are ready (see [`ReadinessOracle`]).
//! 2. Move dependency documents after everything else.
//! 3. In overwrite mode, drop the dependency documents (they are flushed
//!    later by [`enqueue_delayed_files_updates`](ReconcileEngine::enqueue_delayed_files_updates))
//!    and push the rest unconditionally.
//! 4. Otherwise resolve a [`Strategy`] per document and dispatch the fetch,
//!    push and merge queues as batches.
//!
//! Classification never suspends except on the strategy prompt. A failed
//! prompt aborts the call before anything is sent to the remote store.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::checksum::ChecksumIndex;
use crate::dependency::DependencySet;
use crate::document::Document;
use crate::errors::{LocalDeleteError, PromptError, ReconcileError, StoreError};
use crate::ignore::IgnoreMatcher;
use crate::readiness::ReadinessOracle;
use crate::store::{DispatchOutcome, LocalFs, Operation, RemoteStore, StdFs};
use crate::strategy::{Strategy, StrategyPrompter, StrategyResolver};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Engine behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    /// Local always wins: no prompting, dependency documents flushed last.
    pub overwrite_json: bool,
    /// Documents applied after every other document.
    pub dependencies: DependencySet,
}

/// The four ordered queues produced by classification.
///
/// `delete` lists documents removed locally during classification; deletes
/// are never sent to the remote store. A failed delete is reported in
/// [`DispatchReport::delete_errors`] only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchQueues {
    pub fetch: Vec<Document>,
    pub delete: Vec<Document>,
    pub push: Vec<Document>,
    pub merge: Vec<Document>,
}

impl DispatchQueues {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.fetch.len() + self.delete.len() + self.push.len() + self.merge.len()
    }
}

/// A remote operation that failed for one document.
#[derive(Debug)]
pub struct DispatchFailure {
    pub op: Operation,
    pub path: String,
    pub error: StoreError,
}

/// Everything one reconciliation call did.
#[derive(Debug)]
pub struct DispatchReport {
    pub queues: DispatchQueues,
    /// Per-document remote failures. Not retried.
    pub failures: Vec<DispatchFailure>,
    /// Local deletes that failed during `keep_remote` resolution.
    pub delete_errors: Vec<LocalDeleteError>,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl DispatchReport {
    fn start() -> Self {
        Self {
            queues: DispatchQueues::default(),
            failures: Vec::new(),
            delete_errors: Vec::new(),
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    fn finish(mut self) -> Self {
        self.completed_at = Some(Utc::now().to_rfc3339());
        self
    }

    /// `true` when no remote operation and no local delete failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.delete_errors.is_empty()
    }

    fn record(&mut self, op: Operation, outcomes: Vec<DispatchOutcome>) {
        for outcome in outcomes {
            if let Err(error) = outcome.result {
                self.failures.push(DispatchFailure {
                    op,
                    path: outcome.path,
                    error,
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Decides, per document, whether the remote or local version wins and
/// dispatches the result to a [`RemoteStore`].
pub struct ReconcileEngine<S, F = StdFs> {
    root: PathBuf,
    options: ReconcileOptions,
    ignore: Box<dyn IgnoreMatcher>,
    checksums: ChecksumIndex,
    store: S,
    fs: F,
}

impl<S: RemoteStore> ReconcileEngine<S, StdFs> {
    /// Create an engine for the local theme at `root` that deletes through
    /// `std::fs`.
    pub fn new(
        root: impl Into<PathBuf>,
        options: ReconcileOptions,
        ignore: Box<dyn IgnoreMatcher>,
        checksums: ChecksumIndex,
        store: S,
    ) -> Self {
        Self::with_fs(root, options, ignore, checksums, store, StdFs)
    }
}

impl<S: RemoteStore, F: LocalFs> ReconcileEngine<S, F> {
    pub fn with_fs(
        root: impl Into<PathBuf>,
        options: ReconcileOptions,
        ignore: Box<dyn IgnoreMatcher>,
        checksums: ChecksumIndex,
        store: S,
        fs: F,
    ) -> Self {
        let root = root.into();
        info!(
            root = %root.display(),
            overwrite_json = options.overwrite_json,
            dependencies = ?options.dependencies.keys(),
            "initializing reconcile engine"
        );
        Self {
            root,
            options,
            ignore,
            checksums,
            store,
            fs,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the checksum index, e.g. after the caller refreshed it from
    /// the remote following a dispatch.
    pub fn set_checksums(&mut self, checksums: ChecksumIndex) {
        self.checksums = checksums;
    }

    pub fn oracle(&self) -> ReadinessOracle<'_> {
        ReadinessOracle::new(self.ignore.as_ref(), &self.checksums)
    }

    /// Build the document for a relative path under the local root.
    pub fn document(&self, rel_path: &str) -> Document {
        Document::new(&self.root, rel_path)
    }

    // -----------------------------------------------------------------------
    // Batch ordering & filtering
    // -----------------------------------------------------------------------

    /// Filter and order a batch without dispatching anything.
    ///
    /// Keeps ready documents, moves dependency documents last, and in
    /// overwrite mode drops them entirely.
    pub fn prepare_batch(&self, documents: Vec<Document>) -> Vec<Document> {
        let oracle = self.oracle();
        let candidates = documents.len();
        let ready: Vec<Document> = documents
            .into_iter()
            .filter(|doc| oracle.ready(doc))
            .collect();

        let ordered = self.options.dependencies.order_last(ready);
        let batch = if self.options.overwrite_json {
            self.options.dependencies.exclude(ordered)
        } else {
            ordered
        };

        debug!(candidates, batch = batch.len(), "prepared batch");
        batch
    }

    /// Reconcile a batch of candidate documents.
    ///
    /// In overwrite mode every ready non-dependency document is pushed and
    /// `prompter` is never called. Otherwise conflicts are resolved through
    /// [`handle_update_conflicts`](Self::handle_update_conflicts).
    pub fn enqueue_updates(
        &mut self,
        documents: Vec<Document>,
        prompter: &mut dyn StrategyPrompter,
    ) -> Result<DispatchReport, ReconcileError> {
        let batch = self.prepare_batch(documents);

        if !self.options.overwrite_json {
            return self.handle_update_conflicts(batch, prompter);
        }

        info!(count = batch.len(), "overwrite mode: pushing local documents");
        let mut report = DispatchReport::start();
        if !batch.is_empty() {
            let outcomes = self.store.push(&batch);
            report.record(Operation::Push, outcomes);
        }
        report.queues.push = batch;
        Ok(report.finish())
    }

    // -----------------------------------------------------------------------
    // Conflict resolution
    // -----------------------------------------------------------------------

    /// Resolve a strategy for every document, then dispatch the queues.
    ///
    /// `keep_remote` on a document the remote does not have deletes the local
    /// file immediately, during classification, rather than queueing it.
    /// Delete failures are collected and do not stop the pass.
    pub fn handle_update_conflicts(
        &mut self,
        documents: Vec<Document>,
        prompter: &mut dyn StrategyPrompter,
    ) -> Result<DispatchReport, ReconcileError> {
        let mut report = DispatchReport::start();
        report.queues = self.classify(documents, prompter, &mut report.delete_errors)?;

        info!(
            fetch = report.queues.fetch.len(),
            delete = report.queues.delete.len(),
            push = report.queues.push.len(),
            merge = report.queues.merge.len(),
            "dispatching resolved documents"
        );

        if !report.queues.fetch.is_empty() {
            let outcomes = self.store.fetch(&report.queues.fetch);
            report.record(Operation::Fetch, outcomes);
        }
        if !report.queues.push.is_empty() {
            let outcomes = self.store.push(&report.queues.push);
            report.record(Operation::Push, outcomes);
        }
        if !report.queues.merge.is_empty() {
            let outcomes = self.store.union_merge(&report.queues.merge);
            report.record(Operation::UnionMerge, outcomes);
        }

        Ok(report.finish())
    }

    fn classify(
        &mut self,
        documents: Vec<Document>,
        prompter: &mut dyn StrategyPrompter,
        delete_errors: &mut Vec<LocalDeleteError>,
    ) -> Result<DispatchQueues, PromptError> {
        let mut queues = DispatchQueues::default();
        let mut resolver = StrategyResolver::new(prompter);
        let total = documents.len();

        for (idx, doc) in documents.into_iter().enumerate() {
            let exists_remotely = self.checksums.contains(doc.relative_path());
            let strategy = resolver.resolve(&doc, exists_remotely, total - idx)?;

            match (strategy, exists_remotely) {
                (Strategy::KeepRemote, true) => queues.fetch.push(doc),
                (Strategy::KeepRemote, false) => {
                    debug!(path = %doc, "remote has no such document, deleting local copy");
                    match self.fs.delete(&doc) {
                        Ok(()) => queues.delete.push(doc),
                        Err(source) => {
                            warn!(path = %doc, error = %source, "failed to delete local document");
                            delete_errors.push(LocalDeleteError {
                                path: doc.relative_path().to_string(),
                                source,
                            });
                        }
                    }
                }
                (Strategy::KeepLocal, _) => queues.push.push(doc),
                (Strategy::UnionMerge, true) => queues.merge.push(doc),
                (Strategy::UnionMerge, false) => queues.push.push(doc),
            }
        }

        Ok(queues)
    }

    // -----------------------------------------------------------------------
    // Delayed dependency flush
    // -----------------------------------------------------------------------

    /// Push the dependency documents, one at a time, in dependency order.
    ///
    /// Does nothing outside overwrite mode: there the dependency documents
    /// already went through conflict resolution with the main batch. Call it
    /// only after the main batch dispatch has returned.
    pub fn enqueue_delayed_files_updates(&mut self) -> DispatchReport {
        let mut report = DispatchReport::start();
        if !self.options.overwrite_json {
            return report.finish();
        }

        let documents: Vec<Document> = self
            .options
            .dependencies
            .keys()
            .iter()
            .map(|key| self.document(key))
            .collect();

        for doc in documents {
            if !self.oracle().ready(&doc) {
                debug!(path = %doc, "dependency document not ready, skipping");
                continue;
            }
            info!(path = %doc, "pushing dependency document");
            let outcomes = self.store.push(std::slice::from_ref(&doc));
            report.record(Operation::Push, outcomes);
            report.queues.push.push(doc);
        }

        report.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::checksum;
    use crate::dependency::{SETTINGS_DATA, SETTINGS_SCHEMA};
    use crate::ignore::IgnoreRules;
    use crate::store::RecordingStore;
    use crate::strategy::{PromptAnswer, ScriptedPrompter};

    /// A [`LocalFs`] that records deletes and fails on chosen paths.
    #[derive(Default)]
    struct FakeFs {
        deleted: Vec<String>,
        fail: Vec<String>,
    }

    impl LocalFs for FakeFs {
        fn delete(&mut self, document: &Document) -> std::io::Result<()> {
            if self.fail.iter().any(|p| p == document.relative_path()) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                ));
            }
            self.deleted.push(document.relative_path().to_string());
            Ok(())
        }
    }

    struct Theme {
        dir: tempfile::TempDir,
        index: ChecksumIndex,
    }

    impl Theme {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                index: ChecksumIndex::new(),
            }
        }

        /// Write a local document that differs from the remote.
        fn changed(&mut self, rel: &str, remote: bool) -> Document {
            self.write(rel, "{\"local\":true}");
            if remote {
                self.index.insert(rel, checksum(b"{\"remote\":true}"));
            }
            Document::new(self.dir.path(), rel)
        }

        /// Write a local document identical to the remote.
        fn unchanged(&mut self, rel: &str) -> Document {
            self.write(rel, "{}");
            self.index.insert(rel, checksum(b"{}"));
            Document::new(self.dir.path(), rel)
        }

        fn write(&self, rel: &str, content: &str) {
            let path = self.dir.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        fn engine(&self, overwrite_json: bool) -> ReconcileEngine<RecordingStore, FakeFs> {
            self.engine_with_fs(overwrite_json, FakeFs::default())
        }

        fn engine_with_fs(
            &self,
            overwrite_json: bool,
            fs: FakeFs,
        ) -> ReconcileEngine<RecordingStore, FakeFs> {
            ReconcileEngine::with_fs(
                self.dir.path(),
                ReconcileOptions {
                    overwrite_json,
                    dependencies: DependencySet::default(),
                },
                Box::new(IgnoreRules::new(vec!["ignored/**".into()])),
                self.index.clone(),
                RecordingStore::new(),
                fs,
            )
        }
    }

    fn paths(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.relative_path()).collect()
    }

    #[test]
    fn test_prepare_batch_filters_and_orders() {
        let mut theme = Theme::new();
        let data = theme.changed(SETTINGS_DATA, true);
        let a = theme.changed("a.json", true);
        let same = theme.unchanged("same.json");
        let ignored = theme.changed("ignored/x.json", false);
        let missing = Document::new(theme.dir.path(), "missing.json");
        let schema = theme.changed(SETTINGS_SCHEMA, true);
        let b = theme.changed("b.json", false);

        let engine = theme.engine(false);
        let batch = engine.prepare_batch(vec![data, a, same, ignored, missing, schema, b]);
        assert_eq!(
            paths(&batch),
            vec!["a.json", "b.json", SETTINGS_DATA, SETTINGS_SCHEMA]
        );
    }

    #[test]
    fn test_prepare_batch_overwrite_drops_dependencies() {
        let mut theme = Theme::new();
        let schema = theme.changed(SETTINGS_SCHEMA, true);
        let a = theme.changed("a.json", true);
        let data = theme.changed(SETTINGS_DATA, true);

        let engine = theme.engine(true);
        let batch = engine.prepare_batch(vec![schema, a, data]);
        assert_eq!(paths(&batch), vec!["a.json"]);
    }

    #[test]
    fn test_dot_slash_dependency_key_still_excluded_and_flushed() {
        let mut theme = Theme::new();
        let a = theme.changed("a.json", true);
        let schema = theme.changed(SETTINGS_SCHEMA, true);

        let mut engine = ReconcileEngine::with_fs(
            theme.dir.path(),
            ReconcileOptions {
                overwrite_json: true,
                dependencies: DependencySet::new(["./config/settings_schema.json"]),
            },
            Box::new(IgnoreRules::default()),
            theme.index.clone(),
            RecordingStore::new(),
            FakeFs::default(),
        );
        let batch = engine.prepare_batch(vec![schema, a]);
        assert_eq!(paths(&batch), vec!["a.json"]);

        let report = engine.enqueue_delayed_files_updates();
        assert_eq!(paths(&report.queues.push), vec![SETTINGS_SCHEMA]);
    }

    #[test]
    fn test_overwrite_pushes_without_prompting() {
        let mut theme = Theme::new();
        let a = theme.changed("a.json", true);
        let b = theme.changed("b.json", false);
        let schema = theme.changed(SETTINGS_SCHEMA, true);

        let mut engine = theme.engine(true);
        let mut prompter = ScriptedPrompter::default();
        let report = engine
            .enqueue_updates(vec![a, schema, b], &mut prompter)
            .unwrap();

        assert!(prompter.asked().is_empty());
        assert_eq!(paths(&report.queues.push), vec!["a.json", "b.json"]);
        assert_eq!(
            engine.store().calls(),
            &[(Operation::Push, vec!["a.json".to_string(), "b.json".to_string()])]
        );
        assert!(report.is_success());
        assert!(report.completed_at.is_some());
    }

    #[test]
    fn test_overwrite_empty_batch_makes_no_call() {
        let mut theme = Theme::new();
        let same = theme.unchanged("a.json");
        let mut engine = theme.engine(true);
        let report = engine
            .enqueue_updates(vec![same], &mut ScriptedPrompter::default())
            .unwrap();
        assert!(report.queues.is_empty());
        assert!(engine.store().calls().is_empty());
    }

    #[test]
    fn test_classification_per_strategy() {
        let mut theme = Theme::new();
        let remote_keep = theme.changed("remote_keep.json", true);
        let local_only_keep = theme.changed("local_only_keep.json", false);
        let keep_local = theme.changed("keep_local.json", true);
        let merge = theme.changed("merge.json", true);
        let merge_local_only = theme.changed("merge_local_only.json", false);

        let mut engine = theme.engine(false);
        let mut prompter = ScriptedPrompter::new([
            PromptAnswer::once(Strategy::KeepRemote),
            PromptAnswer::once(Strategy::KeepRemote),
            PromptAnswer::once(Strategy::KeepLocal),
            PromptAnswer::once(Strategy::UnionMerge),
            PromptAnswer::once(Strategy::UnionMerge),
        ]);
        let report = engine
            .enqueue_updates(
                vec![remote_keep, local_only_keep, keep_local, merge, merge_local_only],
                &mut prompter,
            )
            .unwrap();

        assert_eq!(paths(&report.queues.fetch), vec!["remote_keep.json"]);
        assert_eq!(paths(&report.queues.delete), vec!["local_only_keep.json"]);
        assert_eq!(
            paths(&report.queues.push),
            vec!["keep_local.json", "merge_local_only.json"]
        );
        assert_eq!(paths(&report.queues.merge), vec!["merge.json"]);

        // Deletes are performed locally and never reach the remote store.
        assert_eq!(engine.fs.deleted, vec!["local_only_keep.json"]);
        let ops: Vec<Operation> = engine.store().calls().iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec![Operation::Fetch, Operation::Push, Operation::UnionMerge]);
    }

    #[test]
    fn test_keep_remote_absent_never_fetches() {
        let mut theme = Theme::new();
        let doc = theme.changed("new.json", false);
        let mut engine = theme.engine(false);
        let report = engine
            .enqueue_updates(vec![doc], &mut ScriptedPrompter::always(Strategy::KeepRemote))
            .unwrap();
        assert!(report.queues.fetch.is_empty());
        assert_eq!(paths(&report.queues.delete), vec!["new.json"]);
        assert!(engine.store().calls().is_empty());
    }

    #[test]
    fn test_union_merge_absent_degrades_to_push() {
        let mut theme = Theme::new();
        let doc = theme.changed("new.json", false);
        let mut engine = theme.engine(false);
        let report = engine
            .enqueue_updates(vec![doc], &mut ScriptedPrompter::always(Strategy::UnionMerge))
            .unwrap();
        assert!(report.queues.merge.is_empty());
        assert_eq!(paths(&report.queues.push), vec!["new.json"]);
        assert!(engine.store().paths_for(Operation::UnionMerge).is_empty());
    }

    #[test]
    fn test_apply_to_all_suppresses_later_prompts() {
        let mut theme = Theme::new();
        let a = theme.changed("a.json", true);
        let b = theme.changed("b.json", true);
        let c = theme.changed("c.json", true);
        let d = theme.changed("d.json", true);

        let mut engine = theme.engine(false);
        let mut prompter = ScriptedPrompter::new([
            PromptAnswer::once(Strategy::KeepRemote),
            PromptAnswer::for_all(Strategy::KeepLocal),
        ]);
        let report = engine
            .enqueue_updates(vec![a, b, c, d], &mut prompter)
            .unwrap();

        assert_eq!(prompter.asked(), &["a.json", "b.json"]);
        assert_eq!(paths(&report.queues.fetch), vec!["a.json"]);
        assert_eq!(paths(&report.queues.push), vec!["b.json", "c.json", "d.json"]);
    }

    #[test]
    fn test_prompt_failure_aborts_before_dispatch() {
        let mut theme = Theme::new();
        let a = theme.changed("a.json", true);
        let b = theme.changed("b.json", true);

        let mut engine = theme.engine(false);
        let mut prompter = ScriptedPrompter::new([PromptAnswer::once(Strategy::KeepLocal)]);
        let result = engine.enqueue_updates(vec![a, b], &mut prompter);

        assert!(matches!(
            result,
            Err(ReconcileError::Prompt(PromptError::Script(_)))
        ));
        assert!(engine.store().calls().is_empty());
    }

    #[test]
    fn test_immediate_delete_happens_before_prompt_failure() {
        // keep_remote on a local-only document deletes during classification,
        // so a later prompt failure cannot undo it.
        let mut theme = Theme::new();
        let local_only = theme.changed("local_only.json", false);
        let b = theme.changed("b.json", true);

        let mut engine = theme.engine(false);
        let mut prompter = ScriptedPrompter::new([PromptAnswer::once(Strategy::KeepRemote)]);
        let result = engine.enqueue_updates(vec![local_only, b], &mut prompter);

        assert!(result.is_err());
        assert_eq!(engine.fs.deleted, vec!["local_only.json"]);
        assert!(engine.store().calls().is_empty());
    }

    #[test]
    fn test_delete_error_collected_and_processing_continues() {
        let mut theme = Theme::new();
        let locked = theme.changed("locked.json", false);
        let other = theme.changed("other.json", false);
        let fetched = theme.changed("fetched.json", true);

        let fs = FakeFs {
            fail: vec!["locked.json".into()],
            ..Default::default()
        };
        let mut engine = theme.engine_with_fs(false, fs);
        let report = engine
            .enqueue_updates(
                vec![locked, other, fetched],
                &mut ScriptedPrompter::always(Strategy::KeepRemote),
            )
            .unwrap();

        assert_eq!(report.delete_errors.len(), 1);
        assert_eq!(report.delete_errors[0].path, "locked.json");
        assert_eq!(engine.fs.deleted, vec!["other.json"]);
        assert_eq!(paths(&report.queues.delete), vec!["other.json"]);
        assert_eq!(paths(&report.queues.fetch), vec!["fetched.json"]);
        assert!(!report.is_success());
    }

    #[test]
    fn test_dispatch_failures_reported_per_document() {
        let mut theme = Theme::new();
        let a = theme.changed("a.json", true);
        let b = theme.changed("b.json", true);

        let mut engine = ReconcileEngine::with_fs(
            theme.dir.path(),
            ReconcileOptions::default(),
            Box::new(IgnoreRules::default()),
            theme.index.clone(),
            RecordingStore::new().fail_on("b.json"),
            FakeFs::default(),
        );
        let report = engine
            .enqueue_updates(vec![a, b], &mut ScriptedPrompter::always(Strategy::KeepLocal))
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "b.json");
        assert_eq!(report.failures[0].op, Operation::Push);
        assert_eq!(engine.store().calls().len(), 1);
    }

    #[test]
    fn test_delayed_flush_noop_without_overwrite() {
        let mut theme = Theme::new();
        theme.changed(SETTINGS_SCHEMA, true);
        let mut engine = theme.engine(false);
        let report = engine.enqueue_delayed_files_updates();
        assert!(report.queues.is_empty());
        assert!(engine.store().calls().is_empty());
    }

    #[test]
    fn test_delayed_flush_pushes_ready_dependencies_one_by_one() {
        let mut theme = Theme::new();
        theme.changed(SETTINGS_SCHEMA, true);
        theme.changed(SETTINGS_DATA, false);

        let mut engine = theme.engine(true);
        let report = engine.enqueue_delayed_files_updates();

        assert_eq!(paths(&report.queues.push), vec![SETTINGS_SCHEMA, SETTINGS_DATA]);
        assert_eq!(
            engine.store().calls(),
            &[
                (Operation::Push, vec![SETTINGS_SCHEMA.to_string()]),
                (Operation::Push, vec![SETTINGS_DATA.to_string()]),
            ]
        );
    }

    #[test]
    fn test_delayed_flush_skips_unready() {
        let mut theme = Theme::new();
        theme.unchanged(SETTINGS_DATA);
        let mut engine = theme.engine(true);
        let report = engine.enqueue_delayed_files_updates();
        assert!(report.queues.push.is_empty());
        assert!(engine.store().calls().is_empty());
    }
}
