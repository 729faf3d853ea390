//! themesync command-line tool.
//!
//! Reconciles the JSON documents of a local theme with a remote copy, asking
//! how to resolve each conflicting document unless overwrite mode is on.

mod prompt;
mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use themesync_core::config::AppConfig;
use themesync_core::document::collect_json_paths;
use themesync_core::{
    ChecksumIndex, DispatchReport, Document, MirrorStore, Operation, ReconcileEngine,
    ScriptedPrompter, Strategy, StrategyPrompter,
};

use crate::prompt::DialoguerPrompter;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Sync theme JSON documents between a local directory and a remote copy.
#[derive(Parser, Debug)]
#[command(
    name = "themesync",
    version,
    about = "Reconcile local and remote theme JSON documents"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, global = true, default_value = "./themesync.toml")]
    config: PathBuf,

    /// Minimum log level (overrides the config file and RUST_LOG).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile every changed JSON document with the remote copy.
    Sync {
        /// Local always wins; dependency documents are pushed last.
        #[arg(long)]
        overwrite_json: bool,

        /// Resolve every conflict with this strategy instead of prompting
        /// (keep_remote, keep_local, union_merge).
        #[arg(long)]
        strategy: Option<Strategy>,
    },

    /// Show which documents would be reconciled.
    Status,

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = "./themesync.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style::error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

/// `--log-level`, then `RUST_LOG`, then the config's `log.level`, then `warn`.
fn init_tracing(cli: &Cli) {
    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = AppConfig::from_toml(
                &std::fs::read_to_string(&cli.config).unwrap_or_default(),
            )
            .map(|c| c.log.level)
            .unwrap_or_else(|_| "warn".into());
            EnvFilter::new(level)
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => cmd_validate(&cli.config),
        Commands::Status => {
            let config = load_config(&cli.config)?;
            cmd_status(&config)
        }
        Commands::Sync {
            overwrite_json,
            strategy,
        } => {
            let mut config = load_config(&cli.config)?;
            config.sync.overwrite_json |= overwrite_json;
            cmd_sync(&config, strategy)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(path: &Path) -> Result<AppConfig> {
    AppConfig::load_and_validate(path).context("failed to load configuration file")
}

/// Checksums of every JSON document in the remote copy. A remote directory
/// that does not exist yet is an empty remote.
fn remote_index(remote_dir: &Path) -> Result<ChecksumIndex> {
    if !remote_dir.exists() {
        debug!(remote = %remote_dir.display(), "remote directory missing, treating as empty");
        return Ok(ChecksumIndex::new());
    }
    ChecksumIndex::from_dir(remote_dir).with_context(|| {
        format!(
            "failed to read remote documents in {}",
            remote_dir.display()
        )
    })
}

fn local_documents(root: &Path) -> Result<Vec<Document>> {
    let paths = collect_json_paths(root)
        .with_context(|| format!("failed to list JSON documents in {}", root.display()))?;
    Ok(paths.into_iter().map(|p| Document::new(root, p)).collect())
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn cmd_sync(config: &AppConfig, strategy: Option<Strategy>) -> Result<()> {
    let root = &config.sync.root;
    let remote_dir = &config.sync.remote_dir;
    info!(root = %root.display(), remote = %remote_dir.display(), "starting sync");

    let documents = local_documents(root)?;
    let checksums = remote_index(remote_dir)?;

    let mut engine = ReconcileEngine::new(
        root.clone(),
        config.reconcile_options(),
        Box::new(config.ignore_rules()),
        checksums,
        MirrorStore::new(remote_dir.clone()),
    );

    let mut prompter: Box<dyn StrategyPrompter> = match strategy {
        Some(strategy) => Box::new(ScriptedPrompter::always(strategy)),
        None => Box::new(DialoguerPrompter::new()),
    };

    let batch = engine
        .enqueue_updates(documents, prompter.as_mut())
        .context("sync aborted")?;
    print_report("Documents", &batch);

    // Dependency documents are flushed against the remote state left by the
    // main batch.
    engine.set_checksums(remote_index(remote_dir)?);
    let delayed = engine.enqueue_delayed_files_updates();
    if !delayed.queues.is_empty() {
        print_report("Dependency documents", &delayed);
    }

    println!();
    if batch.is_success() && delayed.is_success() {
        println!("{}", style::success("Sync complete."));
        Ok(())
    } else {
        let failed = batch.failures.len()
            + batch.delete_errors.len()
            + delayed.failures.len()
            + delayed.delete_errors.len();
        anyhow::bail!("{} document(s) failed to sync", failed)
    }
}

fn print_report(title: &str, report: &DispatchReport) {
    println!();
    println!("{}", style::header(title));

    if report.queues.is_empty() {
        println!("  {}", style::dim("nothing to sync"));
        return;
    }

    let queues = [
        (Operation::Fetch, &report.queues.fetch),
        (Operation::Push, &report.queues.push),
        (Operation::UnionMerge, &report.queues.merge),
    ];
    for (op, docs) in queues {
        for doc in docs.iter() {
            println!("  {:<12} {}", style::operation(op), doc);
        }
    }
    for doc in &report.queues.delete {
        println!("  {:<12} {}", style::warn("delete"), doc);
    }

    for failure in &report.failures {
        println!(
            "  {}",
            style::error(&format!("{} {}: {}", failure.op, failure.path, failure.error))
        );
    }
    for err in &report.delete_errors {
        println!("  {}", style::error(&err.to_string()));
    }
}

fn cmd_status(config: &AppConfig) -> Result<()> {
    let documents = local_documents(&config.sync.root)?;
    let checksums = remote_index(&config.sync.remote_dir)?;
    let ignore = config.ignore_rules();
    let oracle = themesync_core::ReadinessOracle::new(&ignore, &checksums);
    let dependencies = config.dependency_set();

    println!("{}", style::header("themesync status"));
    println!();
    println!("  Local root   : {}", config.sync.root.display());
    println!("  Remote copy  : {}", config.sync.remote_dir.display());
    println!(
        "  Overwrite    : {}",
        if config.sync.overwrite_json { "yes" } else { "no" }
    );
    println!();

    if documents.is_empty() {
        println!("  {}", style::dim("no JSON documents found"));
        return Ok(());
    }

    let ordered = dependencies.order_last(documents);
    let mut ready = 0;
    for doc in &ordered {
        let readiness = oracle.check(doc);
        if readiness == themesync_core::Readiness::Ready {
            ready += 1;
        }
        let remote = if oracle.exists_remotely(doc) {
            style::dim("remote")
        } else {
            style::warn("local only")
        };
        let delayed = if dependencies.is_dependency(doc) {
            style::dim(" (applied last)")
        } else {
            String::new()
        };
        println!("  {} {}  {}{}", style::readiness(readiness), doc, remote, delayed);
    }

    println!();
    println!("  {} of {} document(s) ready to sync", ready, ordered.len());
    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    let config = AppConfig::default()
        .to_toml()
        .context("failed to render default configuration")?;
    let contents = format!(
        "# themesync configuration\n# Relative paths are resolved against this file's directory.\n\n{}",
        config
    );
    std::fs::write(output, contents).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!(
            "Default configuration written to {}",
            output.display()
        ))
    );
    println!();
    println!("Next steps:");
    println!("  1. Point sync.root at the local theme and sync.remote_dir at the remote copy");
    println!(
        "  2. Validate with: themesync validate --config {}",
        output.display()
    );
    println!("  3. Sync with: themesync sync --config {}", output.display());

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let mut config =
        AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("  {}", style::success("TOML structure is valid"));

    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    config.resolve_paths(base);

    if let Err(e) = config.validate() {
        println!("  {}", style::error(&format!("Validation error: {}", e)));
        anyhow::bail!("configuration validation failed");
    }
    println!("  {}", style::success("All fields are valid"));

    if !config.sync.root.is_dir() {
        println!(
            "  {}",
            style::warn(&format!(
                "local root {} does not exist",
                config.sync.root.display()
            ))
        );
    }

    println!();
    println!("Configuration summary:");
    println!("  Local root     : {}", config.sync.root.display());
    println!("  Remote copy    : {}", config.sync.remote_dir.display());
    println!("  Overwrite JSON : {}", config.sync.overwrite_json);
    println!(
        "  Ignore         : {}",
        if config.sync.ignore_patterns.is_empty() {
            "none".to_string()
        } else {
            config.sync.ignore_patterns.join(", ")
        }
    );
    println!(
        "  Applied last   : {}",
        config.sync.dependency_documents.join(", ")
    );
    println!("  Log level      : {}", config.log.level);
    println!();
    println!("Configuration is valid.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_sync_flags() {
        let cli = Cli::parse_from([
            "themesync",
            "--config",
            "theme.toml",
            "sync",
            "--overwrite-json",
            "--strategy",
            "keep_local",
        ]);
        assert_eq!(cli.config, PathBuf::from("theme.toml"));
        match cli.command {
            Commands::Sync {
                overwrite_json,
                strategy,
            } => {
                assert!(overwrite_json);
                assert_eq!(strategy, Some(Strategy::KeepLocal));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_strategy() {
        let result = Cli::try_parse_from(["themesync", "sync", "--strategy", "newest"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themesync.toml");
        cmd_init(&path).unwrap();

        let config = AppConfig::load_and_validate(&path).unwrap();
        assert_eq!(config.sync.root, dir.path().join("."));
        assert!(cmd_init(&path).is_err());
    }

    #[test]
    fn test_sync_with_strategy_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("theme");
        let remote = dir.path().join("remote");
        std::fs::create_dir_all(local.join("templates")).unwrap();
        std::fs::create_dir_all(remote.join("templates")).unwrap();
        std::fs::write(local.join("templates/index.json"), "{\"v\":\"local\"}").unwrap();
        std::fs::write(remote.join("templates/index.json"), "{\"v\":\"remote\"}").unwrap();

        let mut config = AppConfig::default();
        config.sync.root = local.clone();
        config.sync.remote_dir = remote.clone();
        cmd_sync(&config, Some(Strategy::KeepLocal)).unwrap();

        assert_eq!(
            std::fs::read_to_string(remote.join("templates/index.json")).unwrap(),
            "{\"v\":\"local\"}"
        );
    }

    #[test]
    fn test_remote_index_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = remote_index(&dir.path().join("nope")).unwrap();
        assert!(index.is_empty());
    }
}
