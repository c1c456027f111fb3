//! # chatlog-admin
//!
//! Operator CLI: initialise a record database, stage and import legacy
//! archives, and inspect stored records.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chatlog_core::{RecordId, ThreadId};
use chatlog_events::sqlite::{ListOptions, current_version};
use chatlog_events::{InfoRecord, InteractionStore};
use chatlog_settings::{ChatlogSettings, load_settings, load_settings_from_path};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

/// Chatlog record database administration.
#[derive(Parser, Debug)]
#[command(name = "chatlog-admin", about = "Chatlog record database administration")]
struct Cli {
    /// Path to the `SQLite` database (overrides settings).
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Settings file to load instead of `~/.chatlog/settings.json`.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and apply migrations.
    Init,
    /// Stage a legacy archive blob for import.
    Stage {
        /// Record ID the archive belongs to.
        unique_id: String,
        /// File holding the archive bytes.
        file: PathBuf,
    },
    /// Import every staged legacy archive.
    Import {
        /// Archives per transaction (overrides settings).
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Print a record as its JSON row.
    Show {
        /// Record ID.
        unique_id: String,
    },
    /// List the records in a thread, oldest first.
    List {
        /// Thread ID.
        thread_id: String,
        /// Maximum records to print.
        #[arg(long)]
        limit: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    if settings.logging.json {
        chatlog_core::logging::init_json_subscriber(&settings.logging.level);
    } else {
        chatlog_core::logging::init_subscriber(&settings.logging.level);
    }

    let db_path = PathBuf::from(&settings.storage.db_path);
    ensure_parent_dir(&db_path)?;
    let store = InteractionStore::open(&settings.storage)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

    match cli.command {
        Command::Init => {
            let conn = store.pool().get().context("Failed to get connection")?;
            let version = current_version(&conn)?;
            println!("{} at schema version {version}", db_path.display());
        }
        Command::Stage { unique_id, file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read archive: {}", file.display()))?;
            store.stage_legacy_archive(&RecordId::from(unique_id.as_str()), &bytes)?;
            info!(unique_id = %unique_id, bytes = bytes.len(), "archive staged");
        }
        Command::Import { batch_size } => {
            let batch_size = batch_size.unwrap_or(settings.legacy.import_batch_size);
            let report = store.import_legacy_archives(batch_size)?;
            println!(
                "imported {}, already present {}, failed {}",
                report.imported,
                report.already_present,
                report.failed.len()
            );
            for failed in &report.failed {
                println!("  {}: {}", failed.unique_id, failed.reason);
            }
        }
        Command::Show { unique_id } => {
            let Some(record) = store.get(&RecordId::from(unique_id.as_str()))? else {
                bail!("record not found: {unique_id}");
            };
            let row = record.to_row()?;
            println!("{}", serde_json::to_string_pretty(&row)?);
        }
        Command::List { thread_id, limit } => {
            let opts = ListOptions {
                limit,
                offset: None,
            };
            for record in store.list_for_thread(&ThreadId::from(thread_id.as_str()), &opts)? {
                println!("{}", summary_line(&record));
            }
        }
    }
    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<ChatlogSettings> {
    let mut settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => load_settings().context("Failed to load settings")?,
    };
    if let Some(path) = &cli.db_path {
        settings.storage.db_path = path.to_string_lossy().into_owned();
    }
    Ok(settings)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn summary_line(record: &InfoRecord) -> String {
    let row_id = record.row_id().map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "{row_id:>8}  {}  {:<32}  {}",
        format_timestamp(record.base().timestamp()),
        record.message_type(),
        record.unique_id()
    )
}

/// Render a millisecond epoch timestamp as RFC 3339.
fn format_timestamp(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| millis.to_string(), |t| t.to_rfc3339())
}
