//! Versioned schema for the record database.
//!
//! v1 lays down the wide `interactions` row every info record variant
//! shares; v2 adds the `legacy_archives` staging table drained by the
//! pre-columnar import. Each step is embedded with [`include_str!`] and
//! applied in its own transaction, stamped in `schema_version`.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::errors::{RecordError, Result};

#[derive(Clone, Copy)]
struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// Ascending by version.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Interactions table with thread and type indexes",
        sql: include_str!("v001_interactions.sql"),
    },
    Migration {
        version: 2,
        description: "Staging table for legacy archive import",
        sql: include_str!("v002_legacy_archives.sql"),
    },
];

/// Bring the record schema up to [`latest_version`].
///
/// Versions at or below the recorded maximum are skipped, so reopening an
/// existing store is a no-op. A database stamped by a newer build is refused
/// rather than written with an older column layout.
///
/// # Errors
///
/// Returns [`RecordError::Migration`] if the stored schema is newer than
/// this build or any migration SQL fails.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    ensure_version_table(conn)?;
    let current = current_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(migration_error(format!(
            "record schema v{current} is newer than supported v{latest}"
        )));
    }

    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(
            version = migration.version,
            description = migration.description,
            "applying migration"
        );
        apply_migration(conn, migration)?;
        applied += 1;
    }

    if applied == 0 {
        debug!(version = current, "record schema up to date");
    } else {
        info!(applied, version = latest, "record schema migrated");
    }
    Ok(applied)
}

/// Highest applied migration version, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| migration_error(format!("failed to read schema_version: {e}")))
}

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn migration_error(message: String) -> RecordError {
    RecordError::Migration { message }
}

fn ensure_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
           version     INTEGER PRIMARY KEY,
           applied_at  TEXT    NOT NULL,
           description TEXT
         );",
    )
    .map_err(|e| migration_error(format!("failed to create schema_version table: {e}")))
}

/// Apply one migration and stamp it in `schema_version` atomically.
fn apply_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    let Migration { version, description, sql } = *migration;
    let step = |what: &str, e: rusqlite::Error| {
        migration_error(format!("v{version} ({description}) {what}: {e}"))
    };

    let tx = conn.unchecked_transaction().map_err(|e| step("could not begin", e))?;
    tx.execute_batch(sql).map_err(|e| step("failed", e))?;
    let _ = tx
        .execute(
            "INSERT INTO schema_version (version, applied_at, description) VALUES (?1, datetime('now'), ?2)",
            rusqlite::params![version, description],
        )
        .map_err(|e| step("could not be recorded", e))?;
    tx.commit().map_err(|e| step("could not commit", e))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
