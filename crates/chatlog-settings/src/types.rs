//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a partial
//! settings file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Root settings type.
///
/// ```json
/// {
///   "storage": { "dbPath": "/var/lib/chatlog/chatlog.db", "poolSize": 4 },
///   "logging": { "level": "debug" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatlogSettings {
    /// Database location and connection pool tuning.
    pub storage: StorageSettings,
    /// Log output configuration.
    pub logging: LoggingSettings,
    /// Legacy archive import behaviour.
    pub legacy: LegacySettings,
}

impl ChatlogSettings {
    /// Reject values that would make the storage layer unusable.
    pub fn validate(&self) -> Result<()> {
        if self.storage.pool_size == 0 {
            return Err(SettingsError::InvalidValue(
                "storage.poolSize must be at least 1".into(),
            ));
        }
        if self.legacy.import_batch_size == 0 {
            return Err(SettingsError::InvalidValue(
                "legacy.importBatchSize must be at least 1".into(),
            ));
        }
        if self.storage.db_path.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "storage.dbPath must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Database location and `SQLite` pool tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Path of the database file.
    pub db_path: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
    /// `PRAGMA busy_timeout` in milliseconds.
    pub busy_timeout_ms: u32,
    /// `PRAGMA cache_size` in KiB.
    pub cache_size_kib: i64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            pool_size: 16,
            busy_timeout_ms: 30_000,
            cache_size_kib: 8192,
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    format!("{home}/.chatlog/database/chatlog.db")
}

/// Log output configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Legacy archive import behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacySettings {
    /// Archives decoded per import transaction.
    pub import_batch_size: usize,
}

impl Default for LegacySettings {
    fn default() -> Self {
        Self {
            import_batch_size: 500,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
