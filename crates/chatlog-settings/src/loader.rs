//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`ChatlogSettings::default()`]
//! 2. If `~/.chatlog/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `CHATLOG_*` environment variable overrides (highest priority)
//! 4. Validate the result
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::ChatlogSettings;

/// Resolve the path to the settings file (`~/.chatlog/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".chatlog").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ChatlogSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; a file with invalid JSON is an error.
pub fn load_settings_from_path(path: &Path) -> Result<ChatlogSettings> {
    load_with_env(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, resolving overrides through `env`.
pub fn load_with_env<F>(path: &Path, env: F) -> Result<ChatlogSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(ChatlogSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: ChatlogSettings = serde_json::from_value(merged)?;
    apply_overrides(&mut settings, env);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `CHATLOG_*` overrides looked up through `env`.
///
/// Invalid values are logged and ignored, leaving the file/default value.
pub fn apply_overrides<F>(settings: &mut ChatlogSettings, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| env(name).filter(|v| !v.is_empty());

    if let Some(v) = read("CHATLOG_DB_PATH") {
        settings.storage.db_path = v;
    }
    if let Some(v) = read("CHATLOG_POOL_SIZE") {
        match parse_u32_range(&v, 1, 64) {
            Some(n) => settings.storage.pool_size = n,
            None => warn!(key = "CHATLOG_POOL_SIZE", value = %v, "invalid env var, ignoring"),
        }
    }
    if let Some(v) = read("CHATLOG_BUSY_TIMEOUT_MS") {
        match parse_u32_range(&v, 0, 600_000) {
            Some(n) => settings.storage.busy_timeout_ms = n,
            None => warn!(key = "CHATLOG_BUSY_TIMEOUT_MS", value = %v, "invalid env var, ignoring"),
        }
    }
    if let Some(v) = read("CHATLOG_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read("CHATLOG_LOG_JSON") {
        match parse_bool(&v) {
            Some(b) => settings.logging.json = b,
            None => warn!(key = "CHATLOG_LOG_JSON", value = %v, "invalid env var, ignoring"),
        }
    }
    if let Some(v) = read("CHATLOG_IMPORT_BATCH_SIZE") {
        match parse_usize_range(&v, 1, 100_000) {
            Some(n) => settings.legacy.import_batch_size = n,
            None => warn!(key = "CHATLOG_IMPORT_BATCH_SIZE", value = %v, "invalid env var, ignoring"),
        }
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u32` within an inclusive range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within an inclusive range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
