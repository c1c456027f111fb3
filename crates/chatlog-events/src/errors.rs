//! Error types for the record subsystem.
//!
//! [`RecordError`] is returned by hydration and every storage operation.
//! [`DecodeError`] is the narrower failure of the legacy archive decoder;
//! it converts into [`RecordError::Decode`] at the storage boundary.

use thiserror::Error;

/// Legacy archive decoding failures.
///
/// Any of these means the archive is corrupt or predates the record kind
/// entirely. The record is unrecoverable and must be skipped, never
/// patched up with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The blob is not a key-addressed archive at all.
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// The archive does not name the record class it encodes.
    #[error("archive has no class name")]
    MissingClass,

    /// The archive names a record class this build cannot decode.
    #[error("unsupported archive class: {0}")]
    UnsupportedClass(String),

    /// A field central to the record's identity is absent.
    #[error("archive is missing required field `{key}`")]
    MissingField {
        /// Archive key that was expected.
        key: &'static str,
    },

    /// A required field is present but cannot be decoded.
    #[error("archive field `{key}` is invalid: {reason}")]
    InvalidField {
        /// Archive key that failed.
        key: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Errors that can occur during record hydration and storage operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Requested record was not found.
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// A stored row cannot be turned into a record.
    #[error("cannot hydrate column `{column}`: {reason}")]
    Hydration {
        /// Column that failed.
        column: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A legacy archive could not be decoded.
    #[error("legacy decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid operation on the store.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Convenience type alias for record results.
pub type Result<T> = std::result::Result<T, RecordError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_error_display() {
        let err = RecordError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(err.to_string().contains("sqlite error"));
    }

    #[test]
    fn hydration_error_display() {
        let err = RecordError::Hydration {
            column: "protocol_version",
            reason: "missing".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot hydrate column `protocol_version`: missing"
        );
    }

    #[test]
    fn missing_field_display() {
        let err = DecodeError::MissingField {
            key: "protocolVersion",
        };
        assert_eq!(
            err.to_string(),
            "archive is missing required field `protocolVersion`"
        );
    }

    #[test]
    fn decode_error_converts() {
        let err: RecordError = DecodeError::MissingClass.into();
        assert!(matches!(err, RecordError::Decode(DecodeError::MissingClass)));
        assert_eq!(err.to_string(), "legacy decode error: archive has no class name");
    }

    #[test]
    fn record_not_found_display() {
        let err = RecordError::RecordNotFound("rec-1".into());
        assert_eq!(err.to_string(), "record not found: rec-1");
    }
}
