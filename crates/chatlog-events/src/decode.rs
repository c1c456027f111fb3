//! Single decode entry point.
//!
//! A stored record exists as a columnar row, as a legacy archive awaiting
//! import, or both. The row is authoritative; the archive is only consulted
//! when there is no row or the row cannot be hydrated.

use tracing::warn;

use crate::errors::{RecordError, Result};
use crate::legacy;
use crate::sqlite::row_types::InteractionRow;
use crate::types::InfoRecord;

/// Everything storage holds for one record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoredRecord {
    /// Columnar row, if the record has one.
    pub row: Option<InteractionRow>,
    /// Legacy archive blob, if one is staged.
    pub archive: Option<Vec<u8>>,
}

/// Decode a stored record: columnar row first, then legacy archive.
///
/// If the row fails to hydrate and an archive exists, the archive is tried;
/// when that fails too, the row's error is returned.
pub fn decode_record(stored: &StoredRecord) -> Result<InfoRecord> {
    let row_error = match &stored.row {
        Some(row) => match InfoRecord::from_row(row) {
            Ok(record) => return Ok(record),
            Err(e) => Some(e),
        },
        None => None,
    };

    match (&stored.archive, row_error) {
        (Some(archive), None) => Ok(legacy::decode_archive(archive)?),
        (Some(archive), Some(row_error)) => {
            warn!(error = %row_error, "row failed to hydrate, trying legacy archive");
            legacy::decode_archive(archive).map_err(|_| row_error)
        }
        (None, Some(row_error)) => Err(row_error),
        (None, None) => Err(RecordError::RecordNotFound(
            "no columnar row or legacy archive".into(),
        )),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
