//! Legacy archive repository: blobs staged for import.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;
use crate::sqlite::row_types::LegacyArchiveRow;

/// Legacy archive repository: stateless, every method takes `&Connection`.
pub struct LegacyArchiveRepo;

impl LegacyArchiveRepo {
    /// Stage an archive. Re-staging a record replaces its blob and clears
    /// any earlier failure.
    pub fn insert(conn: &Connection, unique_id: &str, archive: &[u8]) -> Result<()> {
        let _ = conn.execute(
            "INSERT INTO legacy_archives (unique_id, archive, staged_at, failure)
             VALUES (?1, ?2, datetime('now'), NULL)
             ON CONFLICT(unique_id) DO UPDATE SET
                archive = excluded.archive,
                staged_at = excluded.staged_at,
                failure = NULL",
            params![unique_id, archive],
        )?;
        Ok(())
    }

    /// Get a staged archive.
    pub fn get(conn: &Connection, unique_id: &str) -> Result<Option<LegacyArchiveRow>> {
        let row = conn
            .query_row(
                "SELECT unique_id, archive, staged_at, failure
                 FROM legacy_archives WHERE unique_id = ?1",
                params![unique_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Archives not yet rejected by an import, oldest first.
    pub fn list_pending(conn: &Connection, limit: usize) -> Result<Vec<LegacyArchiveRow>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = conn.prepare(
            "SELECT unique_id, archive, staged_at, failure
             FROM legacy_archives WHERE failure IS NULL
             ORDER BY staged_at ASC, unique_id ASC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Record why an archive could not be imported. Returns whether a row
    /// matched.
    pub fn mark_failed(conn: &Connection, unique_id: &str, reason: &str) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE legacy_archives SET failure = ?2 WHERE unique_id = ?1",
            params![unique_id, reason],
        )?;
        Ok(changed > 0)
    }

    /// Remove a staged archive. Returns whether a row was deleted.
    pub fn delete(conn: &Connection, unique_id: &str) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM legacy_archives WHERE unique_id = ?1",
            params![unique_id],
        )?;
        Ok(changed > 0)
    }

    /// Number of archives awaiting import.
    pub fn count_pending(conn: &Connection) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM legacy_archives WHERE failure IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of archives an import rejected.
    pub fn count_failed(conn: &Connection) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM legacy_archives WHERE failure IS NOT NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<LegacyArchiveRow> {
        Ok(LegacyArchiveRow {
            unique_id: row.get(0)?,
            archive: row.get(1)?,
            staged_at: row.get(2)?,
            failure: row.get(3)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::sqlite::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn insert_and_get() {
        let conn = setup();
        LegacyArchiveRepo::insert(&conn, "a", b"blob").unwrap();
        let row = LegacyArchiveRepo::get(&conn, "a").unwrap().unwrap();
        assert_eq!(row.unique_id, "a");
        assert_eq!(row.archive, b"blob");
        assert!(row.failure.is_none());
        assert!(!row.staged_at.is_empty());
        assert!(LegacyArchiveRepo::get(&conn, "b").unwrap().is_none());
    }

    #[test]
    fn restaging_replaces_and_clears_failure() {
        let conn = setup();
        LegacyArchiveRepo::insert(&conn, "a", b"old").unwrap();
        LegacyArchiveRepo::mark_failed(&conn, "a", "bad").unwrap();
        LegacyArchiveRepo::insert(&conn, "a", b"new").unwrap();

        let row = LegacyArchiveRepo::get(&conn, "a").unwrap().unwrap();
        assert_eq!(row.archive, b"new");
        assert!(row.failure.is_none());
        assert_eq!(LegacyArchiveRepo::count_pending(&conn).unwrap(), 1);
    }

    #[test]
    fn failed_archives_leave_pending_list() {
        let conn = setup();
        for id in ["a", "b", "c"] {
            LegacyArchiveRepo::insert(&conn, id, b"{}").unwrap();
        }
        assert!(LegacyArchiveRepo::mark_failed(&conn, "b", "corrupt").unwrap());
        assert!(!LegacyArchiveRepo::mark_failed(&conn, "zzz", "corrupt").unwrap());

        let pending = LegacyArchiveRepo::list_pending(&conn, 10).unwrap();
        let ids: Vec<_> = pending.iter().map(|r| r.unique_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(LegacyArchiveRepo::count_pending(&conn).unwrap(), 2);
        assert_eq!(LegacyArchiveRepo::count_failed(&conn).unwrap(), 1);
        assert_eq!(
            LegacyArchiveRepo::get(&conn, "b").unwrap().unwrap().failure.as_deref(),
            Some("corrupt")
        );
    }

    #[test]
    fn list_pending_respects_limit() {
        let conn = setup();
        for id in ["a", "b", "c"] {
            LegacyArchiveRepo::insert(&conn, id, b"{}").unwrap();
        }
        assert_eq!(LegacyArchiveRepo::list_pending(&conn, 2).unwrap().len(), 2);
    }

    #[test]
    fn delete() {
        let conn = setup();
        LegacyArchiveRepo::insert(&conn, "a", b"{}").unwrap();
        assert!(LegacyArchiveRepo::delete(&conn, "a").unwrap());
        assert!(!LegacyArchiveRepo::delete(&conn, "a").unwrap());
        assert_eq!(LegacyArchiveRepo::count_pending(&conn).unwrap(), 0);
    }
}
