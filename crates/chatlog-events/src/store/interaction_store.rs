//! High-level transactional `InteractionStore` API.
//!
//! Composes the repositories with hydration and legacy decoding. Records go
//! in as [`InfoRecord`]s and come back out as [`InfoRecord`]s; raw rows
//! never leave this layer except through [`InteractionStore::get_row`].

use chatlog_core::{RecordId, ThreadId};
use chatlog_settings::StorageSettings;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::decode::{StoredRecord, decode_record};
use crate::errors::{RecordError, Result};
use crate::legacy;
use crate::sqlite::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::sqlite::migrations::run_migrations;
use crate::sqlite::repositories::interaction::{InteractionRepo, ListOptions};
use crate::sqlite::repositories::legacy_archive::LegacyArchiveRepo;
use crate::sqlite::row_types::{InteractionRow, LegacyArchiveRow};
use crate::types::InfoRecord;

/// Outcome of a legacy archive import run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Archives decoded and written as rows.
    pub imported: usize,
    /// Archives whose record already had a row; the archive was dropped.
    pub already_present: usize,
    /// Archives that could not be decoded.
    pub failed: Vec<FailedImport>,
}

/// An archive an import rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedImport {
    /// Record ID the archive was staged under.
    pub unique_id: String,
    /// Why it was rejected.
    pub reason: String,
}

/// High-level `InteractionStore` wrapping a connection pool and all
/// repositories.
pub struct InteractionStore {
    pool: ConnectionPool,
}

impl InteractionStore {
    /// Create a store over an already-migrated pool.
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open the file database described by `settings` and apply pending
    /// migrations. The parent directory must already exist.
    pub fn open(settings: &StorageSettings) -> Result<Self> {
        let pool = connection::new_file(&settings.db_path, &ConnectionConfig::from(settings))?;
        Self::migrated(pool)
    }

    /// Single-connection in-memory store with the schema applied.
    pub fn in_memory() -> Result<Self> {
        Self::migrated(connection::new_in_memory(&ConnectionConfig::single())?)
    }

    fn migrated(pool: ConnectionPool) -> Result<Self> {
        {
            let conn = pool.get()?;
            let _ = run_migrations(&conn)?;
        }
        Ok(Self::new(pool))
    }

    /// Get a connection from the pool.
    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// The underlying pool.
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    // ─────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────

    /// Persist a new record and return it with its row id assigned.
    pub fn insert(&self, record: &InfoRecord) -> Result<InfoRecord> {
        if record.row_id().is_some() {
            return Err(RecordError::InvalidOperation(format!(
                "record {} is already persisted",
                record.unique_id()
            )));
        }
        let row = record.to_row()?;

        let conn = self.conn()?;
        let tx = write_tx(&conn)?;
        if InteractionRepo::exists(&tx, &row.unique_id)? {
            return Err(RecordError::InvalidOperation(format!(
                "record {} already exists",
                row.unique_id
            )));
        }
        let row_id = InteractionRepo::insert(&tx, &row)?;
        tx.commit()?;

        debug!(
            unique_id = %record.unique_id(),
            row_id,
            message_type = %record.message_type(),
            "record inserted"
        );
        let mut inserted = record.clone();
        inserted.base_mut().row_id = Some(row_id);
        Ok(inserted)
    }

    /// Get a record by ID, falling back to a staged legacy archive when the
    /// record has no usable row.
    pub fn get(&self, unique_id: &RecordId) -> Result<Option<InfoRecord>> {
        let conn = self.conn()?;
        let stored = StoredRecord {
            row: InteractionRepo::get_by_unique_id(&conn, unique_id)?,
            archive: LegacyArchiveRepo::get(&conn, unique_id)?.map(|a| a.archive),
        };
        if stored.row.is_none() && stored.archive.is_none() {
            return Ok(None);
        }
        let mut record = decode_record(&stored)?;
        // Staged archives are addressed by their staging key.
        record.base_mut().unique_id = unique_id.clone();
        Ok(Some(record))
    }

    /// Get a record by row id.
    pub fn get_by_row_id(&self, row_id: i64) -> Result<Option<InfoRecord>> {
        let conn = self.conn()?;
        InteractionRepo::get_by_row_id(&conn, row_id)?
            .map(|row| InfoRecord::from_row(&row))
            .transpose()
    }

    /// Raw wide row for a record.
    pub fn get_row(&self, unique_id: &RecordId) -> Result<Option<InteractionRow>> {
        let conn = self.conn()?;
        InteractionRepo::get_by_unique_id(&conn, unique_id)
    }

    /// Records in a thread, oldest first. Rows that fail to hydrate are
    /// logged and skipped.
    pub fn list_for_thread(&self, thread_id: &ThreadId, opts: &ListOptions) -> Result<Vec<InfoRecord>> {
        let conn = self.conn()?;
        let rows = InteractionRepo::list_by_thread(&conn, thread_id, opts)?;
        let records = rows
            .iter()
            .filter_map(|row| match InfoRecord::from_row(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        unique_id = %row.unique_id,
                        row_id = ?row.id,
                        error = %e,
                        "skipping record that failed to hydrate"
                    );
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Number of rows in a thread.
    pub fn count_for_thread(&self, thread_id: &ThreadId) -> Result<i64> {
        let conn = self.conn()?;
        InteractionRepo::count_by_thread(&conn, thread_id)
    }

    /// Mark a record read and return its updated state.
    ///
    /// Read state is the only thing that changes after construction; the
    /// variant's own fields are never rewritten.
    pub fn mark_read(&self, unique_id: &RecordId) -> Result<InfoRecord> {
        let conn = self.conn()?;
        let tx = write_tx(&conn)?;
        if !InteractionRepo::mark_read(&tx, unique_id)? {
            return Err(RecordError::RecordNotFound(unique_id.to_string()));
        }
        let row = InteractionRepo::get_by_unique_id(&tx, unique_id)?
            .ok_or_else(|| RecordError::RecordNotFound(unique_id.to_string()))?;
        let record = InfoRecord::from_row(&row)?;
        tx.commit()?;
        Ok(record)
    }

    /// Delete a record and any archive staged for it. Returns whether
    /// anything was deleted.
    pub fn delete(&self, unique_id: &RecordId) -> Result<bool> {
        let conn = self.conn()?;
        let tx = write_tx(&conn)?;
        let row_deleted = InteractionRepo::delete(&tx, unique_id)?;
        let archive_deleted = LegacyArchiveRepo::delete(&tx, unique_id)?;
        tx.commit()?;
        Ok(row_deleted || archive_deleted)
    }

    /// Delete every record in a thread. Returns the number deleted.
    pub fn delete_thread(&self, thread_id: &ThreadId) -> Result<usize> {
        let conn = self.conn()?;
        let tx = write_tx(&conn)?;
        let deleted = InteractionRepo::delete_by_thread(&tx, thread_id)?;
        tx.commit()?;
        info!(thread_id = %thread_id, deleted, "thread records deleted");
        Ok(deleted)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Legacy archives
    // ─────────────────────────────────────────────────────────────────────

    /// Stage a legacy archive blob for import under `unique_id`.
    pub fn stage_legacy_archive(&self, unique_id: &RecordId, archive: &[u8]) -> Result<()> {
        let conn = self.conn()?;
        LegacyArchiveRepo::insert(&conn, unique_id, archive)?;
        debug!(unique_id = %unique_id, bytes = archive.len(), "legacy archive staged");
        Ok(())
    }

    /// Number of staged archives awaiting import.
    pub fn pending_legacy_archives(&self) -> Result<i64> {
        let conn = self.conn()?;
        LegacyArchiveRepo::count_pending(&conn)
    }

    /// Import staged archives in batches of `batch_size`, one transaction
    /// per batch.
    ///
    /// Decoded archives become rows keyed by their staging ID and are then
    /// removed. Undecodable archives are marked failed and left in place;
    /// later runs skip them.
    pub fn import_legacy_archives(&self, batch_size: usize) -> Result<ImportReport> {
        if batch_size == 0 {
            return Err(RecordError::InvalidOperation(
                "import batch size must be at least 1".into(),
            ));
        }
        let conn = self.conn()?;
        let mut report = ImportReport::default();

        loop {
            let tx = write_tx(&conn)?;
            let pending = LegacyArchiveRepo::list_pending(&tx, batch_size)?;
            if pending.is_empty() {
                break;
            }
            for staged in &pending {
                Self::import_one(&tx, staged, &mut report)?;
            }
            tx.commit()?;
            debug!(batch = pending.len(), "legacy import batch committed");
        }

        info!(
            imported = report.imported,
            already_present = report.already_present,
            failed = report.failed.len(),
            "legacy archive import complete"
        );
        Ok(report)
    }

    fn import_one(
        conn: &Connection,
        staged: &LegacyArchiveRow,
        report: &mut ImportReport,
    ) -> Result<()> {
        if InteractionRepo::exists(conn, &staged.unique_id)? {
            let _ = LegacyArchiveRepo::delete(conn, &staged.unique_id)?;
            report.already_present += 1;
            return Ok(());
        }

        let row = legacy::decode_archive(&staged.archive)
            .map_err(RecordError::from)
            .and_then(|mut record| {
                record.base_mut().unique_id = RecordId::from(staged.unique_id.as_str());
                record.to_row()
            });

        match row {
            Ok(row) => {
                let _ = InteractionRepo::insert(conn, &row)?;
                let _ = LegacyArchiveRepo::delete(conn, &staged.unique_id)?;
                report.imported += 1;
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(unique_id = %staged.unique_id, error = %reason, "legacy archive rejected");
                let _ = LegacyArchiveRepo::mark_failed(conn, &staged.unique_id, &reason)?;
                report.failed.push(FailedImport {
                    unique_id: staged.unique_id.clone(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// Writes take the lock up front so a concurrent writer makes this wait on
/// `busy_timeout` instead of failing the read-to-write upgrade.
fn write_tx(conn: &Connection) -> Result<Transaction<'_>> {
    Ok(Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::errors::DecodeError;
    use crate::types::{
        GenericInfoKind, InfoMessage, InfoMessageUserInfo, UnknownProtocolVersionMessage,
        UserNotRegisteredMessage,
    };
    use assert_matches::assert_matches;
    use chatlog_core::ServiceAddress;
    use chatlog_core::logging::capture_logs;
    use serde_json::json;

    fn setup() -> InteractionStore {
        InteractionStore::in_memory().unwrap()
    }

    fn thread() -> ThreadId {
        ThreadId::from("thread-1")
    }

    fn upv(version: u64) -> InfoRecord {
        UnknownProtocolVersionMessage::new(
            &thread(),
            1_000,
            Some(ServiceAddress::from_phone_number("+15555550100").unwrap()),
            version,
        )
        .into()
    }

    fn upv_archive(version: u64) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "$class": "UnknownProtocolVersionMessage",
            "uniqueThreadId": "thread-1",
            "timestamp": 500,
            "protocolVersion": version,
        }))
        .unwrap()
    }

    // ── insert / get ────────────────────────────────────────────────

    #[test]
    fn insert_assigns_row_id_and_round_trips() {
        let store = setup();
        let record = upv(9);
        let inserted = store.insert(&record).unwrap();
        assert!(inserted.row_id().is_some());
        assert_eq!(inserted.unique_id(), record.unique_id());

        let fetched = store.get(record.unique_id()).unwrap().unwrap();
        assert_eq!(fetched, inserted);

        let by_row = store.get_by_row_id(inserted.row_id().unwrap()).unwrap().unwrap();
        assert_eq!(by_row, inserted);
    }

    #[test]
    fn insert_twice_rejected() {
        let store = setup();
        let record = upv(9);
        let inserted = store.insert(&record).unwrap();
        assert_matches!(store.insert(&inserted), Err(RecordError::InvalidOperation(_)));
        assert_matches!(store.insert(&record), Err(RecordError::InvalidOperation(_)));
    }

    #[test]
    fn get_missing() {
        let store = setup();
        assert!(store.get(&RecordId::from("nope")).unwrap().is_none());
        assert!(store.get_by_row_id(1).unwrap().is_none());
    }

    #[test]
    fn get_falls_back_to_staged_archive() {
        let store = setup();
        let id = RecordId::from("legacy-1");
        store.stage_legacy_archive(&id, &upv_archive(12)).unwrap();

        let record = store.get(&id).unwrap().unwrap();
        assert_eq!(record.unique_id(), &id);
        assert_eq!(record.row_id(), None);
        assert_eq!(record.as_unknown_protocol_version().unwrap().protocol_version(), 12);
    }

    #[test]
    fn get_surfaces_hydration_error() {
        let store = setup();
        let inserted = store.insert(&upv(9)).unwrap();
        {
            let conn = store.pool().get().unwrap();
            conn.execute(
                "UPDATE interactions SET protocol_version = NULL WHERE unique_id = ?1",
                [inserted.unique_id().as_str()],
            )
            .unwrap();
        }
        assert_matches!(
            store.get(inserted.unique_id()),
            Err(RecordError::Hydration { column: "protocol_version", .. })
        );
    }

    // ── threads ─────────────────────────────────────────────────────

    #[test]
    fn list_for_thread_in_insert_order() {
        let store = setup();
        let first = store.insert(&upv(8)).unwrap();
        let second = store
            .insert(
                &InfoMessage::new(&thread(), 2_000, GenericInfoKind::GroupQuit, InfoMessageUserInfo::new())
                    .into(),
            )
            .unwrap();
        let third = store
            .insert(
                &UserNotRegisteredMessage::new(
                    &thread(),
                    3_000,
                    ServiceAddress::from_phone_number("+15555550199").unwrap(),
                )
                .into(),
            )
            .unwrap();
        store
            .insert(&UnknownProtocolVersionMessage::new(&ThreadId::from("other"), 1, None, 9).into())
            .unwrap();

        let records = store.list_for_thread(&thread(), &ListOptions::default()).unwrap();
        assert_eq!(records, vec![first, second, third]);
        assert_eq!(store.count_for_thread(&thread()).unwrap(), 3);
    }

    #[test]
    fn list_skips_corrupt_rows_with_warning() {
        let (logs, _guard) = capture_logs();
        let store = setup();
        let good = store.insert(&upv(8)).unwrap();
        let bad = store.insert(&upv(9)).unwrap();
        {
            let conn = store.pool().get().unwrap();
            conn.execute(
                "UPDATE interactions SET info_message_user_info = '{\"profileChanges\":1}' WHERE unique_id = ?1",
                [bad.unique_id().as_str()],
            )
            .unwrap();
        }

        let records = store.list_for_thread(&thread(), &ListOptions::default()).unwrap();
        assert_eq!(records, vec![good]);
        assert!(logs.has_event(tracing::Level::WARN, "failed to hydrate"));
    }

    #[test]
    fn delete_thread() {
        let store = setup();
        store.insert(&upv(8)).unwrap();
        store.insert(&upv(9)).unwrap();
        assert_eq!(store.delete_thread(&thread()).unwrap(), 2);
        assert_eq!(store.count_for_thread(&thread()).unwrap(), 0);
    }

    // ── mutation ────────────────────────────────────────────────────

    #[test]
    fn mark_read_changes_only_read_state() {
        let store = setup();
        let inserted = store.insert(&upv(9)).unwrap();
        let updated = store.mark_read(inserted.unique_id()).unwrap();
        assert!(updated.base().is_read());

        let before = inserted.as_unknown_protocol_version().unwrap();
        let after = updated.as_unknown_protocol_version().unwrap();
        assert_eq!(after.protocol_version(), before.protocol_version());
        assert_eq!(after.sender(), before.sender());
        assert_eq!(updated.row_id(), inserted.row_id());
    }

    #[test]
    fn mark_read_missing() {
        let store = setup();
        assert_matches!(
            store.mark_read(&RecordId::from("nope")),
            Err(RecordError::RecordNotFound(_))
        );
    }

    #[test]
    fn delete_removes_row_and_archive() {
        let store = setup();
        let inserted = store.insert(&upv(9)).unwrap();
        store.stage_legacy_archive(inserted.unique_id(), &upv_archive(9)).unwrap();
        assert!(store.delete(inserted.unique_id()).unwrap());
        assert!(store.get(inserted.unique_id()).unwrap().is_none());
        assert!(!store.delete(inserted.unique_id()).unwrap());
    }

    // ── legacy import ───────────────────────────────────────────────

    #[test]
    fn import_decodes_and_removes_archives() {
        let store = setup();
        for n in 0..5 {
            store
                .stage_legacy_archive(&RecordId::from(format!("legacy-{n}")), &upv_archive(10 + n))
                .unwrap();
        }

        let report = store.import_legacy_archives(2).unwrap();
        assert_eq!(report.imported, 5);
        assert!(report.failed.is_empty());
        assert_eq!(store.pending_legacy_archives().unwrap(), 0);

        let record = store.get(&RecordId::from("legacy-3")).unwrap().unwrap();
        assert!(record.row_id().is_some());
        assert_eq!(record.as_unknown_protocol_version().unwrap().protocol_version(), 13);
        assert_eq!(record.base().timestamp(), 500);
    }

    #[test]
    fn import_marks_failures_and_never_retries() {
        let store = setup();
        store.stage_legacy_archive(&RecordId::from("good"), &upv_archive(9)).unwrap();
        store
            .stage_legacy_archive(
                &RecordId::from("bad"),
                br#"{"$class": "UnknownProtocolVersionMessage", "uniqueThreadId": "t"}"#,
            )
            .unwrap();

        let report = store.import_legacy_archives(10).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].unique_id, "bad");
        assert_eq!(
            report.failed[0].reason,
            RecordError::from(DecodeError::MissingField { key: "protocolVersion" }).to_string()
        );

        let again = store.import_legacy_archives(10).unwrap();
        assert_eq!(again, ImportReport::default());
    }

    #[test]
    fn import_skips_records_that_already_have_rows() {
        let store = setup();
        let inserted = store.insert(&upv(9)).unwrap();
        store.stage_legacy_archive(inserted.unique_id(), &upv_archive(42)).unwrap();

        let report = store.import_legacy_archives(10).unwrap();
        assert_eq!(report.already_present, 1);
        assert_eq!(report.imported, 0);
        let fetched = store.get(inserted.unique_id()).unwrap().unwrap();
        assert_eq!(fetched.as_unknown_protocol_version().unwrap().protocol_version(), 9);
    }

    #[test]
    fn import_rejects_zero_batch() {
        let store = setup();
        assert_matches!(store.import_legacy_archives(0), Err(RecordError::InvalidOperation(_)));
    }

    // ── open ────────────────────────────────────────────────────────

    #[test]
    fn open_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let settings = StorageSettings {
            db_path: dir.path().join("chatlog.db").to_string_lossy().into_owned(),
            pool_size: 2,
            ..StorageSettings::default()
        };
        let store = InteractionStore::open(&settings).unwrap();
        let inserted = store.insert(&upv(9)).unwrap();
        drop(store);

        let reopened = InteractionStore::open(&settings).unwrap();
        assert_eq!(reopened.get(inserted.unique_id()).unwrap().unwrap(), inserted);
    }
}
