//! Interaction repository: the columnar record table.

use std::fmt::Write;

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::Result;
use crate::sqlite::row_types::InteractionRow;

/// Select list shared by every query, in [`InteractionRepo::map_row`] order.
const COLUMNS: &str = "id, unique_id, thread_id, timestamp, received_at_timestamp, server_guid,
     message_type, is_read, was_remotely_deleted, expires_in_seconds, expire_started_at,
     expires_at, stored_should_start_expire_timer, is_view_once_message, is_view_once_complete,
     edit_state, attachment_ids, body, body_ranges, contact_share, link_preview, message_sticker,
     quoted_message, gift_badge, story_author_uuid, story_timestamp, story_reaction_emoji,
     is_group_story_reply, custom_message, info_message_user_info, unregistered_address,
     protocol_version, sender";

/// Options for listing a thread.
#[derive(Clone, Debug, Default)]
pub struct ListOptions {
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
    /// Number of rows to skip.
    pub offset: Option<i64>,
}

/// Interaction repository: stateless, every method takes `&Connection`.
pub struct InteractionRepo;

impl InteractionRepo {
    /// Insert a row and return its assigned row id. `row.id` is ignored.
    pub fn insert(conn: &Connection, row: &InteractionRow) -> Result<i64> {
        let _ = conn.execute(
            "INSERT INTO interactions (unique_id, thread_id, timestamp, received_at_timestamp,
             server_guid, message_type, is_read, was_remotely_deleted, expires_in_seconds,
             expire_started_at, expires_at, stored_should_start_expire_timer, is_view_once_message,
             is_view_once_complete, edit_state, attachment_ids, body, body_ranges, contact_share,
             link_preview, message_sticker, quoted_message, gift_badge, story_author_uuid,
             story_timestamp, story_reaction_emoji, is_group_story_reply, custom_message,
             info_message_user_info, unregistered_address, protocol_version, sender)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                     ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32)",
            params![
                row.unique_id,
                row.thread_id,
                row.timestamp,
                row.received_at_timestamp,
                row.server_guid,
                row.message_type,
                row.is_read,
                row.was_remotely_deleted,
                row.expires_in_seconds,
                row.expire_started_at,
                row.expires_at,
                row.stored_should_start_expire_timer,
                row.is_view_once_message,
                row.is_view_once_complete,
                row.edit_state,
                row.attachment_ids,
                row.body,
                row.body_ranges,
                row.contact_share,
                row.link_preview,
                row.message_sticker,
                row.quoted_message,
                row.gift_badge,
                row.story_author_uuid,
                row.story_timestamp,
                row.story_reaction_emoji,
                row.is_group_story_reply,
                row.custom_message,
                row.info_message_user_info,
                row.unregistered_address,
                row.protocol_version,
                row.sender,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a row by record ID.
    pub fn get_by_unique_id(conn: &Connection, unique_id: &str) -> Result<Option<InteractionRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM interactions WHERE unique_id = ?1"),
                params![unique_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get a row by row ID.
    pub fn get_by_row_id(conn: &Connection, row_id: i64) -> Result<Option<InteractionRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM interactions WHERE id = ?1"),
                params![row_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Rows for a thread, oldest first.
    pub fn list_by_thread(
        conn: &Connection,
        thread_id: &str,
        opts: &ListOptions,
    ) -> Result<Vec<InteractionRow>> {
        let mut sql = format!("SELECT {COLUMNS} FROM interactions WHERE thread_id = ?1 ORDER BY id ASC");
        match (opts.limit, opts.offset) {
            (Some(limit), _) => {
                let _ = write!(sql, " LIMIT {limit}");
            }
            (None, Some(_)) => sql.push_str(" LIMIT -1"),
            (None, None) => {}
        }
        if let Some(offset) = opts.offset {
            let _ = write!(sql, " OFFSET {offset}");
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![thread_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of rows in a thread.
    pub fn count_by_thread(conn: &Connection, thread_id: &str) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM interactions WHERE thread_id = ?1",
            params![thread_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of rows of one message type code.
    pub fn count_by_type(conn: &Connection, message_type: i64) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM interactions WHERE message_type = ?1",
            params![message_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Set the read flag. Returns whether a row matched.
    pub fn mark_read(conn: &Connection, unique_id: &str) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE interactions SET is_read = 1 WHERE unique_id = ?1",
            params![unique_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete one row. Returns whether a row was deleted.
    pub fn delete(conn: &Connection, unique_id: &str) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM interactions WHERE unique_id = ?1",
            params![unique_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete every row in a thread. Returns the number deleted.
    pub fn delete_by_thread(conn: &Connection, thread_id: &str) -> Result<usize> {
        let changed = conn.execute(
            "DELETE FROM interactions WHERE thread_id = ?1",
            params![thread_id],
        )?;
        Ok(changed)
    }

    /// Whether a row exists for the record ID.
    pub fn exists(conn: &Connection, unique_id: &str) -> Result<bool> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM interactions WHERE unique_id = ?1)",
            params![unique_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<InteractionRow> {
        Ok(InteractionRow {
            id: row.get(0)?,
            unique_id: row.get(1)?,
            thread_id: row.get(2)?,
            timestamp: row.get(3)?,
            received_at_timestamp: row.get(4)?,
            server_guid: row.get(5)?,
            message_type: row.get(6)?,
            is_read: row.get(7)?,
            was_remotely_deleted: row.get(8)?,
            expires_in_seconds: row.get(9)?,
            expire_started_at: row.get(10)?,
            expires_at: row.get(11)?,
            stored_should_start_expire_timer: row.get(12)?,
            is_view_once_message: row.get(13)?,
            is_view_once_complete: row.get(14)?,
            edit_state: row.get(15)?,
            attachment_ids: row.get(16)?,
            body: row.get(17)?,
            body_ranges: row.get(18)?,
            contact_share: row.get(19)?,
            link_preview: row.get(20)?,
            message_sticker: row.get(21)?,
            quoted_message: row.get(22)?,
            gift_badge: row.get(23)?,
            story_author_uuid: row.get(24)?,
            story_timestamp: row.get(25)?,
            story_reaction_emoji: row.get(26)?,
            is_group_story_reply: row.get(27)?,
            custom_message: row.get(28)?,
            info_message_user_info: row.get(29)?,
            unregistered_address: row.get(30)?,
            protocol_version: row.get(31)?,
            sender: row.get(32)?,
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

    fn row(unique_id: &str, thread_id: &str) -> InteractionRow {
        InteractionRow {
            unique_id: unique_id.into(),
            thread_id: thread_id.into(),
            timestamp: 1_000,
            received_at_timestamp: 1_000,
            message_type: 10,
            protocol_version: Some(9),
            sender: Some(r#"{"phoneNumber":"+15555550100"}"#.into()),
            ..Default::default()
        }
    }

    // ── insert / get ────────────────────────────────────────────────

    #[test]
    fn insert_assigns_increasing_row_ids() {
        let conn = setup();
        let a = InteractionRepo::insert(&conn, &row("a", "t")).unwrap();
        let b = InteractionRepo::insert(&conn, &row("b", "t")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn get_round_trips_every_column() {
        let conn = setup();
        let mut original = row("a", "t");
        original.server_guid = Some("guid".into());
        original.is_read = true;
        original.attachment_ids = Some(r#"["x"]"#.into());
        original.story_timestamp = Some(5);
        original.is_group_story_reply = true;
        original.edit_state = 2;

        let id = InteractionRepo::insert(&conn, &original).unwrap();
        let fetched = InteractionRepo::get_by_unique_id(&conn, "a").unwrap().unwrap();
        assert_eq!(fetched.id, Some(id));
        assert_eq!(InteractionRow { id: None, ..fetched.clone() }, original);

        let by_row_id = InteractionRepo::get_by_row_id(&conn, id).unwrap().unwrap();
        assert_eq!(by_row_id, fetched);
    }

    #[test]
    fn get_missing_is_none() {
        let conn = setup();
        assert!(InteractionRepo::get_by_unique_id(&conn, "nope").unwrap().is_none());
        assert!(InteractionRepo::get_by_row_id(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn duplicate_unique_id_rejected() {
        let conn = setup();
        InteractionRepo::insert(&conn, &row("a", "t")).unwrap();
        assert!(InteractionRepo::insert(&conn, &row("a", "t")).is_err());
    }

    // ── listing ─────────────────────────────────────────────────────

    #[test]
    fn list_by_thread_ordered_and_paged() {
        let conn = setup();
        for id in ["a", "b", "c", "d"] {
            InteractionRepo::insert(&conn, &row(id, "t1")).unwrap();
        }
        InteractionRepo::insert(&conn, &row("x", "t2")).unwrap();

        let all = InteractionRepo::list_by_thread(&conn, "t1", &ListOptions::default()).unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.unique_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);

        let page = InteractionRepo::list_by_thread(
            &conn,
            "t1",
            &ListOptions {
                limit: Some(2),
                offset: Some(1),
            },
        )
        .unwrap();
        let ids: Vec<_> = page.iter().map(|r| r.unique_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);

        let tail = InteractionRepo::list_by_thread(
            &conn,
            "t1",
            &ListOptions {
                limit: None,
                offset: Some(3),
            },
        )
        .unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].unique_id, "d");
    }

    #[test]
    fn counts() {
        let conn = setup();
        InteractionRepo::insert(&conn, &row("a", "t1")).unwrap();
        InteractionRepo::insert(&conn, &row("b", "t1")).unwrap();
        let mut other = row("c", "t2");
        other.message_type = 1;
        InteractionRepo::insert(&conn, &other).unwrap();

        assert_eq!(InteractionRepo::count_by_thread(&conn, "t1").unwrap(), 2);
        assert_eq!(InteractionRepo::count_by_thread(&conn, "none").unwrap(), 0);
        assert_eq!(InteractionRepo::count_by_type(&conn, 10).unwrap(), 2);
        assert_eq!(InteractionRepo::count_by_type(&conn, 1).unwrap(), 1);
    }

    // ── mutation ────────────────────────────────────────────────────

    #[test]
    fn mark_read() {
        let conn = setup();
        InteractionRepo::insert(&conn, &row("a", "t")).unwrap();
        assert!(InteractionRepo::mark_read(&conn, "a").unwrap());
        assert!(InteractionRepo::get_by_unique_id(&conn, "a").unwrap().unwrap().is_read);
        assert!(!InteractionRepo::mark_read(&conn, "missing").unwrap());
    }

    #[test]
    fn delete_and_exists() {
        let conn = setup();
        InteractionRepo::insert(&conn, &row("a", "t")).unwrap();
        assert!(InteractionRepo::exists(&conn, "a").unwrap());
        assert!(InteractionRepo::delete(&conn, "a").unwrap());
        assert!(!InteractionRepo::exists(&conn, "a").unwrap());
        assert!(!InteractionRepo::delete(&conn, "a").unwrap());
    }

    #[test]
    fn delete_by_thread() {
        let conn = setup();
        InteractionRepo::insert(&conn, &row("a", "t1")).unwrap();
        InteractionRepo::insert(&conn, &row("b", "t1")).unwrap();
        InteractionRepo::insert(&conn, &row("c", "t2")).unwrap();
        assert_eq!(InteractionRepo::delete_by_thread(&conn, "t1").unwrap(), 2);
        assert_eq!(InteractionRepo::count_by_thread(&conn, "t2").unwrap(), 1);
    }
}
