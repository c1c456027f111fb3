//! Wide-row hydration.
//!
//! Every record variant maps to and from the same [`InteractionRow`]. The
//! base columns are shared; each variant owns a small set of discriminant
//! columns and must leave every other variant's discriminant columns empty.
//!
//! [`Hydrate`] is crate-private, so the only public ways to turn a row into
//! a record are [`InfoRecord::from_row`](crate::InfoRecord::from_row) and
//! [`decode_record`](crate::decode_record). No variant offers a constructor
//! that accepts another variant's columns.

use chatlog_core::{RecordId, ThreadId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{RecordError, Result};
use crate::sqlite::row_types::{InteractionRow, columns};
use crate::types::{
    EditState, Expiration, InfoMessageBase, InfoMessageType, RichContent, StoryContext, ViewOnce,
};

/// Wide hydration shape of one record variant.
pub(crate) trait Hydrate: Sized {
    /// The variant's own discriminant columns, decoded.
    type Columns;

    /// Kind written to the `message_type` column.
    fn message_type(&self) -> InfoMessageType;

    /// Shared base fields.
    fn base(&self) -> &InfoMessageBase;

    /// Decode the variant's columns, rejecting rows that populate a
    /// foreign discriminant column.
    fn read_columns(row: &InteractionRow) -> Result<Self::Columns>;

    /// Join a hydrated base with the variant's columns.
    fn assemble(base: InfoMessageBase, columns: Self::Columns) -> Self;

    /// Write the variant's columns into a row whose base columns are set.
    fn write_columns(&self, row: &mut InteractionRow) -> Result<()>;
}

/// Hydrate a variant from a wide row.
pub(crate) fn hydrate<V: Hydrate>(row: &InteractionRow) -> Result<V> {
    let columns = V::read_columns(row)?;
    let base = read_base(row)?;
    Ok(V::assemble(base, columns))
}

/// Flatten a variant into a wide row.
pub(crate) fn dehydrate<V: Hydrate>(record: &V) -> Result<InteractionRow> {
    let mut row = write_base(record.base(), record.message_type())?;
    record.write_columns(&mut row)?;
    Ok(row)
}

// ── Column helpers ──────────────────────────────────────────────────

pub(crate) fn hydration_error(column: &'static str, reason: impl Into<String>) -> RecordError {
    RecordError::Hydration {
        column,
        reason: reason.into(),
    }
}

/// Fail if a column that belongs to another variant is populated.
pub(crate) fn reject_populated<T>(column: &'static str, value: Option<&T>) -> Result<()> {
    if value.is_some() {
        return Err(hydration_error(
            column,
            "populated on a record variant that does not own it",
        ));
    }
    Ok(())
}

/// Fail if the generic classification payload carries any entries.
pub(crate) fn reject_user_info(row: &InteractionRow) -> Result<()> {
    let payload: Option<Value> = parse_json(
        columns::INFO_MESSAGE_USER_INFO,
        row.info_message_user_info.as_deref(),
    )?;
    match payload {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Object(map)) if map.is_empty() => Ok(()),
        Some(_) => Err(hydration_error(
            columns::INFO_MESSAGE_USER_INFO,
            "classification payload on a record variant with dedicated columns",
        )),
    }
}

/// Parse an optional JSON column.
pub(crate) fn parse_json<T: DeserializeOwned>(
    column: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>> {
    raw.map(|s| {
        serde_json::from_str(s).map_err(|e| hydration_error(column, format!("invalid JSON: {e}")))
    })
    .transpose()
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub(crate) fn to_u64(column: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| hydration_error(column, format!("negative value {value}")))
}

pub(crate) fn to_u32(column: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| hydration_error(column, format!("value {value} out of range")))
}

pub(crate) fn from_u64(column: &'static str, value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| {
        RecordError::InvalidOperation(format!("{column} value {value} exceeds storage range"))
    })
}

fn non_empty(column: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(hydration_error(column, "must not be empty"));
    }
    Ok(())
}

// ── Base columns ────────────────────────────────────────────────────

fn read_base(row: &InteractionRow) -> Result<InfoMessageBase> {
    non_empty(columns::UNIQUE_ID, &row.unique_id)?;
    non_empty(columns::THREAD_ID, &row.thread_id)?;

    let content = RichContent {
        attachment_ids: parse_json(columns::ATTACHMENT_IDS, row.attachment_ids.as_deref())?
            .unwrap_or_default(),
        body: row.body.clone(),
        body_ranges: parse_json(columns::BODY_RANGES, row.body_ranges.as_deref())?,
        contact_share: parse_json(columns::CONTACT_SHARE, row.contact_share.as_deref())?,
        link_preview: parse_json(columns::LINK_PREVIEW, row.link_preview.as_deref())?,
        message_sticker: parse_json(columns::MESSAGE_STICKER, row.message_sticker.as_deref())?,
        quoted_message: parse_json(columns::QUOTED_MESSAGE, row.quoted_message.as_deref())?,
        gift_badge: parse_json(columns::GIFT_BADGE, row.gift_badge.as_deref())?,
    };

    let story = StoryContext {
        author_uuid: row.story_author_uuid.clone(),
        timestamp: row
            .story_timestamp
            .map(|t| to_u64(columns::STORY_TIMESTAMP, t))
            .transpose()?,
        reaction_emoji: row.story_reaction_emoji.clone(),
        is_group_story_reply: row.is_group_story_reply,
    };

    let expiration = Expiration {
        expires_in_seconds: to_u32(columns::EXPIRES_IN_SECONDS, row.expires_in_seconds)?,
        expire_started_at: to_u64(columns::EXPIRE_STARTED_AT, row.expire_started_at)?,
        expires_at: to_u64(columns::EXPIRES_AT, row.expires_at)?,
        stored_should_start_expire_timer: row.stored_should_start_expire_timer,
    };

    let edit_state = EditState::from_code(row.edit_state).ok_or_else(|| {
        hydration_error(columns::EDIT_STATE, format!("unknown code {}", row.edit_state))
    })?;

    Ok(InfoMessageBase {
        row_id: row.id,
        unique_id: RecordId::from(row.unique_id.as_str()),
        thread_id: ThreadId::from(row.thread_id.as_str()),
        timestamp: to_u64(columns::TIMESTAMP, row.timestamp)?,
        received_at_timestamp: to_u64(
            columns::RECEIVED_AT_TIMESTAMP,
            row.received_at_timestamp,
        )?,
        server_guid: row.server_guid.clone(),
        read: row.is_read,
        was_remotely_deleted: row.was_remotely_deleted,
        expiration,
        view_once: ViewOnce {
            is_view_once_message: row.is_view_once_message,
            is_view_once_complete: row.is_view_once_complete,
        },
        content,
        story,
        edit_state,
        custom_message: row.custom_message.clone(),
    })
}

fn write_base(base: &InfoMessageBase, message_type: InfoMessageType) -> Result<InteractionRow> {
    let content = &base.content;
    let json_ref = |r: &Option<crate::types::ContentRef>| r.as_ref().map(to_json).transpose();

    Ok(InteractionRow {
        id: base.row_id,
        unique_id: base.unique_id.to_string(),
        thread_id: base.thread_id.to_string(),
        timestamp: from_u64(columns::TIMESTAMP, base.timestamp)?,
        received_at_timestamp: from_u64(
            columns::RECEIVED_AT_TIMESTAMP,
            base.received_at_timestamp,
        )?,
        server_guid: base.server_guid.clone(),
        message_type: message_type.as_code(),
        is_read: base.read,
        was_remotely_deleted: base.was_remotely_deleted,
        expires_in_seconds: i64::from(base.expiration.expires_in_seconds),
        expire_started_at: from_u64(columns::EXPIRE_STARTED_AT, base.expiration.expire_started_at)?,
        expires_at: from_u64(columns::EXPIRES_AT, base.expiration.expires_at)?,
        stored_should_start_expire_timer: base.expiration.stored_should_start_expire_timer,
        is_view_once_message: base.view_once.is_view_once_message,
        is_view_once_complete: base.view_once.is_view_once_complete,
        edit_state: base.edit_state.as_code(),
        attachment_ids: if content.attachment_ids.is_empty() {
            None
        } else {
            Some(to_json(&content.attachment_ids)?)
        },
        body: content.body.clone(),
        body_ranges: json_ref(&content.body_ranges)?,
        contact_share: json_ref(&content.contact_share)?,
        link_preview: json_ref(&content.link_preview)?,
        message_sticker: json_ref(&content.message_sticker)?,
        quoted_message: json_ref(&content.quoted_message)?,
        gift_badge: json_ref(&content.gift_badge)?,
        story_author_uuid: base.story.author_uuid.clone(),
        story_timestamp: base
            .story
            .timestamp
            .map(|t| from_u64(columns::STORY_TIMESTAMP, t))
            .transpose()?,
        story_reaction_emoji: base.story.reaction_emoji.clone(),
        is_group_story_reply: base.story.is_group_story_reply,
        custom_message: base.custom_message.clone(),
        info_message_user_info: None,
        unregistered_address: None,
        protocol_version: None,
        sender: None,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
