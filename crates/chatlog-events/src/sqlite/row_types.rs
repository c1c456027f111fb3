//! Database row types for mapping between `SQLite` rows and Rust structs.
//!
//! These represent the raw database row shape, not the public record types.
//! Conversion to [`InfoRecord`](crate::InfoRecord) happens in the hydration
//! layer, never in the repositories.

use serde::{Deserialize, Serialize};

/// Raw wide row from the `interactions` table.
///
/// Holds the superset of columns used by every record variant. Integer
/// columns use `SQLite`'s native `i64`; composite values are JSON strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRow {
    /// Storage-assigned row identifier (`None` before insert).
    pub id: Option<i64>,
    /// Record ID.
    pub unique_id: String,
    /// Thread ID.
    pub thread_id: String,
    /// Creation timestamp (ms).
    pub timestamp: i64,
    /// Receipt timestamp (ms).
    pub received_at_timestamp: i64,
    /// Server GUID.
    pub server_guid: Option<String>,
    /// Info message type code.
    pub message_type: i64,
    /// Read flag.
    pub is_read: bool,
    /// Remote-deletion flag.
    pub was_remotely_deleted: bool,
    /// Expiration timer duration in seconds.
    pub expires_in_seconds: i64,
    /// Expiration start (ms).
    pub expire_started_at: i64,
    /// Expiration end (ms).
    pub expires_at: i64,
    /// Start the timer on display.
    pub stored_should_start_expire_timer: bool,
    /// View-once flag.
    pub is_view_once_message: bool,
    /// View-once consumed flag.
    pub is_view_once_complete: bool,
    /// Edit state code.
    pub edit_state: i64,
    /// Attachment IDs as JSON array string.
    pub attachment_ids: Option<String>,
    /// Text body.
    pub body: Option<String>,
    /// Body ranges as JSON.
    pub body_ranges: Option<String>,
    /// Contact share as JSON.
    pub contact_share: Option<String>,
    /// Link preview as JSON.
    pub link_preview: Option<String>,
    /// Sticker as JSON.
    pub message_sticker: Option<String>,
    /// Quoted message as JSON.
    pub quoted_message: Option<String>,
    /// Gift badge as JSON.
    pub gift_badge: Option<String>,
    /// Story author.
    pub story_author_uuid: Option<String>,
    /// Story timestamp (ms).
    pub story_timestamp: Option<i64>,
    /// Story reaction emoji.
    pub story_reaction_emoji: Option<String>,
    /// Group story reply flag.
    pub is_group_story_reply: bool,
    /// Custom message text.
    pub custom_message: Option<String>,
    /// Generic classification payload as JSON object.
    pub info_message_user_info: Option<String>,
    /// Unregistered recipient address as JSON.
    pub unregistered_address: Option<String>,
    /// Unknown protocol version.
    pub protocol_version: Option<i64>,
    /// Originating party address as JSON.
    pub sender: Option<String>,
}

/// Raw staged archive from the `legacy_archives` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyArchiveRow {
    /// Record ID the archive will be imported as.
    pub unique_id: String,
    /// Archive blob.
    pub archive: Vec<u8>,
    /// When the archive was staged.
    pub staged_at: String,
    /// Decode failure, if an import already rejected it.
    pub failure: Option<String>,
}

/// Column names, as reported in hydration errors.
pub(crate) mod columns {
    pub const UNIQUE_ID: &str = "unique_id";
    pub const THREAD_ID: &str = "thread_id";
    pub const TIMESTAMP: &str = "timestamp";
    pub const RECEIVED_AT_TIMESTAMP: &str = "received_at_timestamp";
    pub const MESSAGE_TYPE: &str = "message_type";
    pub const EXPIRES_IN_SECONDS: &str = "expires_in_seconds";
    pub const EXPIRE_STARTED_AT: &str = "expire_started_at";
    pub const EXPIRES_AT: &str = "expires_at";
    pub const EDIT_STATE: &str = "edit_state";
    pub const ATTACHMENT_IDS: &str = "attachment_ids";
    pub const BODY_RANGES: &str = "body_ranges";
    pub const CONTACT_SHARE: &str = "contact_share";
    pub const LINK_PREVIEW: &str = "link_preview";
    pub const MESSAGE_STICKER: &str = "message_sticker";
    pub const QUOTED_MESSAGE: &str = "quoted_message";
    pub const GIFT_BADGE: &str = "gift_badge";
    pub const STORY_TIMESTAMP: &str = "story_timestamp";
    pub const INFO_MESSAGE_USER_INFO: &str = "info_message_user_info";
    pub const UNREGISTERED_ADDRESS: &str = "unregistered_address";
    pub const PROTOCOL_VERSION: &str = "protocol_version";
    pub const SENDER: &str = "sender";
}
