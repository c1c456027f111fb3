//! Presentation and rich-content value types shared by every record.
//!
//! Rich content is owned by other subsystems (attachments, link previews,
//! quotes, stickers). Records only hold opaque references to it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque reference to externally-owned content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(Value);

impl ContentRef {
    /// Wrap a stored reference.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the stored reference.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the stored reference.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Rich content attached to a record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RichContent {
    /// Attachment identifiers, in display order.
    pub attachment_ids: Vec<String>,
    /// Text body.
    pub body: Option<String>,
    /// Mention and style ranges over the body.
    pub body_ranges: Option<ContentRef>,
    /// Shared contact card.
    pub contact_share: Option<ContentRef>,
    /// Link preview.
    pub link_preview: Option<ContentRef>,
    /// Sticker.
    pub message_sticker: Option<ContentRef>,
    /// Quoted message.
    pub quoted_message: Option<ContentRef>,
    /// Gift badge.
    pub gift_badge: Option<ContentRef>,
}

impl RichContent {
    /// True when nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Story this record replies or reacts to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryContext {
    /// Story author's service identifier.
    pub author_uuid: Option<String>,
    /// Story timestamp.
    pub timestamp: Option<u64>,
    /// Reaction emoji sent to the story.
    pub reaction_emoji: Option<String>,
    /// Whether the reply went to a group story.
    pub is_group_story_reply: bool,
}

/// Disappearing-message timing.
///
/// All values are logical clock milliseconds except `expires_in_seconds`.
/// Zero means "not set".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Expiration {
    /// Timer duration.
    pub expires_in_seconds: u32,
    /// When the timer started.
    pub expire_started_at: u64,
    /// When the record expires.
    pub expires_at: u64,
    /// Whether the timer should start once the record is displayed.
    pub stored_should_start_expire_timer: bool,
}

impl Expiration {
    /// Whether a timer is configured at all.
    #[must_use]
    pub fn has_timer(&self) -> bool {
        self.expires_in_seconds > 0
    }

    /// Whether the record is expired at `now_ms`.
    #[must_use]
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at > 0 && self.expires_at <= now_ms
    }
}

/// View-once flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewOnce {
    /// Record was sent as view-once.
    pub is_view_once_message: bool,
    /// The single view has been used.
    pub is_view_once_complete: bool,
}

/// Edit revision state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditState {
    /// Never edited.
    #[default]
    None,
    /// Latest revision, already read.
    LatestRevisionRead,
    /// Latest revision, not yet read.
    LatestRevisionUnread,
    /// Superseded revision.
    PastRevision,
}

impl EditState {
    /// Persisted integer code.
    #[must_use]
    pub const fn as_code(self) -> i64 {
        match self {
            Self::None => 0,
            Self::LatestRevisionRead => 1,
            Self::LatestRevisionUnread => 2,
            Self::PastRevision => 3,
        }
    }

    /// Look up a state by its persisted integer code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::LatestRevisionRead),
            2 => Some(Self::LatestRevisionUnread),
            3 => Some(Self::PastRevision),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
