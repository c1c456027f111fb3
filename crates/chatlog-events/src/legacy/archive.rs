//! Key-addressed legacy archives.
//!
//! Records written before the columnar store existed were archived as
//! keyed blobs. A blob names the class it encodes under `$class` and holds
//! one entry per field:
//!
//! ```json
//! { "$class": "UnknownProtocolVersionMessage", "uniqueThreadId": "t-1",
//!   "timestamp": 1700000000000, "protocolVersion": 9 }
//! ```
//!
//! Archives from different releases carry different key sets. Optional
//! keys may be absent or carry an unexpected type; the lenient helpers on
//! [`ArchiveDecoder`] turn both into `None`. Keys nobody asks for are
//! ignored.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::DecodeError;

/// Archive keys.
pub mod keys {
    /// Class name of the archived record.
    pub const CLASS: &str = "$class";
    /// Record ID.
    pub const UNIQUE_ID: &str = "uniqueId";
    /// Thread ID.
    pub const UNIQUE_THREAD_ID: &str = "uniqueThreadId";
    /// Creation timestamp.
    pub const TIMESTAMP: &str = "timestamp";
    /// Receipt timestamp.
    pub const RECEIVED_AT_TIMESTAMP: &str = "receivedAtTimestamp";
    /// Server GUID.
    pub const SERVER_GUID: &str = "serverGuid";
    /// Read flag.
    pub const READ: &str = "read";
    /// Remote-deletion flag.
    pub const WAS_REMOTELY_DELETED: &str = "wasRemotelyDeleted";
    /// Expiration start.
    pub const EXPIRE_STARTED_AT: &str = "expireStartedAt";
    /// Expiration end.
    pub const EXPIRES_AT: &str = "expiresAt";
    /// Expiration duration.
    pub const EXPIRES_IN_SECONDS: &str = "expiresInSeconds";
    /// Start the timer on display.
    pub const SHOULD_START_EXPIRE_TIMER: &str = "shouldStartExpireTimer";
    /// View-once flag.
    pub const IS_VIEW_ONCE_MESSAGE: &str = "isViewOnceMessage";
    /// View-once consumed flag.
    pub const IS_VIEW_ONCE_COMPLETE: &str = "isViewOnceComplete";
    /// Attachment IDs.
    pub const ATTACHMENT_IDS: &str = "attachmentIds";
    /// Text body.
    pub const BODY: &str = "body";
    /// Body ranges.
    pub const BODY_RANGES: &str = "bodyRanges";
    /// Contact share.
    pub const CONTACT_SHARE: &str = "contactShare";
    /// Link preview.
    pub const LINK_PREVIEW: &str = "linkPreview";
    /// Sticker.
    pub const MESSAGE_STICKER: &str = "messageSticker";
    /// Quoted message.
    pub const QUOTED_MESSAGE: &str = "quotedMessage";
    /// Gift badge.
    pub const GIFT_BADGE: &str = "giftBadge";
    /// Story author.
    pub const STORY_AUTHOR_UUID: &str = "storyAuthorUuidString";
    /// Story timestamp.
    pub const STORY_TIMESTAMP: &str = "storyTimestamp";
    /// Story reaction emoji.
    pub const STORY_REACTION_EMOJI: &str = "storyReactionEmoji";
    /// Group story reply flag.
    pub const IS_GROUP_STORY_REPLY: &str = "isGroupStoryReply";
    /// Custom message text.
    pub const CUSTOM_MESSAGE: &str = "customMessage";
    /// Info message type code.
    pub const MESSAGE_TYPE: &str = "messageType";
    /// Classification payload.
    pub const INFO_MESSAGE_USER_INFO: &str = "infoMessageUserInfo";
    /// Unregistered recipient address.
    pub const UNREGISTERED_ADDRESS: &str = "unregisteredAddress";
    /// Unknown protocol version.
    pub const PROTOCOL_VERSION: &str = "protocolVersion";
    /// Originating party address.
    pub const SENDER: &str = "sender";
    /// Originating party phone number, from before addresses existed.
    pub const SENDER_ID: &str = "senderId";
}

/// Key-addressed field access over an archive.
///
/// Implementors only provide [`value`](Self::value). An explicit `null` is
/// treated the same as an absent key.
pub trait ArchiveDecoder {
    /// Raw value stored under `key`.
    fn value(&self, key: &str) -> Option<&Value>;

    /// Whether `key` holds a non-null value.
    fn contains_key(&self, key: &str) -> bool {
        present(self, key).is_some()
    }

    // ── Lenient decoding ────────────────────────────────────────────

    /// Optional unsigned integer.
    fn decode_u64(&self, key: &str) -> Option<u64> {
        let value = present(self, key)?;
        lenient(key, value.as_u64(), "unsigned integer")
    }

    /// Optional `u32`.
    fn decode_u32(&self, key: &str) -> Option<u32> {
        let value = self.decode_u64(key)?;
        lenient(key, u32::try_from(value).ok(), "u32")
    }

    /// Optional flag. Archives written by older releases store flags as
    /// `0`/`1` numbers.
    fn decode_bool(&self, key: &str) -> Option<bool> {
        let parsed = match present(self, key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_u64().map(|n| n != 0),
            _ => None,
        };
        lenient(key, parsed, "bool")
    }

    /// Optional string.
    fn decode_string(&self, key: &str) -> Option<String> {
        let value = present(self, key)?;
        lenient(key, value.as_str().map(str::to_owned), "string")
    }

    /// Optional structured value.
    fn decode_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = present(self, key)?;
        match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(key, error = %e, "archive value does not decode, using default");
                None
            }
        }
    }

    // ── Strict decoding ─────────────────────────────────────────────

    /// Required unsigned integer.
    fn require_u64(&self, key: &'static str) -> Result<u64, DecodeError> {
        let value = present(self, key).ok_or(DecodeError::MissingField { key })?;
        value.as_u64().ok_or_else(|| DecodeError::InvalidField {
            key,
            reason: format!("expected unsigned integer, found {value}"),
        })
    }

    /// Required `u32`.
    fn require_u32(&self, key: &'static str) -> Result<u32, DecodeError> {
        let value = self.require_u64(key)?;
        u32::try_from(value).map_err(|_| DecodeError::InvalidField {
            key,
            reason: format!("expected u32, found {value}"),
        })
    }

    /// Required non-empty string.
    fn require_string(&self, key: &'static str) -> Result<String, DecodeError> {
        let value = present(self, key).ok_or(DecodeError::MissingField { key })?;
        match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(s.to_owned()),
            Some(_) => Err(DecodeError::InvalidField {
                key,
                reason: "must not be empty".into(),
            }),
            None => Err(DecodeError::InvalidField {
                key,
                reason: format!("expected string, found {value}"),
            }),
        }
    }

    /// Required structured value.
    fn require_object<T: DeserializeOwned>(&self, key: &'static str) -> Result<T, DecodeError> {
        let value = present(self, key).ok_or(DecodeError::MissingField { key })?;
        serde_json::from_value(value.clone()).map_err(|e| DecodeError::InvalidField {
            key,
            reason: e.to_string(),
        })
    }
}

fn present<'a, D: ArchiveDecoder + ?Sized>(decoder: &'a D, key: &str) -> Option<&'a Value> {
    decoder.value(key).filter(|v| !v.is_null())
}

fn lenient<T>(key: &str, parsed: Option<T>, expected: &'static str) -> Option<T> {
    if parsed.is_none() {
        debug!(key, expected, "archive value has unexpected type, using default");
    }
    parsed
}

/// JSON-object-backed archive.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedArchive {
    class_name: String,
    fields: Map<String, Value>,
}

impl KeyedArchive {
    /// Parse an archive blob.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| DecodeError::MalformedArchive(e.to_string()))?;
        let Value::Object(mut fields) = root else {
            return Err(DecodeError::MalformedArchive(
                "archive root is not an object".into(),
            ));
        };
        let class_name = match fields.remove(keys::CLASS) {
            None | Some(Value::Null) => return Err(DecodeError::MissingClass),
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(other) => {
                return Err(DecodeError::MalformedArchive(format!(
                    "invalid class name {other}"
                )));
            }
        };
        Ok(Self { class_name, fields })
    }

    /// Build an archive from its class and fields.
    #[must_use]
    pub fn new(class_name: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            class_name: class_name.into(),
            fields,
        }
    }

    /// Class name of the archived record.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Keys present in the archive.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Serialize back to a blob.
    pub fn to_vec(&self) -> serde_json::Result<Vec<u8>> {
        let mut root = self.fields.clone();
        let _ = root.insert(keys::CLASS.to_owned(), Value::String(self.class_name.clone()));
        serde_json::to_vec(&root)
    }
}

impl ArchiveDecoder for KeyedArchive {
    fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
