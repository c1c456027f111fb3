//! Legacy archive decoding into records.

use chatlog_core::{RecordId, ServiceAddress, ThreadId};
use tracing::debug;

use super::archive::{ArchiveDecoder, KeyedArchive, keys};
use crate::errors::DecodeError;
use crate::types::{
    ContentRef, EditState, Expiration, InfoMessage, InfoMessageBase, InfoMessageType, InfoRecord,
    RichContent, StoryContext, UnknownProtocolVersionMessage, UserNotRegisteredMessage, ViewOnce,
};

/// Class name of generic and user-not-registered info message archives.
pub const INFO_MESSAGE_CLASS: &str = "InfoMessage";

/// Class name of unknown-protocol-version archives.
pub const UNKNOWN_PROTOCOL_VERSION_CLASS: &str = "UnknownProtocolVersionMessage";

/// Legacy archive shape of one record variant.
pub(crate) trait ArchiveDecode: Sized {
    /// Rebuild the variant from a keyed archive.
    fn decode_archive<D: ArchiveDecoder>(decoder: &D) -> Result<Self, DecodeError>;
}

/// Decode a legacy archive blob.
pub fn decode_archive(bytes: &[u8]) -> Result<InfoRecord, DecodeError> {
    let archive = KeyedArchive::from_slice(bytes)?;
    decode_class(archive.class_name(), &archive)
}

/// Decode an archive whose class has already been read.
pub fn decode_class<D: ArchiveDecoder>(class_name: &str, decoder: &D) -> Result<InfoRecord, DecodeError> {
    match class_name {
        UNKNOWN_PROTOCOL_VERSION_CLASS => {
            UnknownProtocolVersionMessage::decode_archive(decoder).map(InfoRecord::from)
        }
        INFO_MESSAGE_CLASS => decode_info_message(decoder),
        other => Err(DecodeError::UnsupportedClass(other.to_owned())),
    }
}

/// `InfoMessage` archives predate the dedicated variants, so the kind
/// decides which variant to build.
fn decode_info_message<D: ArchiveDecoder>(decoder: &D) -> Result<InfoRecord, DecodeError> {
    match decode_message_type(decoder)? {
        InfoMessageType::UserNotRegistered => {
            UserNotRegisteredMessage::decode_archive(decoder).map(InfoRecord::from)
        }
        InfoMessageType::UnknownProtocolVersion => {
            UnknownProtocolVersionMessage::decode_archive(decoder).map(InfoRecord::from)
        }
        _ => InfoMessage::decode_archive(decoder).map(InfoRecord::from),
    }
}

pub(crate) fn decode_message_type<D: ArchiveDecoder>(
    decoder: &D,
) -> Result<InfoMessageType, DecodeError> {
    let code = decoder.require_u32(keys::MESSAGE_TYPE)?;
    InfoMessageType::from_code(i64::from(code)).ok_or_else(|| DecodeError::InvalidField {
        key: keys::MESSAGE_TYPE,
        reason: format!("unknown info message type {code}"),
    })
}

/// Originating party: the `sender` address, or the bare phone number that
/// older archives stored under `senderId`.
pub(crate) fn decode_sender<D: ArchiveDecoder>(decoder: &D) -> Option<ServiceAddress> {
    if let Some(sender) = decoder.decode_object::<ServiceAddress>(keys::SENDER) {
        return Some(sender);
    }
    let phone = decoder.decode_string(keys::SENDER_ID)?;
    match ServiceAddress::from_phone_number(phone) {
        Ok(address) => Some(address),
        Err(e) => {
            debug!(error = %e, "ignoring unusable legacy sender id");
            None
        }
    }
}

/// Base fields. Only the thread reference is required; everything else
/// falls back to the narrow-constructor defaults.
pub(crate) fn decode_base<D: ArchiveDecoder>(decoder: &D) -> Result<InfoMessageBase, DecodeError> {
    let thread_id = ThreadId::from(decoder.require_string(keys::UNIQUE_THREAD_ID)?);
    let unique_id = decoder
        .decode_string(keys::UNIQUE_ID)
        .filter(|id| !id.trim().is_empty())
        .map_or_else(RecordId::new, RecordId::from);
    let timestamp = decoder.decode_u64(keys::TIMESTAMP).unwrap_or(0);
    let content_ref = |key: &str| decoder.decode_object::<ContentRef>(key);

    Ok(InfoMessageBase {
        row_id: None,
        unique_id,
        thread_id,
        timestamp,
        // Archives written before receipt tracking only know the send time.
        received_at_timestamp: decoder
            .decode_u64(keys::RECEIVED_AT_TIMESTAMP)
            .filter(|t| *t > 0)
            .unwrap_or(timestamp),
        server_guid: decoder.decode_string(keys::SERVER_GUID),
        read: decoder.decode_bool(keys::READ).unwrap_or(false),
        was_remotely_deleted: decoder.decode_bool(keys::WAS_REMOTELY_DELETED).unwrap_or(false),
        expiration: Expiration {
            expires_in_seconds: decoder.decode_u32(keys::EXPIRES_IN_SECONDS).unwrap_or(0),
            expire_started_at: decoder.decode_u64(keys::EXPIRE_STARTED_AT).unwrap_or(0),
            expires_at: decoder.decode_u64(keys::EXPIRES_AT).unwrap_or(0),
            stored_should_start_expire_timer: decoder
                .decode_bool(keys::SHOULD_START_EXPIRE_TIMER)
                .unwrap_or(false),
        },
        view_once: ViewOnce {
            is_view_once_message: decoder.decode_bool(keys::IS_VIEW_ONCE_MESSAGE).unwrap_or(false),
            is_view_once_complete: decoder
                .decode_bool(keys::IS_VIEW_ONCE_COMPLETE)
                .unwrap_or(false),
        },
        content: RichContent {
            attachment_ids: decoder
                .decode_object::<Vec<String>>(keys::ATTACHMENT_IDS)
                .unwrap_or_default(),
            body: decoder.decode_string(keys::BODY),
            body_ranges: content_ref(keys::BODY_RANGES),
            contact_share: content_ref(keys::CONTACT_SHARE),
            link_preview: content_ref(keys::LINK_PREVIEW),
            message_sticker: content_ref(keys::MESSAGE_STICKER),
            quoted_message: content_ref(keys::QUOTED_MESSAGE),
            gift_badge: content_ref(keys::GIFT_BADGE),
        },
        story: StoryContext {
            author_uuid: decoder.decode_string(keys::STORY_AUTHOR_UUID),
            timestamp: decoder.decode_u64(keys::STORY_TIMESTAMP),
            reaction_emoji: decoder.decode_string(keys::STORY_REACTION_EMOJI),
            is_group_story_reply: decoder.decode_bool(keys::IS_GROUP_STORY_REPLY).unwrap_or(false),
        },
        edit_state: EditState::None,
        custom_message: decoder.decode_string(keys::CUSTOM_MESSAGE),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
