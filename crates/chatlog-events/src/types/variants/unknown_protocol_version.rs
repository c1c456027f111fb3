//! Notice that a message used a protocol version newer than this build.
//!
//! The notice is created when an incoming message cannot be parsed because
//! its protocol version is too new. Whether the version is *still* unknown
//! is not stored: [`UnknownProtocolVersionMessage::is_protocol_version_unknown`]
//! compares against the running build on every call, so after an upgrade
//! the same stored notice can report the version as known.

use chatlog_core::{ServiceAddress, ThreadId};

use crate::errors::{DecodeError, Result};
use crate::hydrate::{
    Hydrate, from_u64, hydration_error, parse_json, reject_populated, reject_user_info, to_json,
    to_u64,
};
use crate::legacy::{ArchiveDecode, ArchiveDecoder, decode_base, decode_sender, keys};
use crate::protocol::{CURRENT_PROTOCOL_VERSION, is_unknown_version};
use crate::sqlite::row_types::{InteractionRow, columns};
use crate::types::base::InfoMessageBase;
use crate::types::message_type::InfoMessageType;

/// Who sent the message that could not be parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageOrigin<'a> {
    /// A remote party.
    Remote(&'a ServiceAddress),
    /// One of the local user's own linked devices.
    LinkedDevice,
}

/// A message arrived with a protocol version this build could not parse.
///
/// `protocol_version` and `sender` are fixed at construction. The version
/// is kept as received, with no upper bound; storage holds it as a signed
/// 64-bit integer. An absent sender means the message came from one of the
/// local user's linked devices.
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownProtocolVersionMessage {
    base: InfoMessageBase,
    protocol_version: u64,
    sender: Option<ServiceAddress>,
}

impl UnknownProtocolVersionMessage {
    /// Kind stored in the `message_type` column.
    pub const MESSAGE_TYPE: InfoMessageType = InfoMessageType::UnknownProtocolVersion;

    /// Create a new, unpersisted notice.
    #[must_use]
    pub fn new(
        thread_id: &ThreadId,
        timestamp: u64,
        sender: Option<ServiceAddress>,
        protocol_version: u64,
    ) -> Self {
        Self {
            base: InfoMessageBase::new(thread_id, timestamp),
            protocol_version,
            sender,
        }
    }

    /// Shared base fields.
    #[must_use]
    pub fn base(&self) -> &InfoMessageBase {
        &self.base
    }

    pub(crate) fn base_mut(&mut self) -> &mut InfoMessageBase {
        &mut self.base
    }

    /// Protocol version the message was sent with, as received.
    #[must_use]
    pub fn protocol_version(&self) -> u64 {
        self.protocol_version
    }

    /// Remote sender; `None` for the local user's linked devices.
    #[must_use]
    pub fn sender(&self) -> Option<&ServiceAddress> {
        self.sender.as_ref()
    }

    /// Origin of the unparseable message.
    #[must_use]
    pub fn origin(&self) -> MessageOrigin<'_> {
        self.sender
            .as_ref()
            .map_or(MessageOrigin::LinkedDevice, MessageOrigin::Remote)
    }

    /// Whether the running build still cannot parse the stored version.
    #[must_use]
    pub fn is_protocol_version_unknown(&self) -> bool {
        self.is_protocol_version_unknown_for(CURRENT_PROTOCOL_VERSION)
    }

    /// Whether a build supporting up to `max_supported` could not parse
    /// the stored version.
    #[must_use]
    pub fn is_protocol_version_unknown_for(&self, max_supported: u64) -> bool {
        is_unknown_version(self.protocol_version, max_supported)
    }
}

pub(crate) struct UnknownProtocolVersionColumns {
    protocol_version: u64,
    sender: Option<ServiceAddress>,
}

impl Hydrate for UnknownProtocolVersionMessage {
    type Columns = UnknownProtocolVersionColumns;

    fn message_type(&self) -> InfoMessageType {
        Self::MESSAGE_TYPE
    }

    fn base(&self) -> &InfoMessageBase {
        &self.base
    }

    fn read_columns(row: &InteractionRow) -> Result<Self::Columns> {
        reject_user_info(row)?;
        reject_populated(columns::UNREGISTERED_ADDRESS, row.unregistered_address.as_ref())?;

        let raw = row
            .protocol_version
            .ok_or_else(|| hydration_error(columns::PROTOCOL_VERSION, "missing"))?;
        let protocol_version = to_u64(columns::PROTOCOL_VERSION, raw)?;
        let sender = parse_json(columns::SENDER, row.sender.as_deref())?;
        Ok(UnknownProtocolVersionColumns {
            protocol_version,
            sender,
        })
    }

    fn assemble(base: InfoMessageBase, columns: Self::Columns) -> Self {
        Self {
            base,
            protocol_version: columns.protocol_version,
            sender: columns.sender,
        }
    }

    fn write_columns(&self, row: &mut InteractionRow) -> Result<()> {
        row.protocol_version = Some(from_u64(columns::PROTOCOL_VERSION, self.protocol_version)?);
        row.sender = self.sender.as_ref().map(to_json).transpose()?;
        Ok(())
    }
}

impl ArchiveDecode for UnknownProtocolVersionMessage {
    fn decode_archive<D: ArchiveDecoder>(decoder: &D) -> std::result::Result<Self, DecodeError> {
        let protocol_version = decoder.require_u64(keys::PROTOCOL_VERSION)?;
        let base = decode_base(decoder)?;
        Ok(Self {
            base,
            protocol_version,
            sender: decode_sender(decoder),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
