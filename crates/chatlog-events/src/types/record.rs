//! The tagged union over every record variant.

use chatlog_core::{RecordId, ThreadId};

use super::base::InfoMessageBase;
use super::message_type::InfoMessageType;
use super::variants::{InfoMessage, UnknownProtocolVersionMessage, UserNotRegisteredMessage};
use crate::errors::Result;
use crate::hydrate::{dehydrate, hydrate, hydration_error};
use crate::sqlite::row_types::{InteractionRow, columns};

/// Any persisted info record.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoRecord {
    /// Generic kind with a classification payload.
    Info(InfoMessage),
    /// Unregistered recipient notice.
    UserNotRegistered(UserNotRegisteredMessage),
    /// Unknown protocol version notice.
    UnknownProtocolVersion(UnknownProtocolVersionMessage),
}

impl From<InfoMessage> for InfoRecord {
    fn from(message: InfoMessage) -> Self {
        Self::Info(message)
    }
}

impl From<UserNotRegisteredMessage> for InfoRecord {
    fn from(message: UserNotRegisteredMessage) -> Self {
        Self::UserNotRegistered(message)
    }
}

impl From<UnknownProtocolVersionMessage> for InfoRecord {
    fn from(message: UnknownProtocolVersionMessage) -> Self {
        Self::UnknownProtocolVersion(message)
    }
}

impl InfoRecord {
    /// Shared base fields.
    #[must_use]
    pub fn base(&self) -> &InfoMessageBase {
        match self {
            Self::Info(m) => m.base(),
            Self::UserNotRegistered(m) => m.base(),
            Self::UnknownProtocolVersion(m) => m.base(),
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut InfoMessageBase {
        match self {
            Self::Info(m) => m.base_mut(),
            Self::UserNotRegistered(m) => m.base_mut(),
            Self::UnknownProtocolVersion(m) => m.base_mut(),
        }
    }

    /// Globally unique record identifier.
    #[must_use]
    pub fn unique_id(&self) -> &RecordId {
        self.base().unique_id()
    }

    /// Owning thread.
    #[must_use]
    pub fn thread_id(&self) -> &ThreadId {
        self.base().thread_id()
    }

    /// Storage row identifier; `None` until persisted.
    #[must_use]
    pub fn row_id(&self) -> Option<i64> {
        self.base().row_id()
    }

    /// Kind of record.
    #[must_use]
    pub fn message_type(&self) -> InfoMessageType {
        match self {
            Self::Info(m) => m.message_type(),
            Self::UserNotRegistered(_) => UserNotRegisteredMessage::MESSAGE_TYPE,
            Self::UnknownProtocolVersion(_) => UnknownProtocolVersionMessage::MESSAGE_TYPE,
        }
    }

    /// Whether this is an unknown-protocol-version notice.
    #[must_use]
    pub fn is_unknown_protocol_version_notice(&self) -> bool {
        matches!(self, Self::UnknownProtocolVersion(_))
    }

    /// Whether this is an unknown-protocol-version notice whose version the
    /// running build still cannot parse. False for every other variant.
    #[must_use]
    pub fn is_protocol_version_unknown(&self) -> bool {
        self.as_unknown_protocol_version()
            .is_some_and(UnknownProtocolVersionMessage::is_protocol_version_unknown)
    }

    /// Borrow the unknown-protocol-version notice, if this is one.
    #[must_use]
    pub fn as_unknown_protocol_version(&self) -> Option<&UnknownProtocolVersionMessage> {
        match self {
            Self::UnknownProtocolVersion(m) => Some(m),
            _ => None,
        }
    }

    /// Hydrate a record from a wide row, dispatching on `message_type`.
    pub fn from_row(row: &InteractionRow) -> Result<Self> {
        let message_type = InfoMessageType::from_code(row.message_type).ok_or_else(|| {
            hydration_error(columns::MESSAGE_TYPE, format!("unknown code {}", row.message_type))
        })?;
        Ok(match message_type {
            InfoMessageType::UserNotRegistered => Self::UserNotRegistered(hydrate(row)?),
            InfoMessageType::UnknownProtocolVersion => Self::UnknownProtocolVersion(hydrate(row)?),
            _ => Self::Info(hydrate(row)?),
        })
    }

    /// Flatten the record into a wide row.
    pub fn to_row(&self) -> Result<InteractionRow> {
        match self {
            Self::Info(m) => dehydrate(m),
            Self::UserNotRegistered(m) => dehydrate(m),
            Self::UnknownProtocolVersion(m) => dehydrate(m),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
