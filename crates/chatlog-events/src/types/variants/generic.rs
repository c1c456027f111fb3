//! Generic info message: a kind plus a classification payload.

use chatlog_core::ThreadId;
use serde_json::Value;

use crate::errors::{DecodeError, Result};
use crate::hydrate::{Hydrate, hydration_error, parse_json, reject_populated, to_json};
use crate::legacy::{ArchiveDecode, ArchiveDecoder, decode_base, decode_message_type, keys};
use crate::sqlite::row_types::{InteractionRow, columns};
use crate::types::base::InfoMessageBase;
use crate::types::message_type::{GenericInfoKind, InfoMessageType};
use crate::types::user_info::{InfoMessageUserInfo, InfoMessageUserInfoKey, user_info_from_value};

/// Info message of a kind without a dedicated variant.
#[derive(Clone, Debug, PartialEq)]
pub struct InfoMessage {
    base: InfoMessageBase,
    kind: GenericInfoKind,
    user_info: InfoMessageUserInfo,
}

impl InfoMessage {
    /// Create a new, unpersisted info message.
    #[must_use]
    pub fn new(
        thread_id: &ThreadId,
        timestamp: u64,
        kind: GenericInfoKind,
        user_info: InfoMessageUserInfo,
    ) -> Self {
        Self {
            base: InfoMessageBase::new(thread_id, timestamp),
            kind,
            user_info,
        }
    }

    /// Create an info message whose text replaces the kind's default.
    #[must_use]
    pub fn with_custom_message(
        thread_id: &ThreadId,
        timestamp: u64,
        kind: GenericInfoKind,
        custom_message: impl Into<String>,
    ) -> Self {
        let mut message = Self::new(thread_id, timestamp, kind, InfoMessageUserInfo::new());
        message.base.custom_message = Some(custom_message.into());
        message
    }

    /// Shared base fields.
    #[must_use]
    pub fn base(&self) -> &InfoMessageBase {
        &self.base
    }

    pub(crate) fn base_mut(&mut self) -> &mut InfoMessageBase {
        &mut self.base
    }

    /// Kind of info message.
    #[must_use]
    pub fn kind(&self) -> GenericInfoKind {
        self.kind
    }

    /// Kind as the full message type.
    #[must_use]
    pub fn message_type(&self) -> InfoMessageType {
        self.kind.into()
    }

    /// Classification payload.
    #[must_use]
    pub fn user_info(&self) -> &InfoMessageUserInfo {
        &self.user_info
    }

    /// Single payload entry.
    #[must_use]
    pub fn user_info_value(&self, key: InfoMessageUserInfoKey) -> Option<&Value> {
        self.user_info.get(&key)
    }
}

pub(crate) struct InfoMessageColumns {
    kind: GenericInfoKind,
    user_info: InfoMessageUserInfo,
}

impl Hydrate for InfoMessage {
    type Columns = InfoMessageColumns;

    fn message_type(&self) -> InfoMessageType {
        self.kind.into()
    }

    fn base(&self) -> &InfoMessageBase {
        &self.base
    }

    fn read_columns(row: &InteractionRow) -> Result<Self::Columns> {
        reject_populated(columns::UNREGISTERED_ADDRESS, row.unregistered_address.as_ref())?;
        reject_populated(columns::PROTOCOL_VERSION, row.protocol_version.as_ref())?;
        reject_populated(columns::SENDER, row.sender.as_ref())?;

        let message_type = InfoMessageType::from_code(row.message_type).ok_or_else(|| {
            hydration_error(columns::MESSAGE_TYPE, format!("unknown code {}", row.message_type))
        })?;
        let kind = GenericInfoKind::try_from(message_type).map_err(|t| {
            hydration_error(columns::MESSAGE_TYPE, format!("{t} is stored by a dedicated variant"))
        })?;
        let user_info = parse_json::<Value>(
            columns::INFO_MESSAGE_USER_INFO,
            row.info_message_user_info.as_deref(),
        )?
        .map(|v| user_info_from_value(&v))
        .unwrap_or_default();

        Ok(InfoMessageColumns { kind, user_info })
    }

    fn assemble(base: InfoMessageBase, columns: Self::Columns) -> Self {
        Self {
            base,
            kind: columns.kind,
            user_info: columns.user_info,
        }
    }

    fn write_columns(&self, row: &mut InteractionRow) -> Result<()> {
        row.info_message_user_info = if self.user_info.is_empty() {
            None
        } else {
            Some(to_json(&self.user_info)?)
        };
        Ok(())
    }
}

impl ArchiveDecode for InfoMessage {
    fn decode_archive<D: ArchiveDecoder>(decoder: &D) -> std::result::Result<Self, DecodeError> {
        let message_type = decode_message_type(decoder)?;
        let kind = GenericInfoKind::try_from(message_type).map_err(|t| DecodeError::InvalidField {
            key: keys::MESSAGE_TYPE,
            reason: format!("{t} is stored by a dedicated variant"),
        })?;
        let base = decode_base(decoder)?;
        let user_info = decoder
            .value(keys::INFO_MESSAGE_USER_INFO)
            .filter(|v| !v.is_null())
            .map(user_info_from_value)
            .unwrap_or_default();
        Ok(Self {
            base,
            kind,
            user_info,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
