//! Notice that a recipient is not registered with the service.

use chatlog_core::{ServiceAddress, ThreadId};
use serde_json::Value;

use crate::errors::{DecodeError, Result};
use crate::hydrate::{Hydrate, hydration_error, parse_json, reject_populated, reject_user_info, to_json};
use crate::legacy::{ArchiveDecode, ArchiveDecoder, decode_base, keys};
use crate::sqlite::row_types::{InteractionRow, columns};
use crate::types::base::InfoMessageBase;
use crate::types::message_type::InfoMessageType;

/// A message could not be delivered because the recipient is unregistered.
#[derive(Clone, Debug, PartialEq)]
pub struct UserNotRegisteredMessage {
    base: InfoMessageBase,
    unregistered_address: ServiceAddress,
}

impl UserNotRegisteredMessage {
    /// Kind stored in the `message_type` column.
    pub const MESSAGE_TYPE: InfoMessageType = InfoMessageType::UserNotRegistered;

    /// Create a new, unpersisted notice.
    #[must_use]
    pub fn new(thread_id: &ThreadId, timestamp: u64, unregistered_address: ServiceAddress) -> Self {
        Self {
            base: InfoMessageBase::new(thread_id, timestamp),
            unregistered_address,
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

    /// The recipient that is not registered.
    #[must_use]
    pub fn unregistered_address(&self) -> &ServiceAddress {
        &self.unregistered_address
    }
}

pub(crate) struct UserNotRegisteredColumns {
    unregistered_address: ServiceAddress,
}

impl Hydrate for UserNotRegisteredMessage {
    type Columns = UserNotRegisteredColumns;

    fn message_type(&self) -> InfoMessageType {
        Self::MESSAGE_TYPE
    }

    fn base(&self) -> &InfoMessageBase {
        &self.base
    }

    fn read_columns(row: &InteractionRow) -> Result<Self::Columns> {
        reject_user_info(row)?;
        reject_populated(columns::PROTOCOL_VERSION, row.protocol_version.as_ref())?;
        reject_populated(columns::SENDER, row.sender.as_ref())?;

        let unregistered_address =
            parse_json::<ServiceAddress>(columns::UNREGISTERED_ADDRESS, row.unregistered_address.as_deref())?
                .ok_or_else(|| hydration_error(columns::UNREGISTERED_ADDRESS, "missing"))?;
        Ok(UserNotRegisteredColumns {
            unregistered_address,
        })
    }

    fn assemble(base: InfoMessageBase, columns: Self::Columns) -> Self {
        Self {
            base,
            unregistered_address: columns.unregistered_address,
        }
    }

    fn write_columns(&self, row: &mut InteractionRow) -> Result<()> {
        row.unregistered_address = Some(to_json(&self.unregistered_address)?);
        Ok(())
    }
}

impl ArchiveDecode for UserNotRegisteredMessage {
    fn decode_archive<D: ArchiveDecoder>(decoder: &D) -> std::result::Result<Self, DecodeError> {
        // Oldest archives stored the bare phone number instead of an address.
        let unregistered_address = match decoder.value(keys::UNREGISTERED_ADDRESS) {
            Some(Value::String(phone)) => {
                ServiceAddress::from_phone_number(phone.clone()).map_err(|e| {
                    DecodeError::InvalidField {
                        key: keys::UNREGISTERED_ADDRESS,
                        reason: e.to_string(),
                    }
                })?
            }
            _ => decoder.require_object::<ServiceAddress>(keys::UNREGISTERED_ADDRESS)?,
        };
        let base = decode_base(decoder)?;
        Ok(Self {
            base,
            unregistered_address,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
