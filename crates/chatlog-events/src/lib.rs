//! # chatlog-events
//!
//! Conversation info records with `SQLite` storage and legacy archive
//! decoding.
//!
//! - **Record model**: [`InfoRecord`], a tagged union over the generic
//!   [`InfoMessage`] and its dedicated variants [`UserNotRegisteredMessage`]
//!   and [`UnknownProtocolVersionMessage`]
//! - **Registry**: [`InfoMessageType`] wire codes, with [`GenericInfoKind`]
//!   covering only the kinds that have no dedicated variant
//! - **Hydration**: variant-aware mapping to and from the wide interaction row
//! - **Legacy archives**: key-addressed decoding of pre-columnar records
//! - **Store**: transactional [`InteractionStore`] over an `r2d2` pool with
//!   version-tracked migrations

#![deny(unsafe_code)]

pub mod decode;
pub mod errors;
mod hydrate;
pub mod legacy;
pub mod protocol;
pub mod sqlite;
pub mod store;
pub mod types;

pub use decode::{StoredRecord, decode_record};
pub use errors::{DecodeError, RecordError, Result};
pub use protocol::{CURRENT_PROTOCOL_VERSION, KnownProtocolVersion, is_unknown_version};
pub use store::{FailedImport, ImportReport, InteractionStore};
pub use types::{
    ALL_INFO_MESSAGE_TYPES, ContentRef, EditState, Expiration, GenericInfoKind, InfoMessage,
    InfoMessageBase, InfoMessageType, InfoMessageUserInfo, InfoMessageUserInfoKey, InfoRecord,
    MessageOrigin, RichContent, StoryContext, UnknownProtocolVersionMessage,
    UserNotRegisteredMessage, ViewOnce,
};
