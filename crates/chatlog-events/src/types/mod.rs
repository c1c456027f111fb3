//! Record model.
//!
//! - **[`InfoRecord`]**: tagged union over every record variant.
//! - **Variants**: [`InfoMessage`], [`UserNotRegisteredMessage`],
//!   [`UnknownProtocolVersionMessage`].
//! - **Registry**: [`InfoMessageType`] and [`GenericInfoKind`], generated
//!   by `define_info_messages!`.
//! - **Values**: base fields and the rich-content/presentation types they use.

#[macro_use]
mod macros;

pub mod base;
pub mod content;
pub mod message_type;
pub mod record;
pub mod user_info;
pub mod variants;

pub use base::InfoMessageBase;
pub use content::{ContentRef, EditState, Expiration, RichContent, StoryContext, ViewOnce};
pub use message_type::{ALL_INFO_MESSAGE_TYPES, GenericInfoKind, InfoMessageType};
pub use record::InfoRecord;
pub use user_info::{InfoMessageUserInfo, InfoMessageUserInfoKey};
pub use variants::{
    InfoMessage, MessageOrigin, UnknownProtocolVersionMessage, UserNotRegisteredMessage,
};
