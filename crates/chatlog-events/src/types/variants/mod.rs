//! Concrete record variants.
//!
//! Each variant owns its base fields privately and exposes exactly one
//! public constructor for application code. Its wide-row and legacy
//! archive shapes are implemented next to it.

mod generic;
mod unknown_protocol_version;
mod user_not_registered;

pub use generic::InfoMessage;
pub use unknown_protocol_version::{MessageOrigin, UnknownProtocolVersionMessage};
pub use user_not_registered::UserNotRegisteredMessage;
