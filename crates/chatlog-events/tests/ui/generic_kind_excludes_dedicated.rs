//! The generic constructor only accepts kinds without a dedicated variant,
//! so an unknown-protocol-version notice cannot be built as a generic
//! info message.

use chatlog_core::ThreadId;
use chatlog_events::{GenericInfoKind, InfoMessage, InfoMessageUserInfo};

fn main() {
    let _ = InfoMessage::new(
        &ThreadId::from("t"),
        1,
        GenericInfoKind::UnknownProtocolVersion,
        InfoMessageUserInfo::new(),
    );
}
