//! A notice cannot be assembled field by field outside the crate; the
//! narrow constructor is the only way in.

use chatlog_core::ThreadId;
use chatlog_events::UnknownProtocolVersionMessage;

fn main() {
    let template = UnknownProtocolVersionMessage::new(&ThreadId::from("t"), 1, None, 3);

    let _forged = UnknownProtocolVersionMessage {
        base: template.base().clone(),
        protocol_version: 99,
        sender: None,
    };
}
