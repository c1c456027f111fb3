//! Without the crate-private trait in scope, a variant offers no way to be
//! built from a wide row; `InfoRecord::from_row` is the only entry point.

use chatlog_core::ThreadId;
use chatlog_events::{InfoRecord, UnknownProtocolVersionMessage, UserNotRegisteredMessage};

fn main() {
    let record: InfoRecord =
        UnknownProtocolVersionMessage::new(&ThreadId::from("t"), 1, None, 3).into();
    let row = record.to_row().unwrap();

    let _ = UserNotRegisteredMessage::read_columns(&row);
}
