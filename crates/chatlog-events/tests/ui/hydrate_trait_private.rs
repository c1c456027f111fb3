//! Wide hydration is crate-private: the trait cannot be named from outside.

use chatlog_core::ThreadId;
use chatlog_events::hydrate::Hydrate;
use chatlog_events::{InfoRecord, UnknownProtocolVersionMessage};

fn main() {
    let record: InfoRecord =
        UnknownProtocolVersionMessage::new(&ThreadId::from("t"), 1, None, 3).into();
    let row = record.to_row().unwrap();

    let columns = UnknownProtocolVersionMessage::read_columns(&row).unwrap();
    let _ = UnknownProtocolVersionMessage::assemble(record.base().clone(), columns);
}
