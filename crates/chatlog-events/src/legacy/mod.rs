//! Legacy archive support.
//!
//! - **[`archive`]**: the key-addressed [`ArchiveDecoder`] trait and the
//!   JSON-backed [`KeyedArchive`].
//! - **`decode`**: per-variant archive decoding and class dispatch.

pub mod archive;
mod decode;

pub use archive::{ArchiveDecoder, KeyedArchive, keys};
pub use decode::{INFO_MESSAGE_CLASS, UNKNOWN_PROTOCOL_VERSION_CLASS, decode_archive, decode_class};

pub(crate) use decode::{ArchiveDecode, decode_base, decode_message_type, decode_sender};
