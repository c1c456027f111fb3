//! # chatlog-core
//!
//! Foundation types shared by the chatlog crates.
//!
//! - **Branded IDs**: [`RecordId`] and [`ThreadId`] as newtypes so a thread
//!   reference can never be passed where a record identifier is expected
//! - **Addresses**: [`ServiceAddress`], the originating party of a record
//! - **Logging**: `tracing` subscriber setup and an in-memory capture layer
//!   for asserting on emitted events in tests

#![deny(unsafe_code)]

pub mod address;
pub mod ids;
pub mod logging;

pub use address::{AddressError, ServiceAddress};
pub use ids::{RecordId, ThreadId};
