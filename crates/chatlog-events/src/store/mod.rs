//! High-level `InteractionStore` API.
//!
//! The [`InteractionStore`] provides a transactional, record-centric API built
//! on top of the repository layer. Every write executes within a single
//! `SQLite` transaction, so callers never see partial state.

mod interaction_store;

pub use interaction_store::*;
