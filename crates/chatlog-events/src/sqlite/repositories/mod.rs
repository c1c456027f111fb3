//! Repository implementations for `SQLite` database operations.
//!
//! Each repository is a stateless struct whose methods take a `&Connection`
//! parameter and deal only in raw rows. Hydration into records happens in
//! the store.

pub mod interaction;
pub mod legacy_archive;
