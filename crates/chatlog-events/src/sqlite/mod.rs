//! `SQLite` backend for the record store.
//!
//! # Architecture
//!
//! - **[`connection`]**: `r2d2` connection pool with WAL mode, foreign keys, and
//!   performance pragmas applied to every connection.
//! - **[`migrations`]**: Version-tracked schema evolution. Migrations are embedded
//!   at compile time and run transactionally.
//! - **[`row_types`]**: Raw database row structs for `rusqlite` row mapping.
//! - **[`repositories`]**: Stateless repository structs. Each method takes
//!   `&Connection` and executes SQL. No shared mutable state.

pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod row_types;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, PragmaState, new_file, new_in_memory,
    verify_pragmas,
};
pub use migrations::{current_version, latest_version, run_migrations};
pub use repositories::interaction::{InteractionRepo, ListOptions};
pub use repositories::legacy_archive::LegacyArchiveRepo;
pub use row_types::{InteractionRow, LegacyArchiveRow};
