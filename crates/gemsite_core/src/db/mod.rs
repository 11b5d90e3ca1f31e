//! SQLite storage for the content slot.
//!
//! # Responsibility
//! - Open the database file (or a private in-memory one) and migrate it.
//! - Report failures by stage: opening, migrating, querying.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Callers never see a connection whose migrations have not run.

mod error;
pub mod migrations;
mod open;

pub use error::{DbError, DbResult, OpenTarget};
pub use open::{open_db, open_db_in_memory};
