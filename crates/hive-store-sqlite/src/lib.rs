//! SQLite backend for the Hive question-and-answer service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every multi-step write runs inside a
//! `BEGIN IMMEDIATE` transaction, which serialises writers across processes
//! sharing the same database file.

mod encode;
mod ledger;
mod query;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
