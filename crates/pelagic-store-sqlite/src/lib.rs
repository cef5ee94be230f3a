//! SQLite backend for the pelagic observation store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. WAL journaling gives
//! concurrent readers with serialized writers, so the upsert path relies on
//! the store's native write serialization rather than its own locking.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
