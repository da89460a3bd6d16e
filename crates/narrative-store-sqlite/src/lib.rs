//! SQLite backend for the narrative item store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The store holds raw dated
//! items only; computed metrics are never persisted here.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteItemStore;
