//! SQLite backend for the Rota schedule store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The "one live row" rules live in the
//! schema as partial unique indexes, so they hold even when two requests
//! race past the services' pre-checks.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
