//! dbtest SQLite Adapter
//!
//! Implements the runner's [`Database`](dbtest_runner::Database) seam on top
//! of a `rusqlite` connection. The connection can be shared with the service
//! under test through [`SqliteDatabase::shared`].

mod database;
mod error;

pub use database::SqliteDatabase;
pub use error::{SqliteError, SqliteResult};
