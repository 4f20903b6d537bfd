//! SQLite adapter errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up a SQLite database.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// The database file could not be opened.
    #[error("failed to open sqlite database '{path}': {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl SqliteError {
    pub fn open(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}

/// Result type for the SQLite adapter.
pub type SqliteResult<T> = Result<T, SqliteError>;
