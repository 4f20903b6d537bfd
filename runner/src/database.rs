//! The database seam.
//!
//! Arrange statements go through [`Database::execute`]; query assertions
//! stream rows out of a [`Cursor`]. Drivers implement both traits.

use dbtest_core::Value;
use std::collections::VecDeque;
use std::error::Error as StdError;
use thiserror::Error;

/// An error reported by the database driver.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DatabaseError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a driver error, keeping it as the source.
    pub fn other(err: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for database calls.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Metadata of a result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Declared SQL type, when the driver knows it.
    pub decl_type: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl_type: None,
        }
    }

    pub fn with_decl_type(mut self, decl_type: impl Into<String>) -> Self {
        self.decl_type = Some(decl_type.into());
        self
    }
}

/// Rows produced by a query. Dropping the cursor releases it.
pub trait Cursor {
    fn columns(&self) -> &[Column];

    /// The next row, `None` once the result set is exhausted.
    fn next_row(&mut self) -> Option<DatabaseResult<Vec<Value>>>;
}

/// A database connection used by scenarios.
pub trait Database {
    /// Execute a statement, discarding any rows.
    fn execute(&mut self, statement: &str) -> DatabaseResult<()>;

    /// Run a query.
    fn query<'a>(&'a mut self, query: &str) -> DatabaseResult<Box<dyn Cursor + 'a>>;
}

/// A cursor over rows already read into memory.
#[derive(Debug, Clone, Default)]
pub struct MaterializedCursor {
    columns: Vec<Column>,
    rows: VecDeque<Vec<Value>>,
}

impl MaterializedCursor {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows: rows.into(),
        }
    }
}

impl Cursor for MaterializedCursor {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> Option<DatabaseResult<Vec<Value>>> {
        self.rows.pop_front().map(Ok)
    }
}
