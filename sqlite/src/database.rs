//! `Database` implementation over a rusqlite connection.

use std::path::Path;
use std::rc::Rc;

use dbtest_core::Value;
use dbtest_runner::{Column, Cursor, Database, DatabaseError, DatabaseResult, MaterializedCursor};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{SqliteError, SqliteResult};

/// A SQLite database for scenarios.
///
/// Query results are read fully before the statement is released, so a
/// cursor never outlives the prepared statement behind it.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    connection: Rc<Connection>,
}

impl SqliteDatabase {
    /// Open a private in-memory database.
    pub fn open_in_memory() -> SqliteResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> SqliteResult<Self> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|e| SqliteError::open(path, e))?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self::from_shared(Rc::new(connection))
    }

    /// Wrap a connection the service under test already holds.
    pub fn from_shared(connection: Rc<Connection>) -> Self {
        Self { connection }
    }

    /// A handle to the same connection, for the service under test.
    pub fn shared(&self) -> Rc<Connection> {
        Rc::clone(&self.connection)
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl Database for SqliteDatabase {
    fn execute(&mut self, statement: &str) -> DatabaseResult<()> {
        self.connection
            .execute_batch(statement)
            .map_err(DatabaseError::other)
    }

    fn query<'a>(&'a mut self, query: &str) -> DatabaseResult<Box<dyn Cursor + 'a>> {
        let mut statement = self.connection.prepare(query).map_err(DatabaseError::other)?;
        let columns: Vec<Column> = statement
            .columns()
            .iter()
            .map(|c| match c.decl_type() {
                Some(decl_type) => Column::new(c.name()).with_decl_type(decl_type),
                None => Column::new(c.name()),
            })
            .collect();

        let mut rows = statement.query([]).map_err(DatabaseError::other)?;
        let mut values = Vec::new();
        while let Some(row) = rows.next().map_err(DatabaseError::other)? {
            let row = columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    row.get_ref(i)
                        .map(|value| value_from_ref(value, column.decl_type.as_deref()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(DatabaseError::other)?;
            values.push(row);
        }

        debug!(query, columns = columns.len(), rows = values.len(), "query read");
        Ok(Box::new(MaterializedCursor::new(columns, values)))
    }
}

/// Map a SQLite column value to a dynamic value by its storage class.
///
/// SQLite stores booleans as integers, so 0 and 1 in a column declared
/// `BOOL`/`BOOLEAN` become `Bool`. Text that is not valid UTF-8 is kept as
/// raw bytes.
fn value_from_ref(value: ValueRef<'_>, decl_type: Option<&str>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i @ (0 | 1)) if decl_type.is_some_and(is_boolean) => Value::Bool(i == 1),
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(text) => match std::str::from_utf8(text) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => Value::Bytes(text.to_vec()),
        },
        ValueRef::Blob(blob) => Value::Bytes(blob.to_vec()),
    }
}

fn is_boolean(decl_type: &str) -> bool {
    decl_type.to_ascii_uppercase().starts_with("BOOL")
}
