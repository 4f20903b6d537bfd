//! Error types for the scenario runner.

use crate::DatabaseError;
use dbtest_construct::ConstructionError;
use dbtest_core::{InvokeError, Value};
use dbtest_registry::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scenario runs.
pub type RunResult<T> = Result<T, RunError>;

/// Errors that can occur when loading a scenario document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Failed to read a file.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed YAML document.
    #[error("failed to parse YAML scenarios: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed JSON document.
    #[error("failed to parse JSON scenarios: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

/// Which check an assertion failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The method returned an error no assertion declared.
    UnexpectedError,
    /// An error was declared but the method succeeded.
    ExpectedErrorMissing,
    /// The method returned a different error message.
    ErrorMessageMismatch,
    /// The query yielded fewer rows than expected.
    MissingRows,
    /// The query yielded more rows than expected.
    ExtraRows,
    ColumnCountMismatch,
    ColumnTypeIncompatible,
    ValueMismatch,
    /// The method does not return exactly one value besides its error.
    ReturnCountMismatch,
}

/// A failed assertion, named after its scenario.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{scenario}: {message}")]
pub struct AssertionFailure {
    pub scenario: String,
    pub kind: FailureKind,
    pub message: String,
    /// Rendered in value mismatches.
    pub expected: Option<Value>,
    pub actual: Option<Value>,
}

impl AssertionFailure {
    pub fn new(scenario: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            kind,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Attach the compared values.
    pub fn with_values(mut self, expected: Value, actual: Value) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }
}

/// Errors that can occur when running scenarios.
#[derive(Debug, Error)]
pub enum RunError {
    /// The scenario document could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Type discovery or registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A value names a record type that was never registered.
    #[error("unknown custom type '{0}'")]
    UnknownType(String),

    /// A value could not be built from its description.
    #[error(transparent)]
    Construction(ConstructionError),

    #[error("method '{0}' not found in service")]
    MethodNotFound(String),

    #[error("invalid number of arguments to method '{method}'")]
    ArityMismatch {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// The method handle rejected the arguments.
    #[error(transparent)]
    Invoke(#[from] InvokeError),

    /// An arrange statement failed.
    #[error("arrange statement failed: {source}")]
    Arrange {
        statement: String,
        source: DatabaseError,
    },

    /// An assertion query could not be run or read.
    #[error("query failed: {source}")]
    Query { query: String, source: DatabaseError },

    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

impl RunError {
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound(method.into())
    }

    pub fn arity_mismatch(method: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ArityMismatch {
            method: method.into(),
            expected,
            actual,
        }
    }

    pub fn arrange(statement: impl Into<String>, source: DatabaseError) -> Self {
        Self::Arrange {
            statement: statement.into(),
            source,
        }
    }

    pub fn query(query: impl Into<String>, source: DatabaseError) -> Self {
        Self::Query {
            query: query.into(),
            source,
        }
    }

    /// The assertion failure, if this is one.
    pub fn as_failure(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Assertion(failure) => Some(failure),
            _ => None,
        }
    }

    /// The kind of assertion failure, if this is one.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.as_failure().map(|f| f.kind)
    }
}

impl From<ConstructionError> for RunError {
    fn from(err: ConstructionError) -> Self {
        match err {
            ConstructionError::UnknownType(name) => Self::UnknownType(name),
            other => Self::Construction(other),
        }
    }
}
