//! Common error types for dbtest.

use thiserror::Error;

/// Errors raised while converting between values and Rust types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The value does not have the expected type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A record value lacks a field the target type needs.
    #[error("record '{record}' has no field '{field}'")]
    MissingField { record: String, field: String },

    /// A numeric value does not fit the target type.
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: String, target: String },
}

impl CoreError {
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            record: record.into(),
            field: field.into(),
        }
    }

    pub fn out_of_range(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::OutOfRange {
            value: value.into(),
            target: target.into(),
        }
    }
}

/// Result type for value conversions.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by a method handle before the method body runs.
///
/// These are faults of the caller (wrong argument count or types), not errors
/// returned by the method itself; those travel in `Outcome::error`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvokeError {
    /// Wrong number of arguments.
    #[error("method '{method}' takes {expected} arguments, got {actual}")]
    Arity {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// An argument could not be converted to the parameter type.
    #[error("argument {index} of method '{method}': {message}")]
    Argument {
        method: String,
        index: usize,
        message: String,
    },
}

impl InvokeError {
    pub fn arity(method: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Arity {
            method: method.into(),
            expected,
            actual,
        }
    }

    pub fn argument(method: impl Into<String>, index: usize, message: impl Into<String>) -> Self {
        Self::Argument {
            method: method.into(),
            index,
            message: message.into(),
        }
    }
}

/// Result type for method invocations.
pub type InvokeResult<T> = Result<T, InvokeError>;
