//! Construction errors.

use thiserror::Error;

/// Errors raised while building a value from its description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    /// An entry is not a well-formed `{type, value}` map.
    #[error("{0}")]
    MalformedEntry(String),

    /// The value does not have the representation the tag requires.
    #[error("type '{type_name}' expects value of type '{expected}'")]
    UnexpectedValue { type_name: String, expected: String },

    /// A context tag with a value other than `background`.
    #[error("type 'context' expects value 'background'")]
    UnknownContext,

    #[error("type 'array' expects value of type 'array of maps' which mustn't be empty")]
    InvalidArray,

    #[error("type mismatch in array")]
    ArrayTypeMismatch,

    #[error("object type mustn't be empty")]
    EmptyType,

    #[error("custom type '{0}' doesn't begin with an uppercase letter")]
    NotCapitalized(String),

    /// The tag names a record type missing from the registry.
    #[error("unknown custom type '{0}'")]
    UnknownType(String),

    #[error("field '{field}' not found in type '{type_name}'")]
    FieldNotFound { field: String, type_name: String },

    #[error("invalid value of field '{field}', must be a map (is {found})")]
    FieldNotMap { field: String, found: String },

    #[error("field '{0}' can't be assigned the provided value, type mismatch")]
    FieldTypeMismatch(String),

    /// A record tag whose value is neither a map nor a string.
    #[error("type '{0}' expects value of type 'map' or 'JSON string'")]
    InvalidRecordValue(String),

    #[error("type '{type_name}', failed to unmarshal JSON ({message})")]
    InvalidJson { type_name: String, message: String },

    /// A decoded JSON value that cannot become the declared field type.
    #[error("expected value of/convertible to type '{0}'")]
    NotConvertible(String),
}

impl ConstructionError {
    pub fn malformed_entry(message: impl Into<String>) -> Self {
        Self::MalformedEntry(message.into())
    }

    pub fn unexpected_value(type_name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::UnexpectedValue {
            type_name: type_name.into(),
            expected: expected.into(),
        }
    }

    pub fn not_capitalized(type_name: impl Into<String>) -> Self {
        Self::NotCapitalized(type_name.into())
    }

    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType(type_name.into())
    }

    pub fn field_not_found(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    pub fn field_not_map(field: impl Into<String>, found: impl Into<String>) -> Self {
        Self::FieldNotMap {
            field: field.into(),
            found: found.into(),
        }
    }

    pub fn field_type_mismatch(field: impl Into<String>) -> Self {
        Self::FieldTypeMismatch(field.into())
    }

    pub fn invalid_record_value(type_name: impl Into<String>) -> Self {
        Self::InvalidRecordValue(type_name.into())
    }

    pub fn invalid_json(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidJson {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn not_convertible(target: impl Into<String>) -> Self {
        Self::NotConvertible(target.into())
    }
}

/// Result type for value construction.
pub type ConstructionResult<T> = Result<T, ConstructionError>;
