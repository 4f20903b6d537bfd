//! The capability interface of a service under test.
//!
//! A service is anything that can be inspected by signature and invoked by
//! method name. The scenario runner never needs more than this.

use crate::{InvokeResult, TypeDescriptor, Value};
use thiserror::Error;

/// Declared shape of a method.
///
/// `params` lists the explicit parameters; the receiver is implicit and not
/// part of the list. `returns` lists the non-error results; every method has
/// a trailing, optional error outcome in addition.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<TypeDescriptor>,
    pub returns: Vec<TypeDescriptor>,
}

impl MethodSignature {
    pub fn new(
        name: impl Into<String>,
        params: Vec<TypeDescriptor>,
        returns: Vec<TypeDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
        }
    }

    /// Number of explicit parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Every type mentioned by the signature, parameters first.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.params.iter().chain(self.returns.iter())
    }
}

/// Error returned by a method of the service under test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MethodError {
    message: String,
}

impl MethodError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What a method invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Non-error results. Empty when `error` is set.
    pub values: Vec<Value>,
    /// The trailing error result.
    pub error: Option<MethodError>,
}

impl Outcome {
    pub fn success(values: Vec<Value>) -> Self {
        Self {
            values,
            error: None,
        }
    }

    pub fn failure(error: MethodError) -> Self {
        Self {
            values: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A resolved, invocable method.
pub trait MethodHandle {
    fn signature(&self) -> &MethodSignature;

    /// Call the method. `Err` means the call never happened (bad arguments);
    /// errors produced by the method itself are reported in the outcome.
    fn invoke(&self, args: Vec<Value>) -> InvokeResult<Outcome>;
}

/// A service under test.
pub trait Service {
    /// The type of the service object itself. Must be a record, possibly
    /// behind a reference.
    fn descriptor(&self) -> TypeDescriptor;

    /// Every externally callable method.
    fn methods(&self) -> Vec<&dyn MethodHandle>;

    /// Resolve a method by name.
    fn resolve(&self, name: &str) -> Option<&dyn MethodHandle>;
}
