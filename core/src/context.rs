//! Execution context handed to service methods.

use std::fmt;

/// A root execution context.
///
/// Contexts built by dbtest are never cancelled and carry no deadline.
/// Propagating cancellation is the invoked method's own business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    _root: (),
}

impl Context {
    /// The background context: cancellation-free, no deadline, no values.
    pub fn background() -> Self {
        Self { _root: () }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context.Background")
    }
}
