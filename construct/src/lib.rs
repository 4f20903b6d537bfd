//! dbtest Value Construction
//!
//! Turns tagged value descriptions (`{type, value}`) into concrete values.
//!
//! Built-in tags are `context`, `string`, `int`, `bool`, `float` and `array`.
//! Every other tag names a record type registered in a
//! [`TypeRegistry`](dbtest_registry::TypeRegistry). Records accept two
//! representations, chosen by the shape of the value:
//!
//! - a map of field name to nested `{type, value}` description
//! - a string holding a JSON object, decoded against the record layout
//!
//! Fields left out of either form keep their zero value.

mod coerce;
mod engine;
mod error;
mod form;
mod typed;

pub use coerce::{convert, zero_value};
pub use engine::Constructor;
pub use error::{ConstructionError, ConstructionResult};
pub use form::{DocumentForm, RecordForm, StructuredForm};
pub use typed::TypedValue;
