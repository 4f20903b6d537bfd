//! dbtest Type Registry
//!
//! Maps qualified record type names (`namespace.Name`) to field layouts so
//! the construction engine can allocate and populate record values.
//!
//! A [`RegistryBuilder`] collects types, explicitly or by walking a service's
//! method signatures, and produces an immutable [`TypeRegistry`].

mod builder;
mod registry;
mod types;

pub use builder::{RegistryBuilder, RegistryError, RegistryResult};
pub use registry::TypeRegistry;
pub use types::{FieldDef, RecordDescriptor};
