//! dbtest Core Types
//!
//! This crate provides the foundational types shared by every dbtest crate:
//! - Runtime values (the `Value` enum, records and homogeneous lists)
//! - Type identity (`ValueType`) and registration-time descriptors (`TypeDescriptor`)
//! - Conversions between Rust types and values (`Describe`, `FromValue`, `ToValue`, `Returns`)
//! - The service capability interface (`Service`, `MethodHandle`) and `MethodTable`
//! - Common error types

mod context;
mod convert;
mod error;
mod service;
mod table;
mod types;
mod value;

pub use context::*;
pub use convert::*;
pub use error::*;
pub use service::*;
pub use table::*;
pub use types::*;
pub use value::*;
