//! dbtest Scenario Runner
//!
//! Runs declarative database-integration scenarios against a service.
//!
//! # Structure
//!
//! Each scenario has three phases:
//!
//! - **arrange** - SQL statements executed verbatim to prepare the database
//! - **act** - one method call on the service, with constructed arguments
//! - **assert** - checks on the returned value, the returned error, or the
//!   rows a query yields afterwards
//!
//! # Example
//!
//! ```ignore
//! use dbtest_runner::prelude::*;
//!
//! let set = TestSet::from_yaml_str(r#"
//! tests:
//!   - name: get item
//!     arrange:
//!       - statement: INSERT INTO items VALUES (1, 'a')
//!     act:
//!       method: Get
//!       arguments:
//!         - { type: context, value: background }
//!         - { type: int, value: 1 }
//!     assert:
//!       - value: { type: string, value: a }
//! "#)?;
//! set.run(&mut db, &service)?;
//! ```

mod assertion;
mod database;
mod error;
mod loader;
mod runner;
mod scenario;
mod suite;

pub use database::{Column, Cursor, Database, DatabaseError, DatabaseResult, MaterializedCursor};
pub use error::{AssertionFailure, DecodeError, FailureKind, RunError, RunResult};
pub use runner::Runner;
pub use scenario::{Act, Assertion, ExpectedRow, Scenario, Statement, TestSet};
pub use suite::Suite;

pub use dbtest_construct::TypedValue;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::database::{Column, Cursor, Database, DatabaseError, MaterializedCursor};
    pub use crate::error::{AssertionFailure, FailureKind, RunError, RunResult};
    pub use crate::runner::Runner;
    pub use crate::scenario::{Assertion, ExpectedRow, Scenario, TestSet};
    pub use crate::suite::Suite;
    pub use dbtest_construct::TypedValue;
    pub use dbtest_core::{describe_record, Context, MethodTable, Service, Value};
}
