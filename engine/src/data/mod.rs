//! Data access layer
//!
//! - `sql` - SQL dialects producing time bucketing expressions

pub mod sql;

pub use sql::{Backend, SqlDialect};
