//! Convenient imports for typical `sqlcraft` usage.
//!
//! ```ignore
//! use sqlcraft::prelude::*;
//! ```

pub use crate::{
    BuiltQuery, Dialect, MySql, Oracle, Postgres, Query, QueryError, QueryResult, Schema, Value,
    and, f, or,
};
