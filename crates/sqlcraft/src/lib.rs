//! # sqlcraft
//!
//! A dialect-aware SELECT / COUNT builder with an optional schema allow-list.
//!
//! ## Features
//!
//! - **Dialects**: PostgreSQL (`$n`), MySQL (`?`) and Oracle (`:n`, `FETCH NEXT`)
//! - **Filter trees**: nested `AND` / `OR` groups of bound comparisons
//! - **Schema validation**: tables and `alias.column` references checked at build time
//! - **Pagination**: `LIMIT/OFFSET` or keyset seek on the first sort column
//! - **Positional arguments**: placeholder `N` always binds the `N`-th argument
//!
//! ## Example
//!
//! ```ignore
//! use sqlcraft::{Postgres, Query, Schema, and, f, or};
//!
//! let schema = Schema::new()
//!     .table("users", ["id", "name", "age"])
//!     .table("orders", ["id", "user_id", "price"]);
//!
//! let built = Query::new(Postgres)
//!     .with_schema(schema)
//!     .from("users", "u")
//!     .select(["u.id", "u.name", "o.price"])
//!     .inner_join("orders", "o", "u.id", "o.user_id")
//!     .where_group(and![
//!         f("u.age", ">", 18),
//!         or![f("o.price", ">", 100), f("u.name", "LIKE", "A%")],
//!     ])
//!     .order_by("u.id", "ASC")
//!     .limit(10)
//!     .build()?;
//!
//! let (sql, args) = built.into_parts();
//! ```
//!
//! With the `postgres` feature, [`BuiltQuery::params_ref`] hands the arguments
//! straight to `tokio-postgres`.

pub mod column;
pub mod dialect;
pub mod error;
pub mod filter;
mod pagination;
pub mod prelude;
pub mod query;
mod render;
pub mod schema;
mod validate;
pub mod value;

pub use column::ColumnRef;
pub use dialect::{Dialect, MySql, Oracle, PaginationStyle, Postgres};
pub use error::{Clause, QueryError, QueryResult};
pub use filter::{Filter, FilterGroup, FilterItem, MAX_FILTER_DEPTH, and, f, or};
pub use query::{Join, JoinCondition, Pagination, PaginationMode, Query, Sort};
pub use render::BuiltQuery;
pub use schema::Schema;
pub use validate::{ALLOWED_JOIN_TYPES, ALLOWED_OPERATORS, ALLOWED_SORT_DIRECTIONS};
pub use value::Value;
