//! Query builder state and its fluent configuration surface.
//!
//! Configuration calls only record what was asked for; they never fail.
//! Every check happens in [`Query::build`], which reads the accumulated state
//! without changing it.

use crate::column::ColumnRef;
use crate::dialect::Dialect;
use crate::error::QueryError;
use crate::filter::{FilterGroup, and, f};
use crate::schema::Schema;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// `ON left operator right` of a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left: ColumnRef,
    pub operator: String,
    pub right: ColumnRef,
}

/// A `TYPE JOIN table alias ON ...` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    /// INNER, LEFT, RIGHT, FULL or CROSS (any case).
    pub join_type: String,
    pub table: String,
    pub alias: String,
    pub condition: JoinCondition,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub column: ColumnRef,
    pub direction: String,
}

/// Active pagination strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
    /// Neither `offset` nor `keyset_pagination` was called.
    #[default]
    None,
    Offset,
    Keyset,
}

/// Pagination configuration; the last pagination call wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    pub mode: PaginationMode,
    /// `alias.column` -> last value seen on the previous page (keyset only).
    pub last_seen: HashMap<String, Value>,
}

/// A SELECT (or COUNT) statement under construction.
///
/// # Example
/// ```ignore
/// use sqlcraft::{Postgres, Query, and, f};
///
/// let built = Query::new(Postgres)
///     .from("users", "u")
///     .select(["u.id", "u.name"])
///     .where_group(and![f("u.id", ">", 10), f("u.name", "LIKE", "A%")])
///     .order_by("u.id", "DESC")
///     .limit(25)
///     .build()?;
///
/// assert_eq!(
///     built.sql(),
///     "SELECT u.id, u.name FROM users u WHERE u.id > $1 AND u.name LIKE $2 ORDER BY u.id DESC LIMIT $3"
/// );
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Query {
    pub(crate) dialect: Arc<dyn Dialect>,
    pub(crate) schema: Option<Schema>,
    pub(crate) base_table: String,
    pub(crate) base_alias: String,
    pub(crate) projections: Vec<ColumnRef>,
    pub(crate) joins: Vec<Join>,
    pub(crate) filter: Option<FilterGroup>,
    pub(crate) sorts: Vec<Sort>,
    pub(crate) limit: i64,
    pub(crate) offset: i64,
    pub(crate) pagination: Pagination,
    pub(crate) count: bool,
    pub(crate) quote_identifiers: bool,
    /// Errors recorded by configuration calls, reported first by `build`.
    pub(crate) errors: Vec<QueryError>,
}

impl Query {
    /// Create an empty query for `dialect`.
    pub fn new(dialect: impl Dialect + 'static) -> Self {
        Self::with_dialect(Arc::new(dialect))
    }

    /// Create an empty query sharing an existing dialect handle.
    pub fn with_dialect(dialect: Arc<dyn Dialect>) -> Self {
        Self {
            dialect,
            schema: None,
            base_table: String::new(),
            base_alias: String::new(),
            projections: Vec::new(),
            joins: Vec::new(),
            filter: None,
            sorts: Vec::new(),
            limit: 0,
            offset: 0,
            pagination: Pagination::default(),
            count: false,
            quote_identifiers: false,
            errors: Vec::new(),
        }
    }

    // ==================== Schema ====================

    /// Validate every table and column reference against `schema`.
    pub fn with_schema(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Like [`with_schema`](Self::with_schema), parsing TOML first.
    ///
    /// A parse failure is reported by `build`.
    pub fn with_schema_toml(mut self, toml: &str) -> Self {
        match Schema::from_toml_str(toml) {
            Ok(schema) => self.schema = Some(schema),
            Err(e) => self.errors.push(e),
        }
        self
    }

    // ==================== FROM / SELECT ====================

    /// Set the base table and its alias (empty alias means the table name).
    pub fn from(mut self, table: &str, alias: &str) -> Self {
        self.base_table = table.to_string();
        self.base_alias = alias.to_string();
        self
    }

    /// Append projection columns (`alias.column`).
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.projections
            .extend(columns.into_iter().map(|c| ColumnRef::parse(c.as_ref())));
        self
    }

    /// Render `SELECT COUNT(*)`; projections, ORDER BY and LIMIT are ignored.
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    // ==================== JOIN ====================

    /// Add a join: `join_type JOIN table alias ON left operator right`.
    pub fn join(
        mut self,
        join_type: &str,
        table: &str,
        alias: &str,
        left: &str,
        operator: &str,
        right: &str,
    ) -> Self {
        self.joins.push(Join {
            join_type: join_type.to_string(),
            table: table.to_string(),
            alias: alias.to_string(),
            condition: JoinCondition {
                left: ColumnRef::parse(left),
                operator: operator.to_string(),
                right: ColumnRef::parse(right),
            },
        });
        self
    }

    /// Add `INNER JOIN table alias ON left = right`.
    pub fn inner_join(self, table: &str, alias: &str, left: &str, right: &str) -> Self {
        self.join("INNER", table, alias, left, "=", right)
    }

    /// Add `LEFT JOIN table alias ON left = right`.
    pub fn left_join(self, table: &str, alias: &str, left: &str, right: &str) -> Self {
        self.join("LEFT", table, alias, left, "=", right)
    }

    // ==================== WHERE ====================

    /// Set (or replace) the root filter group.
    pub fn where_group(mut self, group: FilterGroup) -> Self {
        self.filter = Some(group);
        self
    }

    /// Append `reference = value` to the root group (creating an AND group).
    pub fn eq(self, reference: &str, value: impl Into<Value>) -> Self {
        self.push_root_filter(reference, "=", value.into())
    }

    /// Append `reference IN value` to the root group (creating an AND group).
    ///
    /// The list is bound as a single argument.
    pub fn in_list(self, reference: &str, values: impl Into<Value>) -> Self {
        self.push_root_filter(reference, "IN", values.into())
    }

    fn push_root_filter(mut self, reference: &str, operator: &str, value: Value) -> Self {
        self.filter
            .get_or_insert_with(|| and([]))
            .push_filter(f(reference, operator, value));
        self
    }

    // ==================== ORDER BY / pagination ====================

    /// Append a sort column; `direction` is ASC or DESC (any case).
    pub fn order_by(mut self, column: &str, direction: &str) -> Self {
        self.sorts.push(Sort {
            column: ColumnRef::parse(column),
            direction: direction.to_uppercase(),
        });
        self
    }

    /// Maximum number of rows; `0` or less renders no limit.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Rows to skip; switches pagination to offset mode.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self.pagination.mode = PaginationMode::Offset;
        self
    }

    /// Switch to keyset pagination, replacing any previous cursor.
    ///
    /// Keys use the `alias.column` form of the first sort column.
    pub fn keyset_pagination<I, K, V>(mut self, last_seen: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.pagination = Pagination {
            mode: PaginationMode::Keyset,
            last_seen: last_seen
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        self
    }

    /// Quote every emitted table, alias and column name with the dialect.
    pub fn quote_identifiers(mut self, enabled: bool) -> Self {
        self.quote_identifiers = enabled;
        self
    }

    // ==================== Inspection ====================

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn is_count(&self) -> bool {
        self.count
    }

    /// The explicit base alias, or the table name when unaliased.
    pub fn base_alias(&self) -> &str {
        if self.base_alias.is_empty() {
            &self.base_table
        } else {
            &self.base_alias
        }
    }
}
