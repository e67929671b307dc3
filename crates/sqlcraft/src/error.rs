//! Error types for sqlcraft

use std::fmt;
use thiserror::Error;

/// Result type alias for query building
pub type QueryResult<T> = Result<T, QueryError>;

/// The clause a column reference appeared in.
///
/// Carried by [`QueryError::UnknownColumn`] so the caller knows which part of
/// the statement to fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Projection,
    JoinLeft,
    JoinRight,
    Filter,
    Sort,
    Keyset,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::Projection => "projection",
            Clause::JoinLeft => "join left",
            Clause::JoinRight => "join right",
            Clause::Filter => "filter",
            Clause::Sort => "sort",
            Clause::Keyset => "keyset",
        };
        f.write_str(name)
    }
}

/// Errors returned by [`Query::build`](crate::Query::build).
///
/// Every variant is a configuration mistake the caller can correct; nothing
/// here is retried and no partial SQL accompanies an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No base table was configured
    #[error("base table required")]
    MissingBaseTable,

    /// Table missing from the schema allow-list
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// Join configured without an alias
    #[error("join alias required for table {0}")]
    MissingJoinAlias(String),

    /// Alias registered twice (base alias included)
    #[error("duplicate alias: {0}")]
    DuplicateAlias(String),

    /// Column reference that does not resolve against the schema
    #[error("invalid {clause} column: {column}")]
    UnknownColumn { clause: Clause, column: String },

    /// Comparison operator outside the allow-list
    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    /// Join type outside the allow-list
    #[error("invalid join type: {0}")]
    InvalidJoinType(String),

    /// Sort direction other than ASC/DESC
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),

    /// Group operator other than AND/OR
    #[error("invalid logical operator: {0}")]
    InvalidLogicalOperator(String),

    /// Filter tree nested deeper than allowed
    #[error("filter depth exceeded (max {max})")]
    FilterDepthExceeded { max: usize },

    /// Schema configuration could not be loaded
    #[error("schema error: {0}")]
    Schema(String),
}

impl QueryError {
    /// Create an unknown column error for a clause
    pub fn unknown_column(clause: Clause, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            clause,
            column: column.into(),
        }
    }

    /// Create a schema configuration error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Check if this is an unknown column error
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, Self::UnknownColumn { .. })
    }

    /// Check if this is an unknown table error
    pub fn is_unknown_table(&self) -> bool {
        matches!(self, Self::UnknownTable(_))
    }

    /// The `alias.column` reference of an unknown column error, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::UnknownColumn { column, .. } => Some(column),
            _ => None,
        }
    }
}
