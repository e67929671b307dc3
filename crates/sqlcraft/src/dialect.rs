//! SQL dialects.
//!
//! A [`Dialect`] only maps a few primitive pieces (placeholders, identifier
//! quoting, pagination form) to SQL text. Walking the statement lives in the
//! render pipeline, so a new database is supported by adding an
//! implementation, never by branching on a dialect name.

use std::fmt;

/// How a dialect limits the number of returned rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationStyle {
    /// `LIMIT n OFFSET m`
    #[default]
    LimitOffset,
    /// `FETCH NEXT n ROWS ONLY`
    FetchNext,
}

/// SQL flavor-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Placeholder for the `index`-th bound parameter (1-based).
    fn placeholder(&self, index: usize) -> String;

    /// Wrap a table or column name in the dialect's quotes.
    fn quote_identifier(&self, name: &str) -> String;

    /// Row-limit form used for offset pagination (keyset always uses `FETCH NEXT`).
    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::LimitOffset
    }
}

fn quote_with(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
    out
}

/// PostgreSQL: `$1, $2, ...` placeholders and `"name"` quoting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }
}

/// MySQL: positional `?` placeholders and `` `name` `` quoting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`')
    }
}

/// Oracle: `:1, :2, ...` placeholders, `"name"` quoting and `FETCH NEXT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{index}")
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    fn pagination_style(&self) -> PaginationStyle {
        PaginationStyle::FetchNext
    }
}
