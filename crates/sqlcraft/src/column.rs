//! Column references.
//!
//! A [`ColumnRef`] is the `alias.column` pair every clause of a statement
//! points at. Parsing never fails: validation against the alias registry and
//! the schema happens when the statement is built.
//!
//! # Example
//! ```ignore
//! use sqlcraft::ColumnRef;
//!
//! let c = ColumnRef::parse("u.name");
//! assert_eq!(c.table_alias, "u");
//! assert_eq!(c.column, "name");
//! ```

use crate::dialect::Dialect;
use std::fmt;

/// A reference to a column, optionally qualified by a table alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ColumnRef {
    /// Table alias (`u` in `u.name`); empty when unqualified.
    pub table_alias: String,
    /// Column name (`name` in `u.name`).
    pub column: String,
}

impl ColumnRef {
    pub fn new(table_alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table_alias: table_alias.into(),
            column: column.into(),
        }
    }

    /// Parse `alias.column` (split on the first dot) or a bare `column`.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('.') {
            Some((alias, column)) => Self::new(alias, column),
            None => Self::new("", reference),
        }
    }

    /// Whether the reference carries a table alias.
    pub fn is_qualified(&self) -> bool {
        !self.table_alias.is_empty()
    }

    /// Write the reference as SQL, quoting each part through `quote` if set.
    pub(crate) fn write_sql(&self, out: &mut String, quote: Option<&dyn Dialect>) {
        if self.is_qualified() {
            write_ident(out, &self.table_alias, quote);
            out.push('.');
        }
        write_ident(out, &self.column, quote);
    }
}

pub(crate) fn write_ident(out: &mut String, name: &str, quote: Option<&dyn Dialect>) {
    match quote {
        Some(dialect) => out.push_str(&dialect.quote_identifier(name)),
        None => out.push_str(name),
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_qualified() {
            write!(f, "{}.{}", self.table_alias, self.column)
        } else {
            f.write_str(&self.column)
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(reference: &str) -> Self {
        Self::parse(reference)
    }
}

impl From<String> for ColumnRef {
    fn from(reference: String) -> Self {
        Self::parse(&reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres};

    #[test]
    fn parse_qualified() {
        let c = ColumnRef::parse("u.id");
        assert_eq!(c, ColumnRef::new("u", "id"));
        assert!(c.is_qualified());
    }

    #[test]
    fn parse_bare() {
        let c = ColumnRef::parse("id");
        assert_eq!(c.table_alias, "");
        assert_eq!(c.column, "id");
        assert!(!c.is_qualified());
    }

    #[test]
    fn parse_splits_on_first_dot() {
        let c = ColumnRef::parse("o.meta.key");
        assert_eq!(c.table_alias, "o");
        assert_eq!(c.column, "meta.key");
    }

    #[test]
    fn display() {
        assert_eq!(ColumnRef::parse("u.name").to_string(), "u.name");
        assert_eq!(ColumnRef::parse("name").to_string(), "name");
    }

    #[test]
    fn write_sql_quoted() {
        let mut out = String::new();
        ColumnRef::parse("u.name").write_sql(&mut out, Some(&Postgres));
        assert_eq!(out, r#""u"."name""#);

        let mut out = String::new();
        ColumnRef::parse("name").write_sql(&mut out, Some(&MySql));
        assert_eq!(out, "`name`");
    }

    #[test]
    fn write_sql_raw() {
        let mut out = String::new();
        ColumnRef::parse("u.name").write_sql(&mut out, None);
        assert_eq!(out, "u.name");
    }
}
