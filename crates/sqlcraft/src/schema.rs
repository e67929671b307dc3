//! Schema allow-list.
//!
//! A [`Schema`] lists the tables a query may reference and, per table, the
//! columns it may reference. It is only ever supplied by the caller; nothing
//! here introspects a database.
//!
//! # Example
//! ```ignore
//! use sqlcraft::Schema;
//!
//! let schema = Schema::new()
//!     .table("users", ["id", "name"])
//!     .table("orders", ["id", "user_id", "price"]);
//!
//! let from_file = Schema::from_toml_str(r#"
//!     [tables]
//!     users = ["id", "name"]
//! "#)?;
//! ```

use crate::error::{QueryError, QueryResult};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Table name -> allowed column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Schema {
    #[serde(default)]
    tables: HashMap<String, HashSet<String>>,
}

impl Schema {
    /// Create an empty schema (every reference is rejected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with its columns, merging with any columns already listed.
    pub fn table<I, S>(mut self, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_table(name, columns);
        self
    }

    /// Add a table in place.
    pub fn add_table<I, S>(&mut self, name: impl Into<String>, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(name.into())
            .or_default()
            .extend(columns.into_iter().map(Into::into));
    }

    /// Remove one column from a table; returns whether it was present.
    pub fn remove_column(&mut self, table: &str, column: &str) -> bool {
        self.tables
            .get_mut(table)
            .is_some_and(|columns| columns.remove(column))
    }

    /// Parse a schema from TOML:
    ///
    /// ```toml
    /// [tables]
    /// users = ["id", "name"]
    /// ```
    pub fn from_toml_str(s: &str) -> QueryResult<Self> {
        toml::from_str(s).map_err(|e| QueryError::schema(format!("invalid TOML schema: {e}")))
    }

    /// Parse a schema from JSON: `{"tables": {"users": ["id", "name"]}}`.
    pub fn from_json_str(s: &str) -> QueryResult<Self> {
        serde_json::from_str(s).map_err(|e| QueryError::schema(format!("invalid JSON schema: {e}")))
    }

    /// Check if a table exists.
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// Check if `table` exists and lists `column`.
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    /// Columns allowed for a table.
    pub fn columns(&self, table: &str) -> Option<&HashSet<String>> {
        self.tables.get(table)
    }

    /// Iterate over table names.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Get the number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the schema has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// `table -> column -> present`; only `true` entries are allowed.
impl From<HashMap<String, HashMap<String, bool>>> for Schema {
    fn from(map: HashMap<String, HashMap<String, bool>>) -> Self {
        let tables = map
            .into_iter()
            .map(|(table, columns)| {
                let allowed = columns
                    .into_iter()
                    .filter_map(|(column, present)| present.then_some(column))
                    .collect();
                (table, allowed)
            })
            .collect();
        Self { tables }
    }
}

impl From<HashMap<String, Vec<String>>> for Schema {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        let tables = map
            .into_iter()
            .map(|(table, columns)| (table, columns.into_iter().collect()))
            .collect();
        Self { tables }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_lookup() {
        let schema = Schema::new().table("users", ["id", "name"]);
        assert!(schema.has_table("users"));
        assert!(schema.has_column("users", "id"));
        assert!(!schema.has_column("users", "email"));
        assert!(!schema.has_column("orders", "id"));
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn table_merges_columns() {
        let schema = Schema::new()
            .table("users", ["id"])
            .table("users", ["name"]);
        assert_eq!(schema.columns("users").map(HashSet::len), Some(2));
    }

    #[test]
    fn remove_column() {
        let mut schema = Schema::new().table("users", ["id", "name"]);
        assert!(schema.remove_column("users", "name"));
        assert!(!schema.remove_column("users", "name"));
        assert!(!schema.has_column("users", "name"));
    }

    #[test]
    fn from_bool_map_skips_false() {
        let mut cols = HashMap::new();
        cols.insert("id".to_string(), true);
        cols.insert("secret".to_string(), false);
        let mut map = HashMap::new();
        map.insert("users".to_string(), cols);

        let schema = Schema::from(map);
        assert!(schema.has_column("users", "id"));
        assert!(!schema.has_column("users", "secret"));
    }

    #[test]
    fn from_toml() {
        let schema = Schema::from_toml_str(
            r#"
            [tables]
            users = ["id", "name"]
            orders = ["id", "price"]
            "#,
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert!(schema.has_column("orders", "price"));
    }

    #[test]
    fn from_toml_rejects_garbage() {
        let err = Schema::from_toml_str("[tables\nusers = 1").unwrap_err();
        assert!(matches!(err, QueryError::Schema(_)));
    }

    #[test]
    fn from_json() {
        let schema = Schema::from_json_str(r#"{"tables": {"users": ["id"]}}"#).unwrap();
        assert!(schema.has_column("users", "id"));
    }
}
