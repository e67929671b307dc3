//! Allow-lists and reference validation used while rendering.
//!
//! Without a schema the builder runs in open-world mode: identifiers are not
//! checked, but operators, join types and sort directions always are.

use crate::column::ColumnRef;
use crate::error::{Clause, QueryError, QueryResult};
use crate::filter::{Filter, MAX_FILTER_DEPTH};
use crate::query::{Join, Sort};
use crate::schema::Schema;
use std::collections::HashMap;

/// Comparison operators accepted in filters and join conditions.
pub const ALLOWED_OPERATORS: &[&str] = &[
    "=", "!=", ">", "<", ">=", "<=", "IN", "LIKE", "IS", "IS NOT",
];

/// Join types accepted by [`Query::join`](crate::Query::join).
pub const ALLOWED_JOIN_TYPES: &[&str] = &["INNER", "LEFT", "RIGHT", "FULL", "CROSS"];

/// Sort directions accepted by [`Query::order_by`](crate::Query::order_by).
pub const ALLOWED_SORT_DIRECTIONS: &[&str] = &["ASC", "DESC"];

/// Case-insensitive lookup returning the canonical (uppercase) entry.
fn allowed(list: &[&'static str], value: &str) -> Option<&'static str> {
    list.iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(value))
}

/// Alias -> table name for every table visible to the statement.
#[derive(Debug, Clone, Default)]
pub(crate) struct AliasMap {
    aliases: HashMap<String, String>,
}

impl AliasMap {
    pub(crate) fn table_for(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }
}

/// The base table must be set and, with a schema, listed in it.
pub(crate) fn validate_base(table: &str, schema: Option<&Schema>) -> QueryResult<()> {
    if table.is_empty() {
        return Err(QueryError::MissingBaseTable);
    }
    if let Some(schema) = schema {
        if !schema.has_table(table) {
            return Err(QueryError::UnknownTable(table.to_string()));
        }
    }
    Ok(())
}

/// Register the base alias and every join alias, rejecting gaps and clashes.
pub(crate) fn register_aliases(
    base_alias: &str,
    base_table: &str,
    joins: &[Join],
) -> QueryResult<AliasMap> {
    let mut aliases = HashMap::with_capacity(joins.len() + 1);
    aliases.insert(base_alias.to_string(), base_table.to_string());

    for join in joins {
        if join.alias.is_empty() {
            return Err(QueryError::MissingJoinAlias(join.table.clone()));
        }
        if aliases.contains_key(&join.alias) {
            return Err(QueryError::DuplicateAlias(join.alias.clone()));
        }
        aliases.insert(join.alias.clone(), join.table.clone());
    }
    Ok(AliasMap { aliases })
}

/// Resolve `column`'s alias and check the column against the schema.
pub(crate) fn validate_column(
    column: &ColumnRef,
    aliases: &AliasMap,
    schema: Option<&Schema>,
    clause: Clause,
) -> QueryResult<()> {
    let Some(schema) = schema else {
        return Ok(());
    };
    let known = aliases
        .table_for(&column.table_alias)
        .is_some_and(|table| schema.has_column(table, &column.column));
    if known {
        Ok(())
    } else {
        Err(QueryError::unknown_column(clause, column.to_string()))
    }
}

/// Returns the canonical operator.
pub(crate) fn validate_operator(operator: &str) -> QueryResult<&'static str> {
    allowed(ALLOWED_OPERATORS, operator)
        .ok_or_else(|| QueryError::InvalidOperator(operator.to_string()))
}

/// Returns the canonical `AND`/`OR`.
pub(crate) fn validate_logical_operator(operator: &str) -> QueryResult<&'static str> {
    allowed(&["AND", "OR"], operator)
        .ok_or_else(|| QueryError::InvalidLogicalOperator(operator.to_string()))
}

/// `depth` is the group's nesting level below the root.
pub(crate) fn validate_depth(depth: usize) -> QueryResult<()> {
    if depth > MAX_FILTER_DEPTH {
        return Err(QueryError::FilterDepthExceeded {
            max: MAX_FILTER_DEPTH,
        });
    }
    Ok(())
}

/// Returns the canonical join type and ON operator.
pub(crate) fn validate_join(
    join: &Join,
    aliases: &AliasMap,
    schema: Option<&Schema>,
) -> QueryResult<(&'static str, &'static str)> {
    let join_type = allowed(ALLOWED_JOIN_TYPES, &join.join_type)
        .ok_or_else(|| QueryError::InvalidJoinType(join.join_type.clone()))?;
    let operator = validate_operator(&join.condition.operator)?;

    if let Some(schema) = schema {
        if !schema.has_table(&join.table) {
            return Err(QueryError::UnknownTable(join.table.clone()));
        }
        validate_column(&join.condition.left, aliases, Some(schema), Clause::JoinLeft)?;
        validate_column(&join.condition.right, aliases, Some(schema), Clause::JoinRight)?;
    }
    Ok((join_type, operator))
}

/// Returns the canonical operator of a leaf filter.
pub(crate) fn validate_filter(
    filter: &Filter,
    aliases: &AliasMap,
    schema: Option<&Schema>,
) -> QueryResult<&'static str> {
    validate_column(&filter.column, aliases, schema, Clause::Filter)?;
    validate_operator(&filter.operator)
}

/// Returns the canonical direction.
pub(crate) fn validate_sort(
    sort: &Sort,
    aliases: &AliasMap,
    schema: Option<&Schema>,
) -> QueryResult<&'static str> {
    validate_column(&sort.column, aliases, schema, Clause::Sort)?;
    allowed(ALLOWED_SORT_DIRECTIONS, &sort.direction)
        .ok_or_else(|| QueryError::InvalidSortDirection(sort.direction.clone()))
}
