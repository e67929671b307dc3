//! WHERE clause filter tree.
//!
//! A [`FilterGroup`] combines leaf [`Filter`]s and nested groups under one
//! logical operator. Groups are built bottom-up, so the tree has a single
//! owner per node and cannot contain cycles. Nothing is validated while the
//! tree is built; operators and columns are checked against the live schema
//! when the query is rendered.
//!
//! # Example
//! ```ignore
//! use sqlcraft::{and, f, or};
//!
//! let group = and![
//!     f("u.age", ">", 18),
//!     or![
//!         f("u.role", "=", "admin"),
//!         f("u.role", "=", "owner"),
//!     ],
//! ];
//! ```

use crate::column::ColumnRef;
use crate::value::Value;

/// Maximum nesting below the root group.
pub const MAX_FILTER_DEPTH: usize = 10;

/// A single `column operator value` comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: ColumnRef,
    pub operator: String,
    pub value: Value,
}

/// Input item for [`and`] / [`or`]: a filter or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterItem {
    Filter(Filter),
    Group(FilterGroup),
}

impl From<Filter> for FilterItem {
    fn from(filter: Filter) -> Self {
        FilterItem::Filter(filter)
    }
}

impl From<FilterGroup> for FilterItem {
    fn from(group: FilterGroup) -> Self {
        FilterItem::Group(group)
    }
}

/// Filters and nested groups joined by `AND` or `OR`.
///
/// Rendering is pre-order: the group's own filters first, left to right,
/// then each non-empty nested group in parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    pub operator: String,
    pub filters: Vec<Filter>,
    pub groups: Vec<FilterGroup>,
}

impl FilterGroup {
    /// Create an empty group with the given logical operator.
    pub fn new(operator: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            filters: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Create a group with an arbitrary operator and partition `items` into it.
    pub fn with_operator<I>(operator: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = FilterItem>,
    {
        let mut group = Self::new(operator);
        for item in items {
            group.push(item);
        }
        group
    }

    /// Append a filter or a nested group.
    pub fn push(&mut self, item: impl Into<FilterItem>) -> &mut Self {
        match item.into() {
            FilterItem::Filter(filter) => self.filters.push(filter),
            FilterItem::Group(group) => self.groups.push(group),
        }
        self
    }

    pub fn push_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn push_group(&mut self, group: FilterGroup) -> &mut Self {
        self.groups.push(group);
        self
    }

    /// Returns `true` if the group renders to nothing (no filters anywhere).
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.groups.iter().all(FilterGroup::is_empty)
    }

    /// Nesting depth below this group (`0` for a group without subgroups).
    pub fn depth(&self) -> usize {
        self.groups
            .iter()
            .map(|g| g.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Construct a single filter from `alias.column` (or `column`), an operator
/// and a value.
pub fn f(reference: &str, operator: &str, value: impl Into<Value>) -> Filter {
    Filter {
        column: ColumnRef::parse(reference),
        operator: operator.to_string(),
        value: value.into(),
    }
}

/// Group `items` with `AND`.
pub fn and<I>(items: I) -> FilterGroup
where
    I: IntoIterator<Item = FilterItem>,
{
    FilterGroup::with_operator("AND", items)
}

/// Group `items` with `OR`.
pub fn or<I>(items: I) -> FilterGroup
where
    I: IntoIterator<Item = FilterItem>,
{
    FilterGroup::with_operator("OR", items)
}

/// Build an `AND` group from a mixed list of filters and groups.
#[macro_export]
macro_rules! and {
    ($($item:expr),* $(,)?) => {
        $crate::filter::and([$($crate::filter::FilterItem::from($item)),*])
    };
}

/// Build an `OR` group from a mixed list of filters and groups.
#[macro_export]
macro_rules! or {
    ($($item:expr),* $(,)?) => {
        $crate::filter::or([$($crate::filter::FilterItem::from($item)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f_parses_reference() {
        let filter = f("u.age", ">", 18);
        assert_eq!(filter.column, ColumnRef::new("u", "age"));
        assert_eq!(filter.operator, ">");
        assert_eq!(filter.value, Value::Int(18));
    }

    #[test]
    fn and_partitions_items() {
        let group = and![
            f("u.a", "=", 1),
            or![f("u.b", "=", 2), f("u.c", "=", 3)],
            f("u.d", "=", 4),
        ];
        assert_eq!(group.operator, "AND");
        assert_eq!(group.filters.len(), 2);
        assert_eq!(group.filters[1].column.column, "d");
        assert_eq!(group.groups.len(), 1);
        assert_eq!(group.groups[0].operator, "OR");
        assert_eq!(group.groups[0].filters.len(), 2);
    }

    #[test]
    fn empty_macro_group() {
        let group = or![];
        assert!(group.is_empty());
        assert_eq!(group.operator, "OR");
    }

    #[test]
    fn is_empty_looks_through_subgroups() {
        let group = and![and![], or![and![]]];
        assert!(group.is_empty());

        let group = and![and![], or![f("u.id", "=", 1)]];
        assert!(!group.is_empty());
    }

    #[test]
    fn depth_counts_nesting() {
        assert_eq!(and![f("u.id", "=", 1)].depth(), 0);
        assert_eq!(and![or![and![]]].depth(), 2);
    }

    #[test]
    fn push_appends_in_order() {
        let mut group = FilterGroup::new("AND");
        group.push(f("u.a", "=", 1)).push(or![f("u.b", "=", 2)]);
        group.push_filter(f("u.c", "=", 3));
        assert_eq!(group.filters.len(), 2);
        assert_eq!(group.groups.len(), 1);
    }
}
