//! Statement rendering.
//!
//! [`Query::build`] runs a fixed phase sequence (SELECT, FROM, JOIN, WHERE,
//! ORDER BY, LIMIT/OFFSET) over the accumulated state. Each phase validates
//! what it emits and the first error aborts the whole build. All phases share
//! one [`Renderer`], so placeholder `N` always binds the `N`-th argument.

use crate::column::{ColumnRef, write_ident};
use crate::dialect::Dialect;
use crate::error::{Clause, QueryResult};
use crate::filter::FilterGroup;
use crate::pagination;
use crate::query::Query;
use crate::schema::Schema;
use crate::validate::{
    AliasMap, register_aliases, validate_base, validate_column, validate_depth, validate_filter,
    validate_join, validate_logical_operator, validate_sort,
};
use crate::value::Value;

#[cfg(feature = "postgres")]
use tokio_postgres::types::ToSql;

/// Rendered SQL plus its arguments in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    sql: String,
    args: Vec<Value>,
}

impl BuiltQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }

    /// Parameter refs compatible with `tokio-postgres`.
    #[cfg(feature = "postgres")]
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }
}

/// Output buffer and positional argument list for one build.
pub(crate) struct Renderer<'q> {
    dialect: &'q dyn Dialect,
    quote: bool,
    sql: String,
    args: Vec<Value>,
}

impl<'q> Renderer<'q> {
    pub(crate) fn new(dialect: &'q dyn Dialect, quote: bool) -> Self {
        Self {
            dialect,
            quote,
            sql: String::with_capacity(128),
            args: Vec::new(),
        }
    }

    pub(crate) fn dialect(&self) -> &'q dyn Dialect {
        self.dialect
    }

    fn quoting(&self) -> Option<&'q dyn Dialect> {
        self.quote.then_some(self.dialect)
    }

    pub(crate) fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub(crate) fn push_ident(&mut self, name: &str) {
        let quote = self.quoting();
        write_ident(&mut self.sql, name, quote);
    }

    pub(crate) fn push_column(&mut self, column: &ColumnRef) {
        let quote = self.quoting();
        column.write_sql(&mut self.sql, quote);
    }

    /// Render a column into a detached string (for WHERE fragments).
    pub(crate) fn column_sql(&self, column: &ColumnRef) -> String {
        let mut out = String::new();
        column.write_sql(&mut out, self.quoting());
        out
    }

    /// Record `value` and return the placeholder that binds it.
    pub(crate) fn bind(&mut self, value: Value) -> String {
        self.args.push(value);
        self.dialect.placeholder(self.args.len())
    }

    pub(crate) fn push_bind(&mut self, value: Value) {
        let placeholder = self.bind(value);
        self.sql.push_str(&placeholder);
    }

    fn finish(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            args: self.args,
        }
    }
}

/// Rendered filter group.
struct GroupSql {
    sql: String,
    operator: &'static str,
    parts: usize,
}

impl GroupSql {
    /// Whether appending `AND ...` would change how the group binds.
    fn needs_parens_before_and(&self) -> bool {
        self.operator == "OR" && self.parts > 1
    }
}

impl Query {
    /// Render the statement and its arguments.
    ///
    /// Validates table and column references when a schema is configured.
    /// Returns the first error encountered; the query itself is never
    /// modified, so building twice yields identical output.
    pub fn build(&self) -> QueryResult<BuiltQuery> {
        let result = self.render();

        #[cfg(feature = "tracing")]
        match &result {
            Ok(built) => tracing::debug!(
                target: "sqlcraft.build",
                dialect = self.dialect.name(),
                sql = %built.sql,
                args = built.args.len(),
                "built query"
            ),
            Err(e) => tracing::debug!(
                target: "sqlcraft.build",
                dialect = self.dialect.name(),
                error = %e,
                "query build failed"
            ),
        }

        result
    }

    fn render(&self) -> QueryResult<BuiltQuery> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        let schema = self.schema.as_ref();
        validate_base(&self.base_table, schema)?;
        let base_alias = self.base_alias();
        let aliases = register_aliases(base_alias, &self.base_table, &self.joins)?;

        let mut r = Renderer::new(self.dialect.as_ref(), self.quote_identifiers);

        // SELECT
        if self.count {
            r.push("SELECT COUNT(*)");
        } else {
            self.render_projections(&mut r, &aliases)?;
        }

        // FROM
        r.push(" FROM ");
        r.push_ident(&self.base_table);
        r.push(" ");
        r.push_ident(base_alias);

        // JOIN
        for join in &self.joins {
            let (join_type, operator) = validate_join(join, &aliases, schema)?;
            r.push(" ");
            r.push(join_type);
            r.push(" JOIN ");
            r.push_ident(&join.table);
            r.push(" ");
            r.push_ident(&join.alias);
            r.push(" ON ");
            r.push_column(&join.condition.left);
            r.push(" ");
            r.push(operator);
            r.push(" ");
            r.push_column(&join.condition.right);
        }

        // WHERE (filters, then the keyset seek predicate)
        self.render_where(&mut r, &aliases)?;

        // COUNT(*) never carries ORDER BY or pagination.
        if self.count {
            return Ok(r.finish());
        }

        // ORDER BY
        if !self.sorts.is_empty() {
            r.push(" ORDER BY ");
            for (i, sort) in self.sorts.iter().enumerate() {
                let direction = validate_sort(sort, &aliases, schema)?;
                if i > 0 {
                    r.push(", ");
                }
                r.push_column(&sort.column);
                r.push(" ");
                r.push(direction);
            }
        }

        // LIMIT / OFFSET / FETCH NEXT
        pagination::render_limit_offset(&mut r, self);

        Ok(r.finish())
    }

    fn render_projections(&self, r: &mut Renderer<'_>, aliases: &AliasMap) -> QueryResult<()> {
        r.push("SELECT ");
        if self.projections.is_empty() {
            r.push_ident(self.base_alias());
            r.push(".*");
            return Ok(());
        }
        for (i, column) in self.projections.iter().enumerate() {
            validate_column(column, aliases, self.schema.as_ref(), Clause::Projection)?;
            if i > 0 {
                r.push(", ");
            }
            r.push_column(column);
        }
        Ok(())
    }

    fn render_where(&self, r: &mut Renderer<'_>, aliases: &AliasMap) -> QueryResult<()> {
        let root = match &self.filter {
            Some(group) => Some(render_group(r, group, aliases, self.schema.as_ref(), 0)?),
            None => None,
        };
        let root = root.filter(|g| !g.sql.is_empty());
        let seek = pagination::keyset_predicate(r, self, aliases)?;

        match (root, seek) {
            (None, None) => {}
            (Some(root), None) => {
                r.push(" WHERE ");
                r.push(&root.sql);
            }
            (None, Some(seek)) => {
                r.push(" WHERE ");
                r.push(&seek);
            }
            (Some(root), Some(seek)) => {
                r.push(" WHERE ");
                // A bare `a OR b AND seek` would bind the seek to `b` only, so a
                // multi-part OR root is parenthesized.
                if root.needs_parens_before_and() {
                    r.push("(");
                    r.push(&root.sql);
                    r.push(")");
                } else {
                    r.push(&root.sql);
                }
                r.push(" AND ");
                r.push(&seek);
            }
        }
        Ok(())
    }
}

/// Render a group pre-order: own filters, then non-empty subgroups in parens.
fn render_group(
    r: &mut Renderer<'_>,
    group: &FilterGroup,
    aliases: &AliasMap,
    schema: Option<&Schema>,
    depth: usize,
) -> QueryResult<GroupSql> {
    validate_depth(depth)?;
    let operator = validate_logical_operator(&group.operator)?;

    let mut parts = Vec::with_capacity(group.filters.len() + group.groups.len());
    for filter in &group.filters {
        let op = validate_filter(filter, aliases, schema)?;
        let mut part = r.column_sql(&filter.column);
        part.push(' ');
        part.push_str(op);
        part.push(' ');
        part.push_str(&r.bind(filter.value.clone()));
        parts.push(part);
    }

    for sub in &group.groups {
        let sub = render_group(r, sub, aliases, schema, depth + 1)?;
        if !sub.sql.is_empty() {
            parts.push(format!("({})", sub.sql));
        }
    }

    let separator = format!(" {operator} ");
    Ok(GroupSql {
        sql: parts.join(&separator),
        operator,
        parts: parts.len(),
    })
}
