//! Offset and keyset pagination.
//!
//! Offset mode renders `LIMIT/OFFSET` (or `FETCH NEXT` for dialects that
//! prefer it). Keyset mode seeks past the last row of the previous page on
//! the first sort column and always renders `FETCH NEXT n ROWS ONLY`.

use crate::dialect::PaginationStyle;
use crate::error::{Clause, QueryResult};
use crate::query::{PaginationMode, Query};
use crate::render::Renderer;
use crate::validate::{AliasMap, validate_column};
use crate::value::Value;

/// `>` for ascending sorts, `<` for descending ones.
fn seek_operator(direction: &str) -> &'static str {
    if direction.eq_ignore_ascii_case("DESC") {
        "<"
    } else {
        ">"
    }
}

/// The `column op placeholder` seek predicate, if one applies.
///
/// Nothing is emitted when keyset mode is off, there is no sort column, or
/// the cursor has no value for the first sort column.
pub(crate) fn keyset_predicate(
    r: &mut Renderer<'_>,
    query: &Query,
    aliases: &AliasMap,
) -> QueryResult<Option<String>> {
    if query.pagination.mode != PaginationMode::Keyset {
        return Ok(None);
    }
    let Some(first) = query.sorts.first() else {
        return Ok(None);
    };

    let key = first.column.to_string();
    let Some(value) = query.pagination.last_seen.get(&key) else {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlcraft.pagination",
            key = %key,
            "no cursor value for first sort column, seek predicate skipped"
        );
        return Ok(None);
    };

    validate_column(&first.column, aliases, query.schema.as_ref(), Clause::Keyset)?;

    let mut predicate = r.column_sql(&first.column);
    predicate.push(' ');
    predicate.push_str(seek_operator(&first.direction));
    predicate.push(' ');
    predicate.push_str(&r.bind(value.clone()));
    Ok(Some(predicate))
}

/// Append the row limit (and offset, where the form allows it).
pub(crate) fn render_limit_offset(r: &mut Renderer<'_>, query: &Query) {
    if query.limit <= 0 {
        return;
    }

    let fetch_next = query.pagination.mode == PaginationMode::Keyset
        || r.dialect().pagination_style() == PaginationStyle::FetchNext;

    if fetch_next {
        r.push(" FETCH NEXT ");
        r.push_bind(Value::Int(query.limit));
        r.push(" ROWS ONLY");
        return;
    }

    r.push(" LIMIT ");
    r.push_bind(Value::Int(query.limit));
    if query.offset > 0 {
        r.push(" OFFSET ");
        r.push_bind(Value::Int(query.offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Oracle, Postgres};
    use crate::error::QueryError;
    use crate::filter::f;
    use crate::schema::Schema;
    use crate::or;

    #[test]
    fn seek_operator_follows_direction() {
        assert_eq!(seek_operator("ASC"), ">");
        assert_eq!(seek_operator("desc"), "<");
    }

    #[test]
    fn postgres_limit_offset() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .select(["u.id"])
            .limit(10)
            .offset(5)
            .build()
            .unwrap();
        assert_eq!(built.sql(), "SELECT u.id FROM users u LIMIT $1 OFFSET $2");
        assert_eq!(built.args(), &[Value::Int(10), Value::Int(5)]);
    }

    #[test]
    fn zero_offset_is_omitted() {
        let built = Query::new(MySql)
            .from("users", "u")
            .limit(10)
            .offset(0)
            .build()
            .unwrap();
        assert_eq!(built.sql(), "SELECT u.* FROM users u LIMIT ?");
    }

    #[test]
    fn no_limit_means_no_offset() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .offset(5)
            .build()
            .unwrap();
        assert_eq!(built.sql(), "SELECT u.* FROM users u");
        assert!(built.args().is_empty());
    }

    #[test]
    fn keyset_ascending_on_mysql() {
        let built = Query::new(MySql)
            .from("users", "u")
            .order_by("u.id", "ASC")
            .keyset_pagination([("u.id", 42)])
            .limit(10)
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u WHERE u.id > ? ORDER BY u.id ASC FETCH NEXT ? ROWS ONLY"
        );
        assert_eq!(built.args(), &[Value::Int(42), Value::Int(10)]);
    }

    #[test]
    fn keyset_descending_follows_filters() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .eq("u.active", true)
            .order_by("u.created_at", "DESC")
            .order_by("u.id", "DESC")
            .keyset_pagination([("u.created_at", "2024-01-01")])
            .limit(20)
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u WHERE u.active = $1 AND u.created_at < $2 \
             ORDER BY u.created_at DESC, u.id DESC FETCH NEXT $3 ROWS ONLY"
        );
    }

    #[test]
    fn keyset_without_cursor_value_skips_seek() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .order_by("u.id", "ASC")
            .keyset_pagination([("u.other", 1)])
            .limit(5)
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u ORDER BY u.id ASC FETCH NEXT $1 ROWS ONLY"
        );
        assert_eq!(built.args(), &[Value::Int(5)]);
    }

    #[test]
    fn keyset_without_sort_skips_seek() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .keyset_pagination([("u.id", 1)])
            .build()
            .unwrap();
        assert_eq!(built.sql(), "SELECT u.* FROM users u");
    }

    #[test]
    fn keyset_wraps_or_root() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .where_group(or![f("u.a", "=", 1), f("u.b", "=", 2)])
            .order_by("u.id", "ASC")
            .keyset_pagination([("u.id", 7)])
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u WHERE (u.a = $1 OR u.b = $2) AND u.id > $3 ORDER BY u.id ASC"
        );
    }

    #[test]
    fn keyset_single_filter_or_root_is_not_wrapped() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .where_group(or![f("u.a", "=", 1)])
            .order_by("u.id", "ASC")
            .keyset_pagination([("u.id", 7)])
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u WHERE u.a = $1 AND u.id > $2 ORDER BY u.id ASC"
        );
    }

    #[test]
    fn keyset_column_checked_against_schema() {
        let schema = Schema::new().table("users", ["id"]);
        let query = Query::new(Postgres)
            .from("users", "u")
            .with_schema(schema)
            .order_by("x.id", "ASC")
            .keyset_pagination([("x.id", 1)]);
        let err = query.build().unwrap_err();
        assert_eq!(err, QueryError::unknown_column(Clause::Keyset, "x.id"));
    }

    #[test]
    fn keyset_after_offset_drops_offset() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .order_by("u.id", "ASC")
            .offset(20)
            .keyset_pagination([("u.id", 42)])
            .limit(10)
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u WHERE u.id > $1 ORDER BY u.id ASC FETCH NEXT $2 ROWS ONLY"
        );
        assert_eq!(built.args(), &[Value::Int(42), Value::Int(10)]);
    }

    #[test]
    fn offset_after_keyset_drops_seek() {
        let built = Query::new(Postgres)
            .from("users", "u")
            .order_by("u.id", "ASC")
            .keyset_pagination([("u.id", 42)])
            .offset(20)
            .limit(10)
            .build()
            .unwrap();
        assert_eq!(
            built.sql(),
            "SELECT u.* FROM users u ORDER BY u.id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(built.args(), &[Value::Int(10), Value::Int(20)]);
    }

    #[test]
    fn oracle_never_renders_offset() {
        let built = Query::new(Oracle)
            .from("users", "u")
            .limit(10)
            .offset(30)
            .build()
            .unwrap();
        assert_eq!(built.sql(), "SELECT u.* FROM users u FETCH NEXT :1 ROWS ONLY");
        assert_eq!(built.args(), &[Value::Int(10)]);
    }
}
