//! Builds the same three-table report query for every dialect.
//!
//! Run with:
//!   cargo run --example demo -p sqlcraft

use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use sqlcraft::prelude::*;
use std::sync::Arc;

const SCHEMA: &str = r#"
[tables]
users = ["id", "name", "created_at"]
orders = ["id", "order", "time", "price"]
customers = ["id", "user_id", "name", "age"]
"#;

fn print_header(title: &str) {
    println!();
    println!("{}", "─".repeat(70).bright_black());
    println!("{}", title.bold().cyan());
    println!("{}", "─".repeat(70).bright_black());
}

fn print_built(built: &BuiltQuery) {
    println!("  {}", built.sql().green());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold).fg(Color::Cyan),
            Cell::new("Arg").add_attribute(Attribute::Bold).fg(Color::Cyan),
        ]);
    for (i, arg) in built.args().iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(format!("{arg:?}"))]);
    }
    println!("{table}");
}

fn report(dialect: Arc<dyn Dialect>) -> Query {
    Query::with_dialect(dialect)
        .from("users", "u")
        .with_schema_toml(SCHEMA)
        .select(["u.name", "u.id", "o.price", "o.time", "c.name", "c.age"])
        .inner_join("orders", "o", "u.id", "o.id")
        .inner_join("customers", "c", "u.id", "c.user_id")
        .where_group(and![
            f("u.id", ">", 18),
            f("u.id", "LIKE", "Admin%"),
            and![
                f("o.price", ">", 100),
                f("c.age", "<", 30),
                or![
                    f("c.name", "LIKE", "%John%"),
                    f("c.name", "LIKE", "%Jane%"),
                ],
            ],
        ])
        .order_by("c.name", "ASC")
        .order_by("u.created_at", "DESC")
        .limit(5)
        .offset(10)
}

fn main() -> QueryResult<()> {
    let dialects: [Arc<dyn Dialect>; 3] = [Arc::new(Postgres), Arc::new(MySql), Arc::new(Oracle)];

    for dialect in &dialects {
        print_header(&format!("Report ({})", dialect.name()));
        print_built(&report(dialect.clone()).build()?);
    }

    print_header("Report row count (postgres)");
    print_built(&report(Arc::new(Postgres)).count().build()?);

    print_header("Next page by keyset (mysql)");
    let next = report(Arc::new(MySql))
        .keyset_pagination([("c.name", "Jane Doe")])
        .build()?;
    print_built(&next);

    print_header("Rejected reference");
    match report(Arc::new(Postgres)).select(["o.secret"]).build() {
        Ok(built) => println!("  unexpected: {}", built.sql()),
        Err(e) => println!("  {} {}", "✗".red().bold(), e),
    }

    println!();
    Ok(())
}
