//! Tests for embedding compiled filters into paginated queries.

mod common;
use common::*;

use sift_core::filter::{Compiler, Schema, ValueType, DEFAULT_DATE_FORMAT};
use sift_core::FilterQuery;

#[test]
fn query_with_filter_only() {
    let expr = parse(r#"EQ(string_column, "Muse")"#);
    let (sql, params) = FilterQuery::new("test", "id").filter(&expr).build();
    assert_eq!(
        sql,
        r#"SELECT * FROM "test" WHERE "test"."string_column" = $1 ORDER BY "id" ASC LIMIT $2"#
    );
    assert_eq!(params, vec![text("Muse"), int(10)]);
}

#[test]
fn query_with_keyset_and_filter() {
    let expr = parse(r#"AND(EQ(string_column, "Muse"), ALIKE(array_column, "%hear%"))"#);
    let (sql, params) = FilterQuery::new("test", "id")
        .columns(&["id", "string_column"])
        .after(41_i64)
        .filter(&expr)
        .page_size(5)
        .build();
    assert_eq!(
        sql,
        concat!(
            r#"SELECT "id", "string_column" FROM "test" WHERE "id" > $1 AND "#,
            r#"("test"."string_column" = $2 AND EXISTS (SELECT 1 FROM unnest("test"."array_column") AS element WHERE element ILIKE $3))"#,
            r#" ORDER BY "id" ASC LIMIT $4"#
        )
    );
    assert_eq!(params, vec![int(41), text("Muse"), text("%hear%"), int(5)]);
}

#[test]
fn query_with_filter_and_page() {
    let expr = parse("GT(number_column, 3)");
    let (sql, params) = FilterQuery::new("test", "id")
        .filter(&expr)
        .page(2)
        .page_size(25)
        .build();
    assert_eq!(
        sql,
        r#"SELECT * FROM "test" WHERE "test"."number_column" > $1 ORDER BY "id" ASC OFFSET $2 LIMIT $3"#
    );
    assert_eq!(params, vec![int(3), int(25), int(25)]);
    assert_eq!(placeholders(&sql), vec![1, 2, 3]);
}

#[test]
fn query_and_filter_quote_table_alike() {
    let schema = Schema::with_date_format(
        "so\"ng",
        [("ti\"tle", ValueType::String)],
        DEFAULT_DATE_FORMAT,
    )
    .expect("schema");
    let expr = Compiler::from_schema(schema)
        .parse(r#"EQ(ti"tle, "Muse")"#)
        .expect("parse");
    let (sql, params) = FilterQuery::new("so\"ng", "id").filter(&expr).build();
    assert_eq!(
        sql,
        r#"SELECT * FROM "so""ng" WHERE "so""ng"."ti""tle" = $1 ORDER BY "id" ASC LIMIT $2"#
    );
    assert_eq!(params, vec![text("Muse"), int(10)]);
}
