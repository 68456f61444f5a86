#![allow(dead_code)]

use chrono::NaiveDate;
use sift_core::filter::{
    BoxError, Compiler, Expr, ExprErrorKind, FilterError, ValueType, DEFAULT_DATE_FORMAT,
};
use sift_core::SqlValue;

pub const TABLE: &str = "test";

pub fn compiler() -> Compiler {
    Compiler::new(
        TABLE,
        [
            ("number_column", ValueType::Number),
            ("string_column", ValueType::String),
            ("array_column", ValueType::array_of(ValueType::String)),
            ("number_array_column", ValueType::array_of(ValueType::Number)),
            ("date_column", ValueType::Date),
        ],
        |s: &str| NaiveDate::parse_from_str(s, DEFAULT_DATE_FORMAT).map_err(BoxError::from),
    )
    .expect("valid schema")
}

pub fn parse(text: &str) -> Expr {
    compiler()
        .parse(text)
        .unwrap_or_else(|e| panic!("Failed to parse: {text}\nError: {e}"))
}

pub fn parse_err(text: &str) -> FilterError {
    compiler()
        .parse(text)
        .expect_err(&format!("Expected filter error for: {text}"))
}

pub fn cause(text: &str) -> ExprErrorKind {
    match parse_err(text) {
        FilterError::InvalidExpression { cause, .. } => cause,
        other => panic!("Expected invalid expression for: {text}\nGot: {other:?}"),
    }
}

pub fn render(text: &str) -> (String, Vec<SqlValue>) {
    parse(text).to_sql()
}

pub fn int(n: i64) -> SqlValue {
    SqlValue::Int(n)
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(String::from(s))
}

pub fn date(y: i32, m: u32, d: u32) -> SqlValue {
    SqlValue::Date(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

/// Counts `$N` placeholders in rendered SQL.
pub fn placeholders(sql: &str) -> Vec<usize> {
    let mut found = vec![];
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
            digits.push(*d);
            chars.next();
        }
        if let Ok(n) = digits.parse() {
            found.push(n);
        }
    }
    found
}
