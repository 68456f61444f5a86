//! Bound query parameters.
//!
//! Literal values from a filter never reach the SQL text; they travel next to
//! it as `SqlValue`s referenced by positional placeholders.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A SQL value that is bound as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// Integer value.
    Int(i64),
    /// Text value.
    Text(String),
    /// Date value.
    Date(NaiveDate),
}

impl SqlValue {
    /// Returns the positional placeholder for the `n`th parameter (1-based).
    #[must_use]
    pub fn placeholder(n: usize) -> String {
        format!("${n}")
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl ToSqlValue for NaiveDate {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Date(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        assert_eq!(SqlValue::placeholder(1), "$1");
        assert_eq!(SqlValue::placeholder(12), "$12");
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlValue::Int(-3).to_string(), "-3");
        assert_eq!(SqlValue::Text(String::from("it's")).to_string(), "\"it's\"");
        let date = NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date");
        assert_eq!(SqlValue::Date(date).to_string(), "2022-01-01");
    }

    #[test]
    fn test_to_sql_value_conversions() {
        assert_eq!(42_i32.to_sql_value(), SqlValue::Int(42));
        assert_eq!(7_u32.to_sql_value(), SqlValue::Int(7));
        assert_eq!("Muse".to_sql_value(), SqlValue::Text(String::from("Muse")));
        let date = NaiveDate::from_ymd_opt(2006, 7, 3).expect("valid date");
        assert_eq!(date.to_sql_value(), SqlValue::Date(date));
    }

    #[test]
    fn test_serializes_untagged() {
        let params = vec![SqlValue::Int(1), SqlValue::Text(String::from("a"))];
        assert_eq!(serde_json::to_string(&params).expect("serialize"), "[1,\"a\"]");
    }
}
