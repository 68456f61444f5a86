//! Paginated SELECT over a single table with an optional compiled filter.

use super::quote_identifier;
use super::value::{SqlValue, ToSqlValue};
use crate::filter::Expr;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Builds `SELECT ... FROM table [WHERE ...] ORDER BY key ASC [OFFSET ..] LIMIT ..`.
///
/// Supports keyset pagination (`after`, rows whose key is greater than the
/// given value) and page pagination (`page`, 1-based). Every value, including
/// the filter's literals, is bound as a parameter in the order it appears.
#[derive(Debug, Clone)]
pub struct FilterQuery<'a> {
    table: String,
    key: String,
    columns: Vec<String>,
    after: Option<SqlValue>,
    filter: Option<&'a Expr>,
    page: Option<u32>,
    page_size: u32,
}

impl<'a> FilterQuery<'a> {
    /// Creates a query over `table`, ordered by the `key` column.
    #[must_use]
    pub fn new(table: &str, key: &str) -> Self {
        Self {
            table: String::from(table),
            key: String::from(key),
            columns: vec![],
            after: None,
            filter: None,
            page: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Specifies the columns to select. Selects `*` when empty.
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Only returns rows whose key is greater than `value`.
    #[must_use]
    pub fn after<T: ToSqlValue>(mut self, value: T) -> Self {
        self.after = Some(value.to_sql_value());
        self
    }

    /// Adds a compiled filter predicate.
    #[must_use]
    pub const fn filter(mut self, expr: &'a Expr) -> Self {
        self.filter = Some(expr);
        self
    }

    /// Selects a 1-based page. Page `0` means no offset.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = if page == 0 { None } else { Some(page) };
        self
    }

    /// Sets the number of rows per page.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Builds the SQL text and its parameters.
    #[must_use]
    pub fn build(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT ");
        let mut params = vec![];

        if self.columns.is_empty() {
            sql.push('*');
        } else {
            let cols: Vec<String> = self.columns.iter().map(|c| quote_identifier(c)).collect();
            sql.push_str(&cols.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&quote_identifier(&self.table));

        let key = quote_identifier(&self.key);
        if let Some(after) = &self.after {
            params.push(after.clone());
            sql.push_str(" WHERE ");
            sql.push_str(&key);
            sql.push_str(" > ");
            sql.push_str(&SqlValue::placeholder(params.len()));
        }
        if let Some(expr) = self.filter {
            sql.push_str(if self.after.is_some() {
                " AND "
            } else {
                " WHERE "
            });
            params = expr.render_into(&mut sql, params);
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(&key);
        sql.push_str(" ASC");

        if let Some(page) = self.page {
            params.push(SqlValue::Int(
                i64::from(page - 1) * i64::from(self.page_size),
            ));
            sql.push_str(" OFFSET ");
            sql.push_str(&SqlValue::placeholder(params.len()));
        }
        params.push(SqlValue::Int(i64::from(self.page_size)));
        sql.push_str(" LIMIT ");
        sql.push_str(&SqlValue::placeholder(params.len()));

        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_query() {
        let (sql, params) = FilterQuery::new("song", "id").build();
        assert_eq!(sql, r#"SELECT * FROM "song" ORDER BY "id" ASC LIMIT $1"#);
        assert_eq!(params, vec![SqlValue::Int(10)]);
    }

    #[test]
    fn test_page_offset() {
        let (sql, params) = FilterQuery::new("song", "id").page(3).page_size(20).build();
        assert_eq!(
            sql,
            r#"SELECT * FROM "song" ORDER BY "id" ASC OFFSET $1 LIMIT $2"#
        );
        assert_eq!(params, vec![SqlValue::Int(40), SqlValue::Int(20)]);
    }

    #[test]
    fn test_first_page_has_zero_offset() {
        let (_, params) = FilterQuery::new("song", "id").page(1).build();
        assert_eq!(params, vec![SqlValue::Int(0), SqlValue::Int(10)]);
    }

    #[test]
    fn test_page_zero_means_no_offset() {
        let (sql, _) = FilterQuery::new("song", "id").page(0).build();
        assert!(!sql.contains("OFFSET"));
    }

    #[test]
    fn test_identifiers_are_quoted() {
        let (sql, _) = FilterQuery::new("so\"ng", "id")
            .columns(&["release date"])
            .build();
        assert_eq!(
            sql,
            r#"SELECT "release date" FROM "so""ng" ORDER BY "id" ASC LIMIT $1"#
        );
    }
}
