//! Command implementations.
//!
//! Each command returns a serializable report; `main` prints it either as
//! text or as JSON.

use std::fmt::Write as _;

use serde::Serialize;
use sift_core::builder::{FilterQuery, SqlValue};
use sift_core::filter::{Compiler, Operator};
use sift_core::lexer::TokenKind;
use tracing::debug;

use crate::config::SchemaConfig;
use crate::error::Result;

/// One lexed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRow {
    /// First code point of the token.
    pub start: usize,
    /// One past the last code point of the token.
    pub end: usize,
    /// Token kind (`number`, `string`, `separator`, `operator`, `symbol`).
    pub kind: &'static str,
    /// Token value; operators are shown by keyword.
    pub value: String,
}

impl TokenRow {
    fn from_kind(kind: TokenKind, start: usize, end: usize) -> Self {
        let (kind, value) = match kind {
            TokenKind::Number(n) => ("number", n.to_string()),
            TokenKind::String(s) => ("string", s),
            TokenKind::Separator(c) => ("separator", c.to_string()),
            TokenKind::Operator(index) => (
                "operator",
                Operator::from_index(index)
                    .map_or_else(|| format!("#{index}"), |op| String::from(op.keyword())),
            ),
            TokenKind::Symbol(s) => ("symbol", s),
        };
        Self {
            start,
            end,
            kind,
            value,
        }
    }
}

/// Lexes `filter` without type checking it.
///
/// # Errors
///
/// Returns the first lexical error.
pub fn tokens(compiler: &Compiler, filter: &str) -> Result<Vec<TokenRow>> {
    let tokens = compiler
        .lexer(filter)
        .tokenize()
        .map_err(sift_core::FilterError::from)?;
    debug!(count = tokens.len(), "lexed filter");
    Ok(tokens
        .into_iter()
        .map(|t| TokenRow::from_kind(t.kind, t.span.start, t.span.end))
        .collect())
}

/// SQL text with its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    /// SQL with `$N` placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<SqlValue>,
}

impl Rendered {
    /// Formats the SQL followed by one `$N = value` line per parameter.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = self.sql.clone();
        for (i, value) in self.params.iter().enumerate() {
            let _ = write!(out, "\n{} = {value}", SqlValue::placeholder(i + 1));
        }
        out
    }
}

impl From<(String, Vec<SqlValue>)> for Rendered {
    fn from((sql, params): (String, Vec<SqlValue>)) -> Self {
        Self { sql, params }
    }
}

/// Compiles `filter` and renders the predicate on its own.
///
/// # Errors
///
/// Returns `CliError::Filter` if the filter is rejected.
pub fn render(compiler: &Compiler, filter: &str) -> Result<Rendered> {
    Ok(compiler.parse(filter)?.to_sql().into())
}

/// Options for the `query` command.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Optional filter; blank means no filter.
    pub filter: Option<String>,
    /// Only rows whose key is greater than this.
    pub after: Option<i64>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page.
    pub page_size: Option<u32>,
    /// Columns to select; all when empty.
    pub columns: Vec<String>,
    /// Overrides the configured key column.
    pub key: Option<String>,
}

/// Builds a paginated `SELECT` over the configured table.
///
/// # Errors
///
/// Returns `CliError::Filter` if the filter is rejected.
pub fn query(compiler: &Compiler, config: &SchemaConfig, options: &QueryOptions) -> Result<Rendered> {
    let filter = options
        .filter
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map(|f| compiler.parse(f))
        .transpose()?;

    let columns: Vec<&str> = options.columns.iter().map(String::as_str).collect();
    let key = options.key.as_deref().unwrap_or(&config.key);
    let mut builder = FilterQuery::new(&config.table, key).columns(&columns);
    if let Some(after) = options.after {
        builder = builder.after(after);
    }
    if let Some(expr) = &filter {
        builder = builder.filter(expr);
    }
    if let Some(page) = options.page {
        builder = builder.page(page);
    }
    if let Some(size) = options.page_size {
        builder = builder.page_size(size);
    }
    Ok(builder.build().into())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sift_core::filter::ValueType;

    use super::*;
    use crate::error::CliError;

    fn config() -> SchemaConfig {
        let mut fields = BTreeMap::new();
        fields.insert(String::from("id"), ValueType::Number);
        fields.insert(String::from("artist"), ValueType::String);
        SchemaConfig::new("song", fields)
    }

    #[test]
    fn test_tokens_names_operators() {
        let compiler = config().compiler(None).expect("compiler");
        let rows = tokens(&compiler, r#"EQ(artist, "Muse")"#).expect("tokens");
        let kinds: Vec<_> = rows.iter().map(|r| (r.kind, r.value.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                ("operator", "EQ"),
                ("separator", "("),
                ("symbol", "artist"),
                ("separator", ","),
                ("string", "Muse"),
                ("separator", ")"),
            ]
        );
        assert_eq!((rows[4].start, rows[4].end), (11, 17));
    }

    #[test]
    fn test_tokens_reports_lex_error() {
        let compiler = config().compiler(None).expect("compiler");
        let err = tokens(&compiler, r#"EQ(artist, "Muse"#).expect_err("unclosed");
        assert!(matches!(err, CliError::Filter(_)));
    }

    #[test]
    fn test_render_text() {
        let compiler = config().compiler(None).expect("compiler");
        let rendered = render(&compiler, r#"EQ(artist, "Muse")"#).expect("render");
        assert_eq!(rendered.to_text(), "\"song\".\"artist\" = $1\n$1 = \"Muse\"");
    }

    #[test]
    fn test_render_respects_max_len() {
        let compiler = config().compiler(Some(5)).expect("compiler");
        assert!(render(&compiler, "EQ(id, 1)").is_err());
    }

    #[test]
    fn test_query_with_filter_and_after() {
        let config = config();
        let compiler = config.compiler(None).expect("compiler");
        let options = QueryOptions {
            filter: Some(String::from("GT(id, 5)")),
            after: Some(2),
            page_size: Some(20),
            ..QueryOptions::default()
        };
        let rendered = query(&compiler, &config, &options).expect("query");
        assert_eq!(
            rendered.sql,
            r#"SELECT * FROM "song" WHERE "id" > $1 AND "song"."id" > $2 ORDER BY "id" ASC LIMIT $3"#
        );
        assert_eq!(
            rendered.params,
            vec![SqlValue::Int(2), SqlValue::Int(5), SqlValue::Int(20)]
        );
    }

    #[test]
    fn test_query_blank_filter_is_ignored() {
        let config = config();
        let compiler = config.compiler(None).expect("compiler");
        let options = QueryOptions {
            filter: Some(String::from("  ")),
            page: Some(2),
            columns: vec![String::from("artist")],
            ..QueryOptions::default()
        };
        let rendered = query(&compiler, &config, &options).expect("query");
        assert_eq!(
            rendered.sql,
            r#"SELECT "artist" FROM "song" ORDER BY "id" ASC OFFSET $1 LIMIT $2"#
        );
        assert_eq!(rendered.params, vec![SqlValue::Int(10), SqlValue::Int(10)]);
    }
}
