//! SQL assembly around compiled filters.
//!
//! # Example
//!
//! ```rust
//! use sift_core::builder::FilterQuery;
//!
//! let (sql, params) = FilterQuery::new("song", "id")
//!     .columns(&["id", "title"])
//!     .after(41)
//!     .page_size(10)
//!     .build();
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "title" FROM "song" WHERE "id" > $1 ORDER BY "id" ASC LIMIT $2"#
//! );
//! assert_eq!(params.len(), 2);
//! ```

mod query;
pub mod value;

pub use query::{FilterQuery, DEFAULT_PAGE_SIZE};
pub use value::{SqlValue, ToSqlValue};

/// Quotes an identifier, doubling embedded quotes.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("song"), r#""song""#);
        assert_eq!(quote_identifier("so\"ng"), r#""so""ng""#);
    }
}
