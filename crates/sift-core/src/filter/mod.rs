//! Filter Compiler
//!
//! A recursive-descent parser and type checker that turns filter text such as
//! `AND(EQ(artist, "Muse"), ALIKE(lyrics, "%hear%"))` into a typed [`Expr`],
//! which renders itself as a parameterized SQL predicate.
//!
//! ```rust
//! use sift_core::filter::{Compiler, Schema, ValueType, DEFAULT_DATE_FORMAT};
//!
//! let schema = Schema::with_date_format(
//!     "song",
//!     [
//!         ("artist", ValueType::String),
//!         ("lyrics", ValueType::array_of(ValueType::String)),
//!     ],
//!     DEFAULT_DATE_FORMAT,
//! )
//! .unwrap();
//! let compiler = Compiler::from_schema(schema);
//!
//! let expr = compiler
//!     .parse(r#"AND(EQ(artist, "Muse"), ALIKE(lyrics, "%hear%"))"#)
//!     .unwrap();
//! let (sql, params) = expr.to_sql();
//! assert_eq!(
//!     sql,
//!     r#"("song"."artist" = $1 AND EXISTS (SELECT 1 FROM unnest("song"."lyrics") AS element WHERE element ILIKE $2))"#
//! );
//! assert_eq!(params.len(), 2);
//! ```

mod compiler;
mod error;
mod expr;
mod operator;
mod types;

pub use compiler::{
    Compiler, DateParser, Schema, DEFAULT_DATE_FORMAT, DEFAULT_MAX_DEPTH, SEPARATORS,
};
pub use error::{Arity, BoxError, ExprErrorKind, FilterError, Result};
pub use expr::{ColumnRef, Comparison, Expr};
pub use operator::Operator;
pub use types::{UnknownValueType, ValueType};
