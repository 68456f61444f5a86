//! # sift-core
//!
//! A small typed filter language that compiles to parameterized SQL
//! predicates.
//!
//! This crate provides:
//! - A generic prefix tree used for longest-match keyword recognition
//! - A single-pass lexer for numbers, strings, separators, operators and symbols
//! - A recursive-descent compiler that type-checks filters against a schema
//! - Rendering of compiled filters with positional placeholders
//!
//! ## SQL Injection Prevention
//!
//! Literals never reach the SQL text, and field names are taken from the
//! schema rather than from the filter:
//!
//! ```rust
//! use sift_core::builder::SqlValue;
//! use sift_core::filter::{Compiler, Schema, ValueType, DEFAULT_DATE_FORMAT};
//!
//! let schema =
//!     Schema::with_date_format("song", [("title", ValueType::String)], DEFAULT_DATE_FORMAT)
//!         .unwrap();
//! let compiler = Compiler::from_schema(schema);
//!
//! let user_input = r#"EQ(title, "'; DROP TABLE song; --")"#;
//! let (sql, params) = compiler.parse(user_input).unwrap().to_sql();
//!
//! assert_eq!(sql, r#""song"."title" = $1"#);
//! assert_eq!(params, vec![SqlValue::Text(String::from("'; DROP TABLE song; --"))]);
//! ```

pub mod builder;
pub mod filter;
pub mod lexer;
pub mod trie;

pub use builder::{FilterQuery, SqlValue};
pub use filter::{Compiler, Expr, FilterError, Schema, ValueType};
pub use lexer::{Lexer, Token, TokenKind};
