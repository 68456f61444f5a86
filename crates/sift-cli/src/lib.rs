//! Command-line front end for the sift filter language.
//!
//! `sift` loads a schema (from a JSON file or from `--table`/`--field`
//! arguments) and then:
//!
//! - **tokens** - lexes a filter and lists its tokens
//! - **render** - compiles a filter and prints the SQL predicate and parameters
//! - **query** - builds a paginated `SELECT` with an optional filter
//!
//! Output is plain text by default or JSON with `--json`.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{QueryOptions, Rendered, TokenRow};
pub use config::SchemaConfig;
pub use error::{CliError, Result};
