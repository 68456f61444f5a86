//! Schema configuration.
//!
//! A schema comes either from a JSON file:
//!
//! ```json
//! {
//!   "table": "song",
//!   "key": "id",
//!   "fields": { "id": "NUMBER", "artist": "STRING", "lyrics": "ARRAY(STRING)" },
//!   "date_format": "%Y-%m-%d"
//! }
//! ```
//!
//! or from `--table` and repeated `--field NAME:TYPE` arguments.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sift_core::filter::{Compiler, Schema, ValueType, DEFAULT_DATE_FORMAT};
use tracing::debug;

use crate::error::{CliError, Result};

fn default_key() -> String {
    String::from("id")
}

fn default_date_format() -> String {
    String::from(DEFAULT_DATE_FORMAT)
}

/// A table and the fields filters may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Table name used to qualify columns.
    pub table: String,
    /// Column used for ordering and keyset pagination.
    #[serde(default = "default_key")]
    pub key: String,
    /// Field name to type.
    pub fields: BTreeMap<String, ValueType>,
    /// `chrono` format for `DATE("...")` arguments.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl SchemaConfig {
    /// Creates a configuration with default key and date format.
    #[must_use]
    pub fn new(table: impl Into<String>, fields: BTreeMap<String, ValueType>) -> Self {
        Self {
            table: table.into(),
            key: default_key(),
            fields,
            date_format: default_date_format(),
        }
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Serialization` for malformed JSON or unknown types.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if the file cannot be read and
    /// `CliError::SchemaFile` if it does not describe a schema.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json).map_err(|source| CliError::SchemaFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded schema file");
        Ok(config)
    }

    /// Builds a compiler for this schema.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Filter` if a field type is not allowed.
    pub fn compiler(&self, max_len: Option<usize>) -> Result<Compiler> {
        let schema = Schema::with_date_format(
            self.table.as_str(),
            self.fields.iter().map(|(name, ty)| (name.as_str(), ty.clone())),
            self.date_format.as_str(),
        )?;
        let compiler = Compiler::from_schema(schema);
        Ok(match max_len {
            Some(max) => compiler.with_max_len(max),
            None => compiler,
        })
    }
}

/// Parses a `NAME:TYPE` field argument.
///
/// # Errors
///
/// Returns `CliError::FieldSpec` for a missing name or separator and
/// `CliError::UnknownType` for an unknown type.
pub fn parse_field(arg: &str) -> Result<(String, ValueType)> {
    let (name, ty) = arg
        .split_once(':')
        .filter(|(name, _)| !name.trim().is_empty())
        .ok_or_else(|| CliError::FieldSpec(String::from(arg)))?;
    Ok((String::from(name.trim()), ty.parse()?))
}
