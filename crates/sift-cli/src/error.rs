//! Error types for the command-line front end.

use std::path::PathBuf;

use sift_core::filter::{FilterError, UnknownValueType};

/// Errors that can occur while running a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// IO error (reading the schema file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The schema file is not valid JSON for a schema.
    #[error("Failed to parse schema file '{path}': {source}")]
    SchemaFile {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A `--field` argument is not `NAME:TYPE`.
    #[error("Invalid field '{0}': expected NAME:TYPE")]
    FieldSpec(String),

    /// A field type name is not recognized.
    #[error(transparent)]
    UnknownType(#[from] UnknownValueType),

    /// Neither a schema file nor an inline table was given.
    #[error("No schema given: pass --schema FILE or --table NAME with --field NAME:TYPE")]
    MissingSchema,

    /// The schema or the filter was rejected.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// JSON error while reading a schema or writing output.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
