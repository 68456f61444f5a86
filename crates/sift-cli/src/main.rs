//! sift CLI
//!
//! Compiles filter expressions against a schema and prints the resulting SQL.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use sift_cli::commands::{self, QueryOptions};
use sift_cli::config::{SchemaConfig, parse_field};
use sift_cli::error::CliError;
use sift_core::builder::DEFAULT_PAGE_SIZE;
use sift_core::filter::{DEFAULT_DATE_FORMAT, DEFAULT_MAX_DEPTH};

/// Typed filter expressions compiled to parameterized SQL.
#[derive(Parser)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON schema file.
    #[arg(short, long, env = "SIFT_SCHEMA")]
    schema: Option<PathBuf>,

    /// Table name for an inline schema.
    #[arg(short, long, conflicts_with = "schema")]
    table: Option<String>,

    /// Inline field, repeatable.
    #[arg(short, long = "field", value_name = "NAME:TYPE")]
    fields: Vec<String>,

    /// Date format for an inline schema.
    #[arg(long, default_value = DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Maximum filter length in characters (0 disables the limit).
    #[arg(long, env = "SIFT_MAX_FILTER_LEN", default_value_t = 500)]
    max_len: usize,

    /// Maximum nesting of lists and operator calls.
    #[arg(long, env = "SIFT_MAX_FILTER_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tokens of a filter.
    Tokens {
        /// Filter text.
        filter: String,
    },

    /// Compile a filter and show the SQL predicate.
    Render {
        /// Filter text.
        filter: String,
    },

    /// Build a paginated SELECT over the schema's table.
    Query {
        /// Filter text (optional).
        filter: Option<String>,

        /// Only rows whose key is greater than this.
        #[arg(long)]
        after: Option<i64>,

        /// 1-based page number.
        #[arg(short, long)]
        page: Option<u32>,

        /// Rows per page.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Columns to select, comma separated.
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Key column used for ordering.
        #[arg(short, long)]
        key: Option<String>,
    },
}

impl Cli {
    fn schema_config(&self) -> Result<SchemaConfig, CliError> {
        if let Some(path) = &self.schema {
            return SchemaConfig::load(path);
        }
        let table = self.table.as_ref().ok_or(CliError::MissingSchema)?;
        let fields = self
            .fields
            .iter()
            .map(String::as_str)
            .map(parse_field)
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        let mut config = SchemaConfig::new(table.as_str(), fields);
        config.date_format.clone_from(&self.date_format);
        Ok(config)
    }
}

fn print<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.schema_config()?;
    let max_len = (cli.max_len > 0).then_some(cli.max_len);
    let compiler = config.compiler(max_len)?.with_max_depth(cli.max_depth);
    info!(
        table = %config.table,
        fields = config.fields.len(),
        "schema loaded"
    );

    match cli.command {
        Commands::Tokens { filter } => {
            let rows = commands::tokens(&compiler, &filter)?;
            print(cli.json, &rows, || {
                rows.iter()
                    .map(|r| format!("{:>4}..{:<4} {:<9} {}", r.start, r.end, r.kind, r.value))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }

        Commands::Render { filter } => {
            let rendered = commands::render(&compiler, &filter)?;
            print(cli.json, &rendered, || rendered.to_text())?;
        }

        Commands::Query {
            filter,
            after,
            page,
            page_size,
            columns,
            key,
        } => {
            let options = QueryOptions {
                filter,
                after,
                page,
                page_size: Some(page_size),
                columns,
                key,
            };
            let rendered = commands::query(&compiler, &config, &options)?;
            print(cli.json, &rendered, || rendered.to_text())?;
        }
    }

    Ok(())
}
