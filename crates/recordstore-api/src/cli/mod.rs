//! CLI command definitions for the `rstore` binary.
//!
//! Uses clap derive macros for argument parsing. Each gateway operation is a
//! top-level verb (`rstore define`, `rstore write`, ...).

pub mod args;
pub mod demo;
pub mod record;
pub mod status;
pub mod table;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use recordstore_types::schema::ColumnDef;
use recordstore_types::value::Value;

/// Single-statement CRUD over an embedded SQLite file.
#[derive(Parser)]
#[command(name = "rstore", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Database file to operate on (defaults to `database` from config.toml).
    #[arg(long, global = true, env = "RECORDSTORE_DB")]
    pub db: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a table (no-op if it already exists).
    Define {
        /// Table name.
        table: String,

        /// Column definition, e.g. `email:TEXT UNIQUE NOT NULL`. Repeatable.
        #[arg(short, long = "column", value_parser = args::parse_column)]
        columns: Vec<ColumnDef>,

        /// Whole schema as JSON, e.g. `{"name": ["TEXT", "NOT NULL"]}`.
        #[arg(long, conflicts_with = "columns")]
        schema: Option<String>,
    },

    /// Insert a record and print its assigned idx.
    Write {
        /// Table name.
        table: String,

        /// Column value, e.g. `name=Alice` or `age=42`. Repeatable.
        #[arg(short, long = "set", value_parser = args::parse_assignment)]
        set: Vec<(String, Value)>,
    },

    /// Run a SELECT statement and print the rows.
    Read {
        /// Complete SQL query, e.g. `SELECT * FROM users ORDER BY idx DESC`.
        query: String,
    },

    /// Update rows matching every `--where` condition.
    Update {
        /// Table name.
        table: String,

        /// Column to set. Repeatable.
        #[arg(short, long = "set", value_parser = args::parse_assignment, required = true)]
        set: Vec<(String, Value)>,

        /// Exact-match condition. Repeatable; conditions are ANDed.
        #[arg(short = 'w', long = "where", value_parser = args::parse_assignment, required = true)]
        filter: Vec<(String, Value)>,
    },

    /// Delete rows matching every `--where` condition.
    #[command(alias = "rm")]
    Delete {
        /// Table name.
        table: String,

        /// Exact-match condition. Repeatable; conditions are ANDed.
        #[arg(short = 'w', long = "where", value_parser = args::parse_assignment)]
        filter: Vec<(String, Value)>,

        /// Delete every row in the table.
        #[arg(long, conflicts_with = "filter")]
        all: bool,

        /// Skip the confirmation prompt for `--all`.
        #[arg(long)]
        force: bool,
    },

    /// Walk through define, write, update, delete and read on a sample table.
    Demo {
        /// Table to use for the walk-through.
        #[arg(long, default_value = "users")]
        table: String,
    },

    /// Show configuration, the target database, and its tables.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
