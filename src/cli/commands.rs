//! CLI commands and argument parsing

use crate::types::{CompressionCodec, DatabaseKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Convert CSV files and database queries into Parquet
#[derive(Parser, Debug)]
#[command(name = "table-to-parquet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run configuration file (YAML); flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every matching file in a directory, one Parquet file each
    Files {
        /// Directory scanned for input files
        #[arg(short, long)]
        input_dir: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,

        /// Only convert files whose name ends with this suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Field delimiter (single byte)
        #[arg(long)]
        delimiter: Option<char>,

        /// Treat the first line as data rather than a header
        #[arg(long)]
        no_header: bool,
    },

    /// Export a table or query, one Parquet file per chunk
    Query {
        #[command(flatten)]
        source: QueryArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// File name prefix for chunk files
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print a query's column catalog and resolved schema without reading rows
    Schema {
        #[command(flatten)]
        source: QueryArgs,
    },

    /// Show the schema and row count of a Parquet file
    Inspect {
        /// Parquet file to read
        path: PathBuf,

        /// Also print the first N rows as JSON lines
        #[arg(long)]
        head: Option<usize>,
    },
}

/// Output location and encoding
#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Output directory (created if missing)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Rows per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Compression codec
    #[arg(long)]
    pub compression: Option<CompressionCodec>,
}

/// Database connection and query selection
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Database engine
    #[arg(short, long)]
    pub engine: Option<DatabaseKind>,

    /// Full connection string (or file path for sqlite/duckdb)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port
    #[arg(long)]
    pub port: Option<u16>,

    /// Database user
    #[arg(long, env = "USERNAME")]
    pub user: Option<String>,

    /// Database password
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database name (or file path for sqlite/duckdb)
    #[arg(long, env = "DATABASE")]
    pub database: Option<String>,

    /// Table to export (`schema.table` supported)
    #[arg(short, long, env = "TABLE")]
    pub table: Option<String>,

    /// Explicit SQL query
    #[arg(short, long)]
    pub query: Option<String>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one report per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files() {
        let cli = Cli::try_parse_from([
            "table-to-parquet",
            "files",
            "--input-dir",
            "/data/in",
            "--chunk-size",
            "500",
            "--compression",
            "zstd",
        ])
        .unwrap();

        match cli.command {
            Commands::Files {
                input_dir, output, ..
            } => {
                assert_eq!(input_dir, Some(PathBuf::from("/data/in")));
                assert_eq!(output.chunk_size, Some(500));
                assert_eq!(output.compression, Some(CompressionCodec::Zstd));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_query_with_global_flags() {
        let cli = Cli::try_parse_from([
            "table-to-parquet",
            "query",
            "--engine",
            "duckdb",
            "--database",
            "app.duckdb",
            "--query",
            "SELECT 1",
            "--format",
            "pretty",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
        match cli.command {
            Commands::Query { source, .. } => {
                assert_eq!(source.engine, Some(DatabaseKind::Duckdb));
                assert_eq!(source.query.as_deref(), Some("SELECT 1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_inspect() {
        let cli =
            Cli::try_parse_from(["table-to-parquet", "inspect", "out.parquet", "--head", "5"])
                .unwrap();
        match cli.command {
            Commands::Inspect { path, head } => {
                assert_eq!(path, PathBuf::from("out.parquet"));
                assert_eq!(head, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
