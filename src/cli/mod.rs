//! CLI module
//!
//! Command-line interface for running conversions.
//!
//! # Commands
//!
//! - `files` - Convert a directory of delimited text files
//! - `query` - Export a database table or query in chunks
//! - `schema` - Show a query's catalog and resolved schema
//! - `inspect` - Show a Parquet file's schema and rows

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputArgs, OutputFormat, QueryArgs};
pub use runner::Runner;
