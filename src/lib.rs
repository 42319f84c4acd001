// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # table-to-parquet
//!
//! Chunked conversion of row-oriented tables into schema-typed Parquet files.
//!
//! ## Modes
//!
//! - **File-driven**: each CSV file in a directory becomes one Parquet file.
//!   The schema is inferred from the file's first chunk and then held fixed.
//! - **Query-driven**: a database table or query is probed for its column
//!   catalog, mapped through a [`schema::TypeMap`], and exported one Parquet
//!   file per chunk.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use table_to_parquet::config::PipelineConfig;
//! use table_to_parquet::database::DatabaseEngine;
//! use table_to_parquet::pipeline::Pipeline;
//!
//! let config = PipelineConfig::load("run.yaml")?;
//! let pipeline = Pipeline::new(config.clone());
//!
//! // File-driven
//! let report = pipeline.run_directory()?;
//!
//! // Query-driven
//! let query = config.query()?;
//! let engine = DatabaseEngine::new(query.engine, &query.connection)?;
//! let report = pipeline.run_query(&engine.source(query)?)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌────────────┐   ┌──────────────┐
//! │    Source    │ → │    Resolver    │ → │  Coercer   │ → │ OutputWriter │
//! │ CSV / DuckDB │   │ sample/catalog │   │ cast/check │   │ open/append/ │
//! │              │   │   + TypeMap    │   │            │   │    close     │
//! └──────────────┘   └────────────────┘   └────────────┘   └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Run configuration
pub mod config;

/// Canonical types, type mapping and schema resolution
pub mod schema;

/// Casting source batches to a canonical schema
pub mod coerce;

/// CSV files and query sources
pub mod source;

/// Database sources via DuckDB
pub mod database;

/// Parquet output
pub mod output;

/// Pipeline driver and run reports
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
