//! Output module
//!
//! Handles Parquet file writing and naming.
//!
//! # Overview
//!
//! This module provides:
//! - The writer lifecycle (`open` → `append`* → `close`) with scoped release
//! - Writer configuration (compression, row groups)
//! - Deterministic destination naming
//! - Reading finalized files back

mod naming;
mod writer;

pub use naming::{chunk_destination, file_destination, PARQUET_SUFFIX};
pub use writer::{
    read_parquet, OutputWriter, ParquetSummary, ParquetWriterConfig, WriterStatus, WrittenFile,
};
