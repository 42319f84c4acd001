//! Source module
//!
//! Row-oriented inputs of the pipeline.
//!
//! # Overview
//!
//! - [`CsvSource`]: delimited text files, streamed as text batches
//! - [`QuerySource`]: databases that can describe a query before running it
//! - [`ChunkAccumulator`]: re-slices upstream batches to the chunk size
//! - [`list_input_files`]: input discovery for directory runs

mod chunker;
mod csv;

pub use self::csv::{CsvBatches, CsvSource};
pub use chunker::ChunkAccumulator;

use crate::error::Result;
use crate::schema::ColumnDescriptor;
use arrow::record_batch::RecordBatch;
use std::fs;
use std::path::{Path, PathBuf};

/// A source whose column types are known before any row is read
pub trait QuerySource {
    /// Human-readable name for logs and reports
    fn name(&self) -> String;

    /// Column names and native types, from a probe that returns no rows
    fn describe(&self) -> Result<Vec<ColumnDescriptor>>;

    /// Stream the result in chunks of `chunk_size` rows, one at a time.
    ///
    /// `sink` is called once per chunk, in order; an error from `sink`
    /// stops the stream and is returned unchanged.
    fn stream_chunks(
        &self,
        chunk_size: usize,
        sink: &mut dyn FnMut(RecordBatch) -> Result<()>,
    ) -> Result<()>;
}

/// Regular files in `dir` whose name ends with `suffix`, sorted by path
pub fn list_input_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        // Follows symlinks
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(suffix));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
