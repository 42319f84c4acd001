//! Output file naming
//!
//! Names are deterministic and unique within a run: file-driven outputs
//! keep the full input file name, query-driven outputs embed the chunk
//! ordinal.

use std::path::{Path, PathBuf};

/// Extension appended to every output file
pub const PARQUET_SUFFIX: &str = ".parquet";

/// Destination for a converted input file: `<dir>/<input name>.parquet`
///
/// The input's own extension is kept, so `sales.csv` becomes
/// `sales.csv.parquet`.
pub fn file_destination(output_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map_or_else(|| input.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned());
    output_dir.join(format!("{name}{PARQUET_SUFFIX}"))
}

/// Destination for one query chunk: `<dir>/<prefix>-<ordinal>.parquet`
pub fn chunk_destination(output_dir: &Path, prefix: &str, ordinal: usize) -> PathBuf {
    output_dir.join(format!("{prefix}-{ordinal}{PARQUET_SUFFIX}"))
}
