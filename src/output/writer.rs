//! Parquet file writer
//!
//! [`OutputWriter`] owns one Parquet file from `open` to `close`. A file is
//! only readable once `close` has written its footer.

use crate::error::{Error, Result};
use crate::schema::CanonicalSchema;
use crate::types::CompressionCodec;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression codec
    #[must_use]
    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.compression = codec.into();
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Compression used for every column
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder =
                builder.set_statistics_enabled(parquet::file::properties::EnabledStatistics::None);
        }

        builder.build()
    }
}

// ============================================================================
// Writer Lifecycle
// ============================================================================

/// Lifecycle position of an [`OutputWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterStatus {
    Unopened,
    Open,
    Closed,
}

impl WriterStatus {
    fn as_str(self) -> &'static str {
        match self {
            WriterStatus::Unopened => "not open",
            WriterStatus::Open => "already open",
            WriterStatus::Closed => "closed",
        }
    }
}

enum WriterState {
    Unopened,
    Open {
        writer: ArrowWriter<File>,
        schema: CanonicalSchema,
        destination: PathBuf,
    },
    Closed,
}

/// A finalized output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

/// Parquet writer bound to one schema and one destination.
///
/// `open` → `append`* → `close`. Any other order is `InvalidState`. A writer
/// dropped while open is finalized on drop as a last resort.
pub struct OutputWriter {
    config: ParquetWriterConfig,
    state: WriterState,
    rows_written: usize,
}

impl OutputWriter {
    /// Create an unopened writer
    pub fn new(config: ParquetWriterConfig) -> Self {
        Self {
            config,
            state: WriterState::Unopened,
            rows_written: 0,
        }
    }

    /// Open, run `f`, and close, on success and on failure alike.
    ///
    /// If `f` fails the writer is still closed and `f`'s error is returned;
    /// a close failure on that path is only logged.
    pub fn scoped<T, F>(
        config: &ParquetWriterConfig,
        schema: &CanonicalSchema,
        destination: &Path,
        f: F,
    ) -> Result<(T, WrittenFile)>
    where
        F: FnOnce(&mut OutputWriter) -> Result<T>,
    {
        let mut writer = Self::new(config.clone());
        writer.open(schema, destination)?;

        match f(&mut writer) {
            Ok(value) => {
                let file = writer.close()?;
                Ok((value, file))
            }
            Err(e) => {
                if let Err(close_err) = writer.close() {
                    tracing::warn!(
                        "Failed to close {} after error: {close_err}",
                        destination.display()
                    );
                }
                Err(e)
            }
        }
    }

    /// Current lifecycle position
    pub fn status(&self) -> WriterStatus {
        match self.state {
            WriterState::Unopened => WriterStatus::Unopened,
            WriterState::Open { .. } => WriterStatus::Open,
            WriterState::Closed => WriterStatus::Closed,
        }
    }

    /// Rows appended so far
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Create the destination file and bind the schema
    pub fn open(&mut self, schema: &CanonicalSchema, destination: impl AsRef<Path>) -> Result<()> {
        let status = self.status();
        if status != WriterStatus::Unopened {
            return Err(Error::InvalidState {
                operation: "open",
                state: status.as_str(),
            });
        }

        let destination = destination.as_ref();
        let file = File::create(destination)
            .map_err(|e| Error::destination(destination.display().to_string(), e.to_string()))?;

        let props = self.config.build_properties();
        let writer = ArrowWriter::try_new(file, schema.arrow_schema(), Some(props)).map_err(|e| {
            Error::destination(
                destination.display().to_string(),
                format!("Failed to create Parquet writer: {e}"),
            )
        })?;

        tracing::debug!("Opened {} with schema {}", destination.display(), schema);

        self.state = WriterState::Open {
            writer,
            schema: schema.clone(),
            destination: destination.to_path_buf(),
        };
        Ok(())
    }

    /// Queue a batch for writing; its schema must equal the bound schema
    pub fn append(&mut self, batch: &RecordBatch) -> Result<()> {
        let status = self.status();
        let WriterState::Open { writer, schema, .. } = &mut self.state else {
            return Err(Error::InvalidState {
                operation: "append to",
                state: status.as_str(),
            });
        };

        if !schema.matches(&batch.schema()) {
            return Err(Error::schema_mismatch(format!(
                "batch schema {} differs from writer schema {}",
                describe(&batch.schema()),
                schema
            )));
        }

        writer.write(batch).map_err(|e| Error::Output {
            message: format!("Failed to write batch: {e}"),
        })?;

        self.rows_written += batch.num_rows();
        Ok(())
    }

    /// Finalize the file footer. Calling it twice is `InvalidState`.
    pub fn close(&mut self) -> Result<WrittenFile> {
        match std::mem::replace(&mut self.state, WriterState::Closed) {
            WriterState::Open {
                writer,
                destination,
                ..
            } => {
                writer.close().map_err(|e| Error::Output {
                    message: format!(
                        "Failed to finalize {}: {e}",
                        destination.display()
                    ),
                })?;
                tracing::debug!(
                    "Closed {} ({} rows)",
                    destination.display(),
                    self.rows_written
                );
                Ok(WrittenFile {
                    path: destination,
                    rows: self.rows_written,
                })
            }
            previous => {
                let status = match previous {
                    WriterState::Unopened => WriterStatus::Unopened,
                    _ => WriterStatus::Closed,
                };
                self.state = previous;
                Err(Error::InvalidState {
                    operation: "close",
                    state: status.as_str(),
                })
            }
        }
    }
}

impl Drop for OutputWriter {
    fn drop(&mut self) {
        if let WriterState::Open {
            writer,
            destination,
            ..
        } = std::mem::replace(&mut self.state, WriterState::Closed)
        {
            tracing::warn!(
                "Writer for {} dropped while open, finalizing",
                destination.display()
            );
            if let Err(e) = writer.close() {
                tracing::warn!("Failed to finalize {}: {e}", destination.display());
            }
        }
    }
}

fn describe(schema: &SchemaRef) -> String {
    let fields: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| format!("{}: {}", f.name(), f.data_type()))
        .collect();
    format!("[{}]", fields.join(", "))
}

// ============================================================================
// Reading Back
// ============================================================================

/// Contents of a finalized Parquet file
#[derive(Debug)]
pub struct ParquetSummary {
    pub schema: SchemaRef,
    pub rows: usize,
    pub batches: Vec<RecordBatch>,
}

/// Read a Parquet file fully into memory
pub fn read_parquet(path: impl AsRef<Path>) -> Result<ParquetSummary> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::Output {
        message: format!("Failed to open {}: {e}", path.display()),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let rows = batches.iter().map(RecordBatch::num_rows).sum();

    Ok(ParquetSummary {
        schema,
        rows,
        batches,
    })
}
