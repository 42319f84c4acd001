//! Delimited text source
//!
//! Streams a CSV file as batches of text columns. Every column is read as
//! Utf8; typing happens later, from the first batch's values.

use crate::error::{Error, Result};
use arrow::csv::reader::Format;
use arrow::csv::{Reader, ReaderBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A delimited text file read in fixed-size batches
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    chunk_size: usize,
    delimiter: u8,
    has_header: bool,
}

impl CsvSource {
    /// Comma-delimited file with a header line
    pub fn new(path: impl AsRef<Path>, chunk_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            chunk_size: chunk_size.max(1),
            delimiter: b',',
            has_header: true,
        }
    }

    /// Set the field delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first line is a header
    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file and start streaming batches
    pub fn open(&self) -> Result<CsvBatches> {
        let name = self.path.display().to_string();
        let mut file = File::open(&self.path).map_err(|e| Error::source_read(&name, e.to_string()))?;

        // Only the header (or the first record's width) is needed here
        let format = Format::default()
            .with_header(self.has_header)
            .with_delimiter(self.delimiter);
        let (header, _) = format
            .infer_schema(&mut file, Some(0))
            .map_err(|e| Error::source_read(&name, e.to_string()))?;

        let fields: Vec<Field> = header
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect();
        let schema: SchemaRef = Arc::new(Schema::new(fields));

        file.seek(SeekFrom::Start(0))?;

        // Short rows are padded with nulls; long rows stay an error
        let reader = ReaderBuilder::new(Arc::clone(&schema))
            .with_header(self.has_header)
            .with_delimiter(self.delimiter)
            .with_truncated_rows(true)
            .with_batch_size(self.chunk_size)
            .build(file)
            .map_err(|e| Error::source_read(&name, e.to_string()))?;

        Ok(CsvBatches {
            name,
            schema,
            reader,
            done: false,
        })
    }
}

/// Iterator over the text batches of one file.
///
/// Ends after the first read error.
#[derive(Debug)]
pub struct CsvBatches {
    name: String,
    schema: SchemaRef,
    reader: Reader<File>,
    done: bool,
}

impl CsvBatches {
    /// All-Utf8 schema derived from the header
    pub fn schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }
}

impl Iterator for CsvBatches {
    type Item = Result<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next()? {
            Ok(batch) => Some(Ok(batch)),
            Err(e) => {
                // The reader repeats its last error forever
                self.done = true;
                Some(Err(Error::source_read(&self.name, e.to_string())))
            }
        }
    }
}
