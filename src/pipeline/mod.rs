//! Pipeline driver
//!
//! Sequences schema resolution, coercion and writing over a source's chunks.
//!
//! # Overview
//!
//! - File-driven: [`Pipeline::run_directory`] / [`Pipeline::convert_file`].
//!   The schema comes from the first chunk; one writer spans the whole file.
//! - Query-driven: [`Pipeline::run_query`]. The schema comes from the
//!   source's catalog before any row is read; every chunk gets its own file.
//!
//! Sources are processed one at a time, one chunk at a time.

mod types;

pub use types::{OutcomeStatus, RunReport, SourceOutcome, SourceReport};

use crate::coerce::ChunkCoercer;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::output::{chunk_destination, file_destination, OutputWriter, ParquetWriterConfig};
use crate::schema::{
    resolve_from_catalog, resolve_from_sample, CanonicalSchema, CanonicalType, ColumnDescriptor,
    TypeMap,
};
use crate::source::{list_input_files, CsvSource, QuerySource};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Catalog and resolved schema of a query source
#[derive(Debug, Clone, Serialize)]
pub struct QuerySchema {
    pub source: String,
    pub catalog: Vec<ColumnDescriptor>,
    pub schema: CanonicalSchema,
}

/// Converts sources to Parquet according to one run configuration
pub struct Pipeline {
    config: PipelineConfig,
    type_map: TypeMap,
    writer_config: ParquetWriterConfig,
}

impl Pipeline {
    /// Create a pipeline using the standard type map
    pub fn new(config: PipelineConfig) -> Self {
        let writer_config = ParquetWriterConfig::new()
            .with_codec(config.output.compression)
            .with_row_group_size(config.output.row_group_size);
        Self {
            config,
            type_map: TypeMap::standard(),
            writer_config,
        }
    }

    /// Replace the type map used for catalog resolution
    #[must_use]
    pub fn with_type_map(mut self, type_map: TypeMap) -> Self {
        self.type_map = type_map;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    pub fn writer_config(&self) -> &ParquetWriterConfig {
        &self.writer_config
    }

    // ========================================================================
    // File-driven mode
    // ========================================================================

    /// Convert every matching file in the input directory.
    ///
    /// A failing file is logged and recorded, and the run moves on to the
    /// next one. Only failures that affect every file (output directory,
    /// input listing) are returned as `Err`.
    pub fn run_directory(&self) -> Result<RunReport> {
        let files = &self.config.files;
        self.ensure_output_dir()?;

        let inputs = list_input_files(&files.input_dir, &files.suffix).map_err(|e| {
            Error::source_read(files.input_dir.display().to_string(), e.to_string())
        })?;
        tracing::info!(
            "Found {} input file(s) in {} matching '{}'",
            inputs.len(),
            files.input_dir.display(),
            files.suffix
        );

        let mut report = RunReport::new();
        for path in inputs {
            let name = path.display().to_string();
            match self.convert_file(&path) {
                Ok(source_report) => {
                    tracing::info!(
                        source = %name,
                        rows = source_report.rows,
                        chunks = source_report.chunks,
                        "Converted in {}ms",
                        source_report.duration_ms
                    );
                    report.push(SourceOutcome::succeeded(source_report));
                }
                Err(e) => {
                    tracing::error!(source = %name, kind = e.kind(), "Conversion failed: {e}");
                    report.push(SourceOutcome::failed(name, &e));
                }
            }
        }

        Ok(report)
    }

    /// Convert one delimited text file into `<output dir>/<file name>.parquet`
    pub fn convert_file(&self, path: &Path) -> Result<SourceReport> {
        let files = &self.config.files;
        let source = CsvSource::new(path, self.config.chunk_size)
            .with_delimiter(files.delimiter_byte()?)
            .with_header(files.has_header);

        let batches = source.open()?;
        let header = batches.schema();
        let destination = file_destination(&self.config.output.dir, path);

        self.convert_batches(&path.display().to_string(), header, batches, &destination)
    }

    /// Write a stream of batches to one file, typed from the first batch.
    ///
    /// `source_schema` is only used when the stream is empty: the file is
    /// then written with zero rows and every column as utf8.
    pub fn convert_batches<I>(
        &self,
        name: &str,
        source_schema: SchemaRef,
        batches: I,
        destination: &Path,
    ) -> Result<SourceReport>
    where
        I: IntoIterator<Item = Result<RecordBatch>>,
    {
        let start = Instant::now();

        if source_schema.fields().is_empty() {
            return Err(Error::source_read(name, "no columns found"));
        }

        let mut batches = batches.into_iter();
        let first = batches.next().transpose()?;

        let schema = match &first {
            Some(sample) => resolve_from_sample(sample)?,
            None => CanonicalSchema::try_new(
                source_schema
                    .fields()
                    .iter()
                    .map(|f| (f.name().clone(), CanonicalType::Utf8)),
            )?,
        };
        tracing::debug!(source = %name, "Resolved schema {}", schema);

        let coercer = ChunkCoercer::new(schema.clone());
        let mut report = SourceReport::new(name, schema.clone());

        let ((), written) =
            OutputWriter::scoped(&self.writer_config, &schema, destination, |writer| {
                for batch in first.into_iter().map(Ok).chain(batches) {
                    let coerced = coercer.coerce(&batch?)?;
                    writer.append(&coerced)?;
                    report.add_chunk(coerced.num_rows());
                    tracing::debug!(
                        source = %name,
                        chunk = report.chunks,
                        rows = coerced.num_rows(),
                        "Appended chunk"
                    );
                }
                Ok(())
            })?;

        report.outputs.push(written);
        report.set_duration(start.elapsed().as_millis() as u64);
        Ok(report)
    }

    // ========================================================================
    // Query-driven mode
    // ========================================================================

    /// Probe the source and map its catalog; reads no rows
    pub fn resolve_query_schema<Q>(&self, source: &Q) -> Result<QuerySchema>
    where
        Q: QuerySource + ?Sized,
    {
        let name = source.name();
        let catalog = source.describe()?;
        tracing::debug!(source = %name, "Probe returned {} column(s)", catalog.len());

        let schema = resolve_from_catalog(&catalog, &self.type_map)?;
        Ok(QuerySchema {
            source: name,
            catalog,
            schema,
        })
    }

    /// Export a query, one Parquet file per chunk.
    ///
    /// The schema is resolved before anything is created, so an unmapped
    /// column type leaves no output behind. A query with no rows writes no
    /// files.
    pub fn run_query<Q>(&self, source: &Q) -> Result<SourceReport>
    where
        Q: QuerySource + ?Sized,
    {
        let start = Instant::now();
        let QuerySchema { source: name, schema, .. } = self.resolve_query_schema(source)?;
        tracing::info!(source = %name, "Resolved schema {}", schema);

        self.ensure_output_dir()?;

        let output = &self.config.output;
        let coercer = ChunkCoercer::new(schema.clone());
        let mut report = SourceReport::new(&name, schema.clone());

        source.stream_chunks(self.config.chunk_size, &mut |batch| {
            let ordinal = report.chunks;
            let coerced = coercer.coerce(&batch)?;
            let destination = chunk_destination(&output.dir, &output.chunk_prefix, ordinal);

            let ((), written) =
                OutputWriter::scoped(&self.writer_config, &schema, &destination, |writer| {
                    writer.append(&coerced)
                })?;

            tracing::info!(
                source = %name,
                chunk = ordinal,
                rows = written.rows,
                "Wrote {}",
                written.path.display()
            );
            report.add_chunk(written.rows);
            report.outputs.push(written);
            Ok(())
        })?;

        if report.chunks == 0 {
            tracing::warn!(source = %name, "Query returned no rows, nothing written");
        }

        report.set_duration(start.elapsed().as_millis() as u64);
        Ok(report)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        let dir = &self.config.output.dir;
        fs::create_dir_all(dir).map_err(|e| Error::destination(dir.display().to_string(), e.to_string()))
    }
}
