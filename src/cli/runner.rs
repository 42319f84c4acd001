//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputArgs, OutputFormat, QueryArgs};
use crate::config::{PipelineConfig, QuerySourceConfig};
use crate::database::DatabaseEngine;
use crate::error::{Error, Result};
use crate::output::read_parquet;
use crate::pipeline::{Pipeline, RunReport, SourceOutcome};
use arrow::json::LineDelimitedWriter;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Files { .. } => self.files(),
            Commands::Query { .. } => self.query(),
            Commands::Schema { .. } => self.schema(),
            Commands::Inspect { path, head } => self.inspect(path, *head),
        }
    }

    /// Effective run configuration: config file (or defaults) overridden by flags
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        match &self.cli.command {
            Commands::Files {
                input_dir,
                output,
                suffix,
                delimiter,
                no_header,
            } => {
                apply_output(&mut config, output);
                override_with(&mut config.files.input_dir, input_dir.as_ref());
                override_with(&mut config.files.suffix, suffix.as_ref());
                override_with(&mut config.files.delimiter, delimiter.as_ref());
                if *no_header {
                    config.files.has_header = false;
                }
            }
            Commands::Query {
                source,
                output,
                prefix,
            } => {
                apply_output(&mut config, output);
                override_with(&mut config.output.chunk_prefix, prefix.as_ref());
                apply_query(&mut config, source)?;
            }
            Commands::Schema { source } => apply_query(&mut config, source)?,
            Commands::Inspect { .. } => {}
        }

        config.validate()?;
        Ok(config)
    }

    /// Convert a directory of files
    fn files(&self) -> Result<()> {
        let config = self.pipeline_config()?;
        let pipeline = Pipeline::new(config);

        let report = pipeline.run_directory()?;
        self.output(&report);
        fail_on_errors(&report)
    }

    /// Export a query in chunks
    fn query(&self) -> Result<()> {
        let config = self.pipeline_config()?;
        let query_config = config.query()?.clone();
        let pipeline = Pipeline::new(config);

        let mut report = RunReport::new();
        let outcome = connect(&query_config).and_then(|engine| {
            let source = engine.source(&query_config)?;
            pipeline.run_query(&source)
        });

        match outcome {
            Ok(source_report) => {
                tracing::info!(
                    "Exported {} rows in {} chunk(s)",
                    source_report.rows,
                    source_report.chunks
                );
                report.push(SourceOutcome::succeeded(source_report));
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), "Export failed: {e}");
                report.push(SourceOutcome::failed(source_label(&query_config), &e));
            }
        }

        self.output(&report);
        fail_on_errors(&report)
    }

    /// Print catalog and resolved schema
    fn schema(&self) -> Result<()> {
        let config = self.pipeline_config()?;
        let query_config = config.query()?.clone();
        let pipeline = Pipeline::new(config);

        let engine = connect(&query_config)?;
        let source = engine.source(&query_config)?;
        let resolved = pipeline.resolve_query_schema(&source)?;

        self.output(&resolved);
        Ok(())
    }

    /// Print a Parquet file's schema, row count and optionally its first rows
    fn inspect(&self, path: &Path, head: Option<usize>) -> Result<()> {
        let summary = read_parquet(path)?;

        let fields: Vec<_> = summary
            .schema
            .fields()
            .iter()
            .map(|f| {
                json!({
                    "name": f.name(),
                    "type": f.data_type().to_string(),
                    "nullable": f.is_nullable(),
                })
            })
            .collect();

        self.output(&json!({
            "path": path.display().to_string(),
            "rows": summary.rows,
            "batches": summary.batches.len(),
            "schema": fields,
        }));

        if let Some(limit) = head {
            let mut writer = LineDelimitedWriter::new(std::io::stdout().lock());
            let mut remaining = limit;
            for batch in &summary.batches {
                if remaining == 0 {
                    break;
                }
                let take = remaining.min(batch.num_rows());
                writer.write(&batch.slice(0, take))?;
                remaining -= take;
            }
            writer.finish()?;
        }

        Ok(())
    }

    /// Output a report
    fn output<T: Serialize>(&self, value: &T) {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        };
        match rendered {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!("Failed to render output: {e}"),
        }
    }
}

fn connect(query: &QuerySourceConfig) -> Result<DatabaseEngine> {
    let engine = DatabaseEngine::new(query.engine, &query.connection)?;
    engine.check_connection()?;
    Ok(engine)
}

fn source_label(query: &QuerySourceConfig) -> String {
    query
        .table
        .clone()
        .unwrap_or_else(|| "query".to_string())
}

fn fail_on_errors(report: &RunReport) -> Result<()> {
    let failed = report.failed().count();
    if failed == 0 {
        return Ok(());
    }
    for outcome in report.failed() {
        eprintln!(
            "{} failed ({}): {}",
            outcome.source,
            outcome.error_kind.unwrap_or("other"),
            outcome.error.as_deref().unwrap_or_default()
        );
    }
    Err(Error::Other(format!(
        "{failed} of {} source(s) failed",
        report.sources.len()
    )))
}

fn override_with<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

fn override_option<T: Clone>(target: &mut Option<T>, value: Option<&T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

fn apply_output(config: &mut PipelineConfig, args: &OutputArgs) {
    override_with(&mut config.output.dir, args.output_dir.as_ref());
    override_with(&mut config.chunk_size, args.chunk_size.as_ref());
    override_with(&mut config.output.compression, args.compression.as_ref());
}

fn apply_query(config: &mut PipelineConfig, args: &QueryArgs) -> Result<()> {
    let existing = config.query.take();
    let engine = args
        .engine
        .or(existing.as_ref().map(|q| q.engine))
        .ok_or_else(|| Error::missing_field("query.engine (or --engine)"))?;

    let mut query = existing.unwrap_or(QuerySourceConfig {
        engine,
        connection: Default::default(),
        table: None,
        query: None,
    });
    query.engine = engine;

    let conn = &mut query.connection;
    override_option(&mut conn.connection_string, args.connection_string.as_ref());
    override_option(&mut conn.host, args.host.as_ref());
    override_option(&mut conn.port, args.port.as_ref());
    override_option(&mut conn.user, args.user.as_ref());
    override_option(&mut conn.password, args.password.as_ref());
    override_option(&mut conn.database, args.database.as_ref());

    // A table or query given on the command line replaces the file's choice
    if args.table.is_some() || args.query.is_some() {
        query.table.clone_from(&args.table);
        query.query.clone_from(&args.query);
    }

    config.query = Some(query);
    Ok(())
}
