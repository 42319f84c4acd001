//! Run report types

use crate::error::Error;
use crate::output::WrittenFile;
use crate::schema::CanonicalSchema;
use serde::Serialize;

/// Result of converting one source
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    /// Source name (input path or query name)
    pub source: String,
    /// Schema every output file of this source carries
    pub schema: CanonicalSchema,
    /// Finalized output files, in write order
    pub outputs: Vec<WrittenFile>,
    /// Total rows written
    pub rows: usize,
    /// Chunks read from the source
    pub chunks: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SourceReport {
    /// Create an empty report for a resolved source
    pub fn new(source: impl Into<String>, schema: CanonicalSchema) -> Self {
        Self {
            source: source.into(),
            schema,
            outputs: Vec::new(),
            rows: 0,
            chunks: 0,
            duration_ms: 0,
        }
    }

    /// Record one written chunk
    pub fn add_chunk(&mut self, rows: usize) {
        self.chunks += 1;
        self.rows += rows;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Final status of one source in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// One source's outcome: a report or the error that aborted it
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub source: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SourceReport>,
}

impl SourceOutcome {
    /// Successful outcome
    pub fn succeeded(report: SourceReport) -> Self {
        Self {
            source: report.source.clone(),
            status: OutcomeStatus::Succeeded,
            error_kind: None,
            error: None,
            report: Some(report),
        }
    }

    /// Failed outcome
    pub fn failed(source: impl Into<String>, error: &Error) -> Self {
        Self {
            source: source.into(),
            status: OutcomeStatus::Failed,
            error_kind: Some(error.kind()),
            error: Some(error.to_string()),
            report: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == OutcomeStatus::Failed
    }
}

/// Outcomes of every source in a run, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub sources: Vec<SourceOutcome>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: SourceOutcome) {
        self.sources.push(outcome);
    }

    /// Outcomes that ended in an error
    pub fn failed(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.sources.iter().filter(|o| o.is_failed())
    }

    /// Whether any source failed
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Rows written across all successful sources
    pub fn total_rows(&self) -> usize {
        self.sources
            .iter()
            .filter_map(|o| o.report.as_ref())
            .map(|r| r.rows)
            .sum()
    }
}
