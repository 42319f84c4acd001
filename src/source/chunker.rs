//! Re-chunking of upstream batches
//!
//! Upstream readers produce batches of whatever size suits them. The
//! pipeline works in chunks of a fixed row count, so batches are collected
//! and re-sliced here.

use crate::error::Result;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;

/// Collects batches and emits chunks of exactly `chunk_size` rows
#[derive(Debug)]
pub struct ChunkAccumulator {
    chunk_size: usize,
    schema: SchemaRef,
    pending: Vec<RecordBatch>,
    pending_rows: usize,
}

impl ChunkAccumulator {
    /// Create an accumulator; `chunk_size` must be positive
    pub fn new(schema: SchemaRef, chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            schema,
            pending: Vec::new(),
            pending_rows: 0,
        }
    }

    /// Rows held back waiting for a full chunk
    pub fn pending_rows(&self) -> usize {
        self.pending_rows
    }

    /// Add a batch, returning every chunk that became complete
    pub fn push(&mut self, batch: RecordBatch) -> Result<Vec<RecordBatch>> {
        if batch.num_rows() == 0 {
            return Ok(Vec::new());
        }

        self.pending_rows += batch.num_rows();
        self.pending.push(batch);

        let mut ready = Vec::new();
        if self.pending_rows < self.chunk_size {
            return Ok(ready);
        }

        let combined = concat_batches(&self.schema, &self.pending)?;
        self.pending.clear();

        let mut offset = 0;
        while combined.num_rows() - offset >= self.chunk_size {
            ready.push(combined.slice(offset, self.chunk_size));
            offset += self.chunk_size;
        }

        let rest = combined.num_rows() - offset;
        if rest > 0 {
            self.pending.push(combined.slice(offset, rest));
        }
        self.pending_rows = rest;

        Ok(ready)
    }

    /// Emit the final, possibly short, chunk
    pub fn finish(mut self) -> Result<Option<RecordBatch>> {
        if self.pending_rows == 0 {
            return Ok(None);
        }
        let last = concat_batches(&self.schema, &self.pending)?;
        self.pending.clear();
        Ok(Some(last))
    }
}
