//! Chunk coercion
//!
//! Turns a source batch into a batch whose schema is exactly the resolved
//! canonical schema, casting each column in place order.

use crate::error::{Error, Result};
use crate::schema::{CanonicalSchema, CanonicalType};
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use arrow::util::display::FormatOptions;
use std::sync::Arc;

/// Casts source batches to one canonical schema
#[derive(Debug, Clone)]
pub struct ChunkCoercer {
    schema: CanonicalSchema,
    options: CastOptions<'static>,
}

impl ChunkCoercer {
    /// Create a coercer bound to `schema`
    pub fn new(schema: CanonicalSchema) -> Self {
        Self {
            schema,
            // Unrepresentable values are errors, never silent nulls
            options: CastOptions {
                safe: false,
                format_options: FormatOptions::default(),
            },
        }
    }

    /// The schema every coerced batch carries
    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    /// Coerce one batch.
    ///
    /// The batch must have the schema's column count and names in the same
    /// order; anything else is a `SchemaMismatch`. The input is not modified.
    pub fn coerce(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let source_schema = batch.schema();
        let columns = self.schema.columns();

        if source_schema.fields().len() != columns.len() {
            return Err(Error::schema_mismatch(format!(
                "batch has {} columns, schema has {}",
                source_schema.fields().len(),
                columns.len()
            )));
        }

        let mut arrays = Vec::with_capacity(columns.len());
        for (position, (field, column)) in source_schema.fields().iter().zip(columns).enumerate() {
            if field.name() != &column.name {
                return Err(Error::schema_mismatch(format!(
                    "column {position} is '{}', expected '{}'",
                    field.name(),
                    column.name
                )));
            }

            let array = self
                .cast_column(batch.column(position), column.data_type)
                .map_err(|e| {
                    Error::schema_mismatch(format!(
                        "column '{}' cannot be coerced from {} to {}: {e}",
                        column.name,
                        field.data_type(),
                        column.data_type
                    ))
                })?;
            arrays.push(array);
        }

        Ok(RecordBatch::try_new(self.schema.arrow_schema(), arrays)?)
    }

    fn cast_column(&self, array: &ArrayRef, target: CanonicalType) -> Result<ArrayRef> {
        let target_type = target.to_arrow();
        if array.data_type() == &target_type {
            return Ok(Arc::clone(array));
        }

        match (array.data_type(), target) {
            (DataType::Utf8, CanonicalType::Utf8 | CanonicalType::Binary) => {
                Ok(cast_with_options(array, &target_type, &self.options)?)
            }
            (DataType::Utf8, _) => {
                let normalized = blank_to_null(array);
                Ok(cast_with_options(&normalized, &target_type, &self.options)?)
            }
            // No direct decimal → boolean cast; go through integers
            (DataType::Decimal128(_, _) | DataType::Decimal256(_, _), CanonicalType::Boolean) => {
                let integers = cast_with_options(array, &DataType::Int64, &self.options)?;
                Ok(cast_with_options(&integers, &target_type, &self.options)?)
            }
            _ => Ok(cast_with_options(array, &target_type, &self.options)?),
        }
    }
}

/// Trim text values and turn blanks into nulls before a non-text cast
fn blank_to_null(array: &ArrayRef) -> ArrayRef {
    match array.as_any().downcast_ref::<StringArray>() {
        Some(strings) => {
            let trimmed: StringArray = strings
                .iter()
                .map(|value| value.map(str::trim).filter(|v| !v.is_empty()))
                .collect();
            Arc::new(trimmed)
        }
        None => Arc::clone(array),
    }
}
