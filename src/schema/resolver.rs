//! Schema resolution
//!
//! A source's canonical schema is resolved exactly once, either by sampling
//! its first batch or by mapping its column catalog.

use super::inference::{infer_text_column, observed_values};
use super::mapping::TypeMap;
use super::types::{CanonicalSchema, CanonicalType, ColumnDescriptor};
use crate::error::Result;
use arrow::array::{Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

/// Resolve a schema from the first batch of a source.
///
/// Text columns are inferred from their values; typed columns use the
/// native Arrow conversion. The result is authoritative for every later
/// batch of the same source, even if later values would infer differently.
pub fn resolve_from_sample(sample: &RecordBatch) -> Result<CanonicalSchema> {
    let schema = sample.schema();
    let mut columns = Vec::with_capacity(schema.fields().len());

    for (field, array) in schema.fields().iter().zip(sample.columns()) {
        let canonical = match field.data_type() {
            DataType::Utf8 => {
                let values = array
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .map(|values| (infer_text_column(values), observed_values(values)));
                match values {
                    Some((canonical, observed)) => {
                        tracing::debug!(
                            column = %field.name(),
                            observed,
                            inferred = %canonical,
                            "Inferred column type from sample"
                        );
                        canonical
                    }
                    None => CanonicalType::Utf8,
                }
            }
            other => CanonicalType::from_arrow(other).map_err(|e| e.for_column(field.name()))?,
        };
        columns.push((field.name().clone(), canonical));
    }

    CanonicalSchema::try_new(columns)
}

/// Resolve a schema by mapping a source's column catalog.
///
/// Fails on the first column whose type has no mapping.
pub fn resolve_from_catalog(
    catalog: &[ColumnDescriptor],
    type_map: &TypeMap,
) -> Result<CanonicalSchema> {
    let columns = catalog
        .iter()
        .map(|column| {
            let canonical = type_map
                .map(&column.source_type)
                .map_err(|e| e.for_column(&column.name))?;
            tracing::debug!(
                column = %column.name,
                source_type = %column.source_type,
                canonical = %canonical,
                "Mapped catalog column"
            );
            Ok((column.name.clone(), canonical))
        })
        .collect::<Result<Vec<_>>>()?;

    CanonicalSchema::try_new(columns)
}
