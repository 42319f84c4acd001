//! Canonical schema module
//!
//! Types, type mapping, and schema resolution.
//!
//! # Overview
//!
//! - [`CanonicalType`] / [`CanonicalSchema`]: the closed type set of output files
//! - [`TypeMap`]: source type names → canonical types
//! - [`resolve_from_sample`]: infer from a source's first batch
//! - [`resolve_from_catalog`]: map a source's column metadata

mod inference;
mod mapping;
mod resolver;
mod types;

pub use inference::{classify_value, infer_text_column, merge_kinds, ValueKind};
pub use mapping::TypeMap;
pub use resolver::{resolve_from_catalog, resolve_from_sample};
pub use types::{
    resolve_numeric, CanonicalColumn, CanonicalSchema, CanonicalType, ColumnDescriptor,
    SourceTypeDescriptor,
};

#[cfg(test)]
mod tests;
