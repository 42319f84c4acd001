//! Source type → canonical type mapping
//!
//! A [`TypeMap`] is a plain value: build the standard table with
//! [`TypeMap::standard`], or assemble a custom one for a different catalog.

use super::types::{resolve_numeric, CanonicalType, SourceTypeDescriptor};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Lookup table from native type names to canonical types
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    /// Names with exactly one canonical type
    fixed: HashMap<String, CanonicalType>,
    /// Fixed-point names resolved by precision/scale
    numeric: HashSet<String>,
}

impl TypeMap {
    /// Create an empty map (every lookup fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// The default table, covering Oracle and DuckDB catalog names
    pub fn standard() -> Self {
        use CanonicalType::{Binary, Boolean, Float64, Int64, TimestampMs, Utf8};

        const FIXED: &[(&str, CanonicalType)] = &[
            // Large objects and raw bytes
            ("BFILE", Binary),
            ("BLOB", Binary),
            ("CLOB", Binary),
            ("NCLOB", Binary),
            ("RAW", Binary),
            ("LONG RAW", Binary),
            ("BYTEA", Binary),
            ("VARBINARY", Binary),
            // Character data
            ("CHAR", Utf8),
            ("NCHAR", Utf8),
            ("VARCHAR", Utf8),
            ("VARCHAR2", Utf8),
            ("NVARCHAR2", Utf8),
            ("LONG", Utf8),
            ("ROWID", Utf8),
            ("TEXT", Utf8),
            ("UUID", Utf8),
            // Floating point
            ("BINARY_FLOAT", Float64),
            ("BINARY_DOUBLE", Float64),
            ("FLOAT", Float64),
            ("DOUBLE", Float64),
            ("REAL", Float64),
            // Integers
            ("TINYINT", Int64),
            ("SMALLINT", Int64),
            ("INTEGER", Int64),
            ("BIGINT", Int64),
            ("UTINYINT", Int64),
            ("USMALLINT", Int64),
            ("UINTEGER", Int64),
            ("BOOLEAN", Boolean),
            // Dates and timestamps, every precision and zone variant
            ("DATE", TimestampMs),
            ("TIMESTAMP", TimestampMs),
            ("TIMESTAMP WITH TIME ZONE", TimestampMs),
            ("TIMESTAMP WITH LOCAL TIME ZONE", TimestampMs),
            ("TIMESTAMP_S", TimestampMs),
            ("TIMESTAMP_MS", TimestampMs),
            ("TIMESTAMP_NS", TimestampMs),
        ];

        FIXED
            .iter()
            .fold(Self::new(), |map, (name, ty)| map.with_fixed(name, *ty))
            .with_numeric("NUMBER")
            .with_numeric("DECIMAL")
            .with_numeric("NUMERIC")
    }

    /// Register a name with a single canonical type
    #[must_use]
    pub fn with_fixed(mut self, name: &str, canonical: CanonicalType) -> Self {
        let key = normalize(name);
        self.numeric.remove(&key);
        self.fixed.insert(key, canonical);
        self
    }

    /// Register a fixed-point name resolved by precision and scale
    #[must_use]
    pub fn with_numeric(mut self, name: &str) -> Self {
        let key = normalize(name);
        self.fixed.remove(&key);
        self.numeric.insert(key);
        self
    }

    /// Whether the map has an entry for this name
    pub fn contains(&self, name: &str) -> bool {
        let key = normalize(name);
        self.fixed.contains_key(&key) || self.numeric.contains(&key)
    }

    /// Map a source descriptor to its canonical type.
    ///
    /// Fails with `UnsupportedType` when the name has no entry; columns are
    /// never dropped or defaulted.
    pub fn map(&self, descriptor: &SourceTypeDescriptor) -> Result<CanonicalType> {
        let key = normalize(&descriptor.name);

        if self.numeric.contains(&key) {
            return Ok(resolve_numeric(descriptor.precision, descriptor.scale));
        }

        self.fixed
            .get(&key)
            .copied()
            .ok_or_else(|| Error::unsupported_type(descriptor.to_string()))
    }
}

/// Uppercase with single spaces, so `timestamp  with time zone` matches
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
