//! Canonical schema types
//!
//! The closed set of column types every output file may use, the schema
//! built from them, and the descriptors sources report about their columns.

use crate::error::{Error, Result};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

// ============================================================================
// Canonical Type
// ============================================================================

/// Column type allowed in an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    Boolean,
    Int64,
    Float64,
    Utf8,
    Binary,
    /// Millisecond precision, no timezone
    TimestampMs,
}

impl CanonicalType {
    /// Arrow type used to store this column
    pub fn to_arrow(self) -> DataType {
        match self {
            CanonicalType::Boolean => DataType::Boolean,
            CanonicalType::Int64 => DataType::Int64,
            CanonicalType::Float64 => DataType::Float64,
            CanonicalType::Utf8 => DataType::Utf8,
            CanonicalType::Binary => DataType::Binary,
            CanonicalType::TimestampMs => DataType::Timestamp(TimeUnit::Millisecond, None),
        }
    }

    /// Convert a self-describing Arrow type to its canonical type.
    ///
    /// Used for source batches whose in-memory representation already
    /// carries types. Nested, interval and time-of-day types have no
    /// canonical counterpart.
    pub fn from_arrow(data_type: &DataType) -> Result<Self> {
        match data_type {
            DataType::Boolean => Ok(CanonicalType::Boolean),
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32 => Ok(CanonicalType::Int64),
            DataType::Float16 | DataType::Float32 | DataType::Float64 => {
                Ok(CanonicalType::Float64)
            }
            DataType::Decimal128(precision, scale) | DataType::Decimal256(precision, scale) => {
                Ok(resolve_numeric(Some(*precision), Some(*scale)))
            }
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Null => Ok(CanonicalType::Utf8),
            DataType::Binary | DataType::LargeBinary | DataType::FixedSizeBinary(_) => {
                Ok(CanonicalType::Binary)
            }
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                Ok(CanonicalType::TimestampMs)
            }
            other => Err(Error::unsupported_type(other.to_string())),
        }
    }
}

impl std::fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanonicalType::Boolean => write!(f, "boolean"),
            CanonicalType::Int64 => write!(f, "int64"),
            CanonicalType::Float64 => write!(f, "float64"),
            CanonicalType::Utf8 => write!(f, "utf8"),
            CanonicalType::Binary => write!(f, "binary"),
            CanonicalType::TimestampMs => write!(f, "timestamp[ms]"),
        }
    }
}

/// Resolve an ambiguous fixed-point numeric by precision and scale.
///
/// `(1, 0)` is a flag column, any other zero-scale number is an integer, and
/// everything else (including an unknown scale) is a float. Exact decimal
/// semantics are not preserved.
pub fn resolve_numeric(precision: Option<u8>, scale: Option<i8>) -> CanonicalType {
    match (precision, scale) {
        (Some(1), Some(0)) => CanonicalType::Boolean,
        (_, Some(0)) => CanonicalType::Int64,
        _ => CanonicalType::Float64,
    }
}

// ============================================================================
// Source Descriptors
// ============================================================================

/// A source column's native type as reported by the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTypeDescriptor {
    /// Native type name, e.g. `VARCHAR2` or `DECIMAL`
    pub name: String,
    /// Numeric precision, when the source reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,
    /// Numeric scale, when the source reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i8>,
}

impl SourceTypeDescriptor {
    /// Descriptor without numeric arguments
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            precision: None,
            scale: None,
        }
    }

    /// Descriptor for a fixed-point numeric
    pub fn numeric(name: impl Into<String>, precision: u8, scale: i8) -> Self {
        Self {
            name: name.into(),
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    /// Parse a SQL type string such as `DECIMAL(5,2)` or `VARCHAR`.
    ///
    /// Numeric arguments become precision/scale. Other parenthesised
    /// content (`STRUCT(a INTEGER)`) is dropped, leaving only the base name.
    pub fn parse(type_string: &str) -> Self {
        let type_string = type_string.trim();
        let Some(open) = type_string.find('(') else {
            return Self::new(type_string);
        };

        let name = type_string[..open].trim();
        let args = type_string[open + 1..].trim_end_matches(')');
        let numbers: Vec<&str> = args.split(',').map(str::trim).collect();

        let precision = numbers.first().and_then(|p| p.parse::<u8>().ok());
        let scale = numbers.get(1).and_then(|s| s.parse::<i8>().ok());

        match precision {
            Some(_) => Self {
                name: name.to_string(),
                precision,
                scale: scale.or(Some(0)),
            },
            None => Self::new(name),
        }
    }
}

impl std::fmt::Display for SourceTypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.precision, self.scale) {
            (Some(p), Some(s)) => write!(f, "{}({p},{s})", self.name),
            (Some(p), None) => write!(f, "{}({p})", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}

/// One entry of a source's column catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub source_type: SourceTypeDescriptor,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, source_type: SourceTypeDescriptor) -> Self {
        Self {
            name: name.into(),
            source_type,
        }
    }
}

// ============================================================================
// Canonical Schema
// ============================================================================

/// A named, typed output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalColumn {
    pub name: String,
    pub data_type: CanonicalType,
}

/// Ordered, immutable output schema.
///
/// Column names are unique and the order is fixed at construction. Clones
/// share the same underlying columns and Arrow schema.
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    columns: Arc<[CanonicalColumn]>,
    arrow: SchemaRef,
}

impl CanonicalSchema {
    /// Build a schema from ordered `(name, type)` pairs
    pub fn try_new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, CanonicalType)>,
        S: Into<String>,
    {
        let columns: Vec<CanonicalColumn> = columns
            .into_iter()
            .map(|(name, data_type)| CanonicalColumn {
                name: name.into(),
                data_type,
            })
            .collect();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        let fields: Vec<Field> = columns
            .iter()
            .map(|c| Field::new(&c.name, c.data_type.to_arrow(), true))
            .collect();

        Ok(Self {
            columns: columns.into(),
            arrow: Arc::new(Schema::new(fields)),
        })
    }

    /// Columns in output order
    pub fn columns(&self) -> &[CanonicalColumn] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Arrow schema every coerced batch carries
    pub fn arrow_schema(&self) -> SchemaRef {
        Arc::clone(&self.arrow)
    }

    /// True when `schema` has exactly these column names and types, in order
    pub fn matches(&self, schema: &Schema) -> bool {
        schema.fields().len() == self.columns.len()
            && schema
                .fields()
                .iter()
                .zip(self.columns.iter())
                .all(|(field, column)| {
                    field.name() == &column.name && field.data_type() == &column.data_type.to_arrow()
                })
    }
}

impl PartialEq for CanonicalSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for CanonicalSchema {}

impl Serialize for CanonicalSchema {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.columns().serialize(serializer)
    }
}

impl std::fmt::Display for CanonicalSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", column.name, column.data_type)?;
        }
        write!(f, "]")
    }
}
