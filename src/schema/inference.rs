//! Type inference for text columns
//!
//! Delimited text arrives as strings. Each column's canonical type is
//! inferred from the values of the sampled batch using a widening rule:
//! integers and floats widen to float, any other disagreement widens to
//! text, and a column with no values at all is text.

use super::types::CanonicalType;
use arrow::array::{Array, StringArray};
use arrow::compute::kernels::cast_utils::string_to_datetime;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

static INTEGER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

static FLOAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$").unwrap()
});

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}:\d{2}(\.\d{1,9})?)?(Z|[+-]\d{2}:?\d{2})?$")
        .unwrap()
});

/// Kind of a single text value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Boolean,
    Integer,
    Float,
    Timestamp,
    Text,
}

/// Classify one non-empty, trimmed value
pub fn classify_value(value: &str) -> ValueKind {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return ValueKind::Boolean;
    }

    if INTEGER_REGEX.is_match(value) {
        // Integers outside i64 are kept as floats rather than text
        return if value.parse::<i64>().is_ok() {
            ValueKind::Integer
        } else {
            ValueKind::Float
        };
    }

    if FLOAT_REGEX.is_match(value) {
        return ValueKind::Float;
    }

    // Shape alone admits dates like 2024-02-30, which the cast rejects
    if TIMESTAMP_REGEX.is_match(value) && string_to_datetime(&Utc, value).is_ok() {
        return ValueKind::Timestamp;
    }

    ValueKind::Text
}

/// Widen two kinds to one that can hold both
pub fn merge_kinds(a: ValueKind, b: ValueKind) -> ValueKind {
    match (a, b) {
        (a, b) if a == b => a,
        (ValueKind::Integer, ValueKind::Float) | (ValueKind::Float, ValueKind::Integer) => {
            ValueKind::Float
        }
        _ => ValueKind::Text,
    }
}

impl From<ValueKind> for CanonicalType {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => CanonicalType::Boolean,
            ValueKind::Integer => CanonicalType::Int64,
            ValueKind::Float => CanonicalType::Float64,
            ValueKind::Timestamp => CanonicalType::TimestampMs,
            ValueKind::Text => CanonicalType::Utf8,
        }
    }
}

/// Infer a column's canonical type from its values.
///
/// Nulls and blank strings carry no type information.
pub fn infer_text_column(values: &StringArray) -> CanonicalType {
    let mut inferred: Option<ValueKind> = None;

    for value in values.iter().flatten() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let kind = classify_value(value);
        let merged = match inferred {
            Some(existing) => merge_kinds(existing, kind),
            None => kind,
        };

        // Text absorbs everything, no need to look further
        if merged == ValueKind::Text {
            return CanonicalType::Utf8;
        }
        inferred = Some(merged);
    }

    inferred.map_or(CanonicalType::Utf8, CanonicalType::from)
}

/// Number of non-blank values, for logging
pub fn observed_values(values: &StringArray) -> usize {
    values.len() - values.null_count()
        - values
            .iter()
            .flatten()
            .filter(|v| v.trim().is_empty())
            .count()
}
