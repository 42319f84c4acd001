//! Schema module tests

use super::*;
use crate::error::Error;
use arrow::array::{
    Array, ArrayRef, BooleanArray, Decimal128Array, Int32Array, ListArray, StringArray,
};
use arrow::datatypes::{DataType, Field, Int32Type, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use test_case::test_case;

fn text_batch(columns: &[(&str, Vec<Option<&str>>)]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|(_, values)| Arc::new(StringArray::from(values.clone())) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

// ============================================================================
// Type Mapping Tests
// ============================================================================

#[test_case("BFILE", CanonicalType::Binary)]
#[test_case("BLOB", CanonicalType::Binary)]
#[test_case("CLOB", CanonicalType::Binary)]
#[test_case("NCLOB", CanonicalType::Binary)]
#[test_case("RAW", CanonicalType::Binary)]
#[test_case("LONG RAW", CanonicalType::Binary)]
#[test_case("CHAR", CanonicalType::Utf8)]
#[test_case("NCHAR", CanonicalType::Utf8)]
#[test_case("VARCHAR", CanonicalType::Utf8)]
#[test_case("VARCHAR2", CanonicalType::Utf8)]
#[test_case("NVARCHAR2", CanonicalType::Utf8)]
#[test_case("LONG", CanonicalType::Utf8)]
#[test_case("ROWID", CanonicalType::Utf8)]
#[test_case("BINARY_FLOAT", CanonicalType::Float64)]
#[test_case("BINARY_DOUBLE", CanonicalType::Float64)]
#[test_case("DOUBLE", CanonicalType::Float64)]
#[test_case("INTEGER", CanonicalType::Int64)]
#[test_case("BIGINT", CanonicalType::Int64)]
#[test_case("BOOLEAN", CanonicalType::Boolean)]
#[test_case("DATE", CanonicalType::TimestampMs)]
#[test_case("TIMESTAMP", CanonicalType::TimestampMs)]
#[test_case("TIMESTAMP WITH TIME ZONE", CanonicalType::TimestampMs)]
#[test_case("TIMESTAMP WITH LOCAL TIME ZONE", CanonicalType::TimestampMs)]
#[test_case("TIMESTAMP_NS", CanonicalType::TimestampMs)]
fn test_standard_fixed_types(name: &str, expected: CanonicalType) {
    let map = TypeMap::standard();
    let descriptor = SourceTypeDescriptor::new(name);
    assert_eq!(map.map(&descriptor).unwrap(), expected);
    // Deterministic
    assert_eq!(map.map(&descriptor).unwrap(), expected);
}

#[test_case(1, 0, CanonicalType::Boolean ; "flag")]
#[test_case(5, 0, CanonicalType::Int64 ; "integer")]
#[test_case(38, 0, CanonicalType::Int64 ; "wide integer")]
#[test_case(5, 2, CanonicalType::Float64 ; "fractional")]
#[test_case(1, 1, CanonicalType::Float64 ; "single fractional digit")]
#[test_case(10, -2, CanonicalType::Float64 ; "negative scale")]
fn test_ambiguous_numeric(precision: u8, scale: i8, expected: CanonicalType) {
    let map = TypeMap::standard();
    for name in ["NUMBER", "DECIMAL", "NUMERIC"] {
        let descriptor = SourceTypeDescriptor::numeric(name, precision, scale);
        assert_eq!(map.map(&descriptor).unwrap(), expected, "{name}");
    }
}

#[test]
fn test_unconstrained_number_is_float() {
    let map = TypeMap::standard();
    assert_eq!(
        map.map(&SourceTypeDescriptor::new("NUMBER")).unwrap(),
        CanonicalType::Float64
    );
}

#[test_case("CURSOR")]
#[test_case("OBJECT")]
#[test_case("INTERVAL")]
#[test_case("INTERVAL DAY TO SECOND")]
#[test_case("STRUCT")]
#[test_case("HUGEINT")]
#[test_case("TIME")]
fn test_unmapped_types_fail(name: &str) {
    let err = TypeMap::standard()
        .map(&SourceTypeDescriptor::new(name))
        .unwrap_err();
    match err {
        Error::UnsupportedType { type_name, column } => {
            assert_eq!(type_name, name);
            assert!(column.is_none());
        }
        other => panic!("Expected UnsupportedType, got {other:?}"),
    }
}

#[test]
fn test_lookup_is_case_and_space_insensitive() {
    let map = TypeMap::standard();
    assert_eq!(
        map.map(&SourceTypeDescriptor::new("timestamp   with time zone"))
            .unwrap(),
        CanonicalType::TimestampMs
    );
    assert_eq!(
        map.map(&SourceTypeDescriptor::new(" varchar2 ")).unwrap(),
        CanonicalType::Utf8
    );
}

#[test]
fn test_custom_map_substitutes_standard() {
    let map = TypeMap::new()
        .with_fixed("MONEY", CanonicalType::Float64)
        .with_numeric("FIXED");

    assert!(map.contains("money"));
    assert!(!map.contains("VARCHAR"));
    assert_eq!(
        map.map(&SourceTypeDescriptor::new("MONEY")).unwrap(),
        CanonicalType::Float64
    );
    assert_eq!(
        map.map(&SourceTypeDescriptor::numeric("FIXED", 1, 0))
            .unwrap(),
        CanonicalType::Boolean
    );
    assert!(map.map(&SourceTypeDescriptor::new("VARCHAR")).is_err());
}

#[test]
fn test_with_fixed_overrides_numeric() {
    let map = TypeMap::standard().with_fixed("NUMBER", CanonicalType::Float64);
    assert_eq!(
        map.map(&SourceTypeDescriptor::numeric("NUMBER", 1, 0))
            .unwrap(),
        CanonicalType::Float64
    );
}

// ============================================================================
// Descriptor Parsing Tests
// ============================================================================

#[test]
fn test_parse_descriptor() {
    assert_eq!(
        SourceTypeDescriptor::parse("DECIMAL(5,2)"),
        SourceTypeDescriptor::numeric("DECIMAL", 5, 2)
    );
    assert_eq!(
        SourceTypeDescriptor::parse("DECIMAL(18, 0)"),
        SourceTypeDescriptor::numeric("DECIMAL", 18, 0)
    );
    assert_eq!(
        SourceTypeDescriptor::parse("NUMERIC(7)"),
        SourceTypeDescriptor::numeric("NUMERIC", 7, 0)
    );
    assert_eq!(
        SourceTypeDescriptor::parse("VARCHAR"),
        SourceTypeDescriptor::new("VARCHAR")
    );
    assert_eq!(
        SourceTypeDescriptor::parse("STRUCT(a INTEGER, b VARCHAR)"),
        SourceTypeDescriptor::new("STRUCT")
    );
    assert_eq!(
        SourceTypeDescriptor::parse("TIMESTAMP WITH TIME ZONE"),
        SourceTypeDescriptor::new("TIMESTAMP WITH TIME ZONE")
    );
}

#[test]
fn test_descriptor_display() {
    assert_eq!(
        SourceTypeDescriptor::numeric("NUMBER", 5, 2).to_string(),
        "NUMBER(5,2)"
    );
    assert_eq!(SourceTypeDescriptor::new("BLOB").to_string(), "BLOB");
}

// ============================================================================
// Canonical Schema Tests
// ============================================================================

#[test]
fn test_canonical_schema_arrow_types() {
    let schema = CanonicalSchema::try_new([
        ("flag", CanonicalType::Boolean),
        ("id", CanonicalType::Int64),
        ("score", CanonicalType::Float64),
        ("name", CanonicalType::Utf8),
        ("blob", CanonicalType::Binary),
        ("ts", CanonicalType::TimestampMs),
    ])
    .unwrap();

    let arrow = schema.arrow_schema();
    let types: Vec<DataType> = arrow
        .fields()
        .iter()
        .map(|f| f.data_type().clone())
        .collect();
    assert_eq!(
        types,
        vec![
            DataType::Boolean,
            DataType::Int64,
            DataType::Float64,
            DataType::Utf8,
            DataType::Binary,
            DataType::Timestamp(TimeUnit::Millisecond, None),
        ]
    );
    assert!(arrow.fields().iter().all(|f| f.is_nullable()));
    assert!(schema.matches(&arrow));
    assert_eq!(schema.len(), 6);
    assert_eq!(
        schema.to_string(),
        "[flag: boolean, id: int64, score: float64, name: utf8, blob: binary, ts: timestamp[ms]]"
    );
}

#[test]
fn test_canonical_schema_rejects_duplicates() {
    let err = CanonicalSchema::try_new([
        ("id", CanonicalType::Int64),
        ("id", CanonicalType::Utf8),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateColumn { column } if column == "id"));
}

#[test]
fn test_canonical_schema_matches_is_order_sensitive() {
    let schema = CanonicalSchema::try_new([
        ("a", CanonicalType::Int64),
        ("b", CanonicalType::Utf8),
    ])
    .unwrap();
    let swapped = Schema::new(vec![
        Field::new("b", DataType::Utf8, true),
        Field::new("a", DataType::Int64, true),
    ]);
    let widened = Schema::new(vec![
        Field::new("a", DataType::Float64, true),
        Field::new("b", DataType::Utf8, true),
    ]);
    assert!(!schema.matches(&swapped));
    assert!(!schema.matches(&widened));
}

// ============================================================================
// Inference Tests
// ============================================================================

#[test_case("42", ValueKind::Integer)]
#[test_case("-7", ValueKind::Integer)]
#[test_case("99999999999999999999", ValueKind::Float ; "i64 overflow")]
#[test_case("3.14", ValueKind::Float)]
#[test_case("1e10", ValueKind::Float)]
#[test_case(".5", ValueKind::Float)]
#[test_case("TRUE", ValueKind::Boolean)]
#[test_case("false", ValueKind::Boolean)]
#[test_case("2024-01-15", ValueKind::Timestamp)]
#[test_case("2024-01-15 10:30:00", ValueKind::Timestamp)]
#[test_case("2024-01-15T10:30:00.123Z", ValueKind::Timestamp)]
#[test_case("2024-01-15T10:30:00+02:00", ValueKind::Timestamp)]
#[test_case("15/01/2024", ValueKind::Text)]
#[test_case("2024-02-30", ValueKind::Text)]
#[test_case("0000-00-00", ValueKind::Text)]
#[test_case("2024-01-15 25:00:00", ValueKind::Text)]
#[test_case("hello", ValueKind::Text)]
#[test_case("1,000", ValueKind::Text)]
fn test_classify_value(value: &str, expected: ValueKind) {
    assert_eq!(classify_value(value), expected);
}

#[test]
fn test_merge_kinds() {
    assert_eq!(
        merge_kinds(ValueKind::Integer, ValueKind::Float),
        ValueKind::Float
    );
    assert_eq!(
        merge_kinds(ValueKind::Timestamp, ValueKind::Timestamp),
        ValueKind::Timestamp
    );
    assert_eq!(
        merge_kinds(ValueKind::Integer, ValueKind::Boolean),
        ValueKind::Text
    );
    assert_eq!(
        merge_kinds(ValueKind::Timestamp, ValueKind::Integer),
        ValueKind::Text
    );
}

#[test]
fn test_infer_text_column() {
    let ints = StringArray::from(vec![Some("1"), None, Some(" 2 "), Some("")]);
    assert_eq!(infer_text_column(&ints), CanonicalType::Int64);

    let mixed = StringArray::from(vec!["1", "2.5"]);
    assert_eq!(infer_text_column(&mixed), CanonicalType::Float64);

    let text = StringArray::from(vec!["1", "abc", "2"]);
    assert_eq!(infer_text_column(&text), CanonicalType::Utf8);

    let empty = StringArray::from(vec![None::<&str>, Some("  ")]);
    assert_eq!(infer_text_column(&empty), CanonicalType::Utf8);
}

// ============================================================================
// Resolver Tests
// ============================================================================

#[test]
fn test_resolve_from_sample_text_columns() {
    let batch = text_batch(&[
        ("id", vec![Some("1"), Some("2"), Some("3")]),
        ("name", vec![Some("alice"), Some("bob"), None]),
        ("ts", vec![Some("2024-01-01"), Some("2024-01-02 08:00:00"), None]),
        ("active", vec![Some("true"), Some("False"), Some("TRUE")]),
        ("price", vec![Some("10"), Some("10.5"), Some("")]),
    ]);

    let schema = resolve_from_sample(&batch).unwrap();
    let expected = CanonicalSchema::try_new([
        ("id", CanonicalType::Int64),
        ("name", CanonicalType::Utf8),
        ("ts", CanonicalType::TimestampMs),
        ("active", CanonicalType::Boolean),
        ("price", CanonicalType::Float64),
    ])
    .unwrap();
    assert_eq!(schema, expected);
}

#[test]
fn test_resolve_from_sample_typed_columns() {
    let fields = vec![
        Field::new("n", DataType::Int32, true),
        Field::new("flag", DataType::Decimal128(1, 0), true),
        Field::new("ok", DataType::Boolean, true),
    ];
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![1, 2])),
        Arc::new(
            Decimal128Array::from(vec![0_i128, 1])
                .with_precision_and_scale(1, 0)
                .unwrap(),
        ),
        Arc::new(BooleanArray::from(vec![true, false])),
    ];
    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();

    let schema = resolve_from_sample(&batch).unwrap();
    let types: Vec<CanonicalType> = schema.columns().iter().map(|c| c.data_type).collect();
    assert_eq!(
        types,
        vec![
            CanonicalType::Int64,
            CanonicalType::Boolean,
            CanonicalType::Boolean
        ]
    );
}

#[test]
fn test_resolve_from_sample_rejects_nested() {
    let list = ListArray::from_iter_primitive::<Int32Type, _, _>(vec![Some(vec![Some(1)])]);
    let schema = Schema::new(vec![Field::new("tags", list.data_type().clone(), true)]);
    let batch = RecordBatch::try_new(Arc::new(schema), vec![Arc::new(list) as ArrayRef]).unwrap();

    let err = resolve_from_sample(&batch).unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedType { column: Some(ref c), .. } if c == "tags"
    ));
}

#[test]
fn test_resolve_from_catalog() {
    let catalog = vec![
        ColumnDescriptor::new("ID", SourceTypeDescriptor::numeric("NUMBER", 10, 0)),
        ColumnDescriptor::new("ACTIVE", SourceTypeDescriptor::numeric("NUMBER", 1, 0)),
        ColumnDescriptor::new("AMOUNT", SourceTypeDescriptor::numeric("NUMBER", 12, 2)),
        ColumnDescriptor::new("NAME", SourceTypeDescriptor::new("VARCHAR2")),
        ColumnDescriptor::new("CREATED", SourceTypeDescriptor::new("DATE")),
        ColumnDescriptor::new("DOC", SourceTypeDescriptor::new("BLOB")),
    ];

    let schema = resolve_from_catalog(&catalog, &TypeMap::standard()).unwrap();
    let expected = CanonicalSchema::try_new([
        ("ID", CanonicalType::Int64),
        ("ACTIVE", CanonicalType::Boolean),
        ("AMOUNT", CanonicalType::Float64),
        ("NAME", CanonicalType::Utf8),
        ("CREATED", CanonicalType::TimestampMs),
        ("DOC", CanonicalType::Binary),
    ])
    .unwrap();
    assert_eq!(schema, expected);
}

#[test]
fn test_resolve_from_catalog_names_unsupported_column() {
    let catalog = vec![
        ColumnDescriptor::new("ID", SourceTypeDescriptor::numeric("NUMBER", 10, 0)),
        ColumnDescriptor::new("CHILDREN", SourceTypeDescriptor::new("CURSOR")),
    ];

    let err = resolve_from_catalog(&catalog, &TypeMap::standard()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported source type 'CURSOR' for column 'CHILDREN'"
    );
}
