//! Common types used throughout table-to-parquet
//!
//! This module contains shared type definitions used by the
//! configuration, CLI and output layers.

use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use serde::{Deserialize, Serialize};

// ============================================================================
// Compression Codec
// ============================================================================

/// Compression codec applied to every Parquet file of a run
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    /// No compression
    Uncompressed,
    /// Snappy (fast, moderate ratio)
    #[default]
    Snappy,
    /// GZIP at the default level
    Gzip,
    /// ZSTD at the default level
    Zstd,
    /// LZ4 raw
    Lz4,
}

impl From<CompressionCodec> for Compression {
    fn from(codec: CompressionCodec) -> Self {
        match codec {
            CompressionCodec::Uncompressed => Compression::UNCOMPRESSED,
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Gzip => Compression::GZIP(GzipLevel::default()),
            CompressionCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionCodec::Lz4 => Compression::LZ4_RAW,
        }
    }
}

impl std::fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionCodec::Uncompressed => write!(f, "uncompressed"),
            CompressionCodec::Snappy => write!(f, "snappy"),
            CompressionCodec::Gzip => write!(f, "gzip"),
            CompressionCodec::Zstd => write!(f, "zstd"),
            CompressionCodec::Lz4 => write!(f, "lz4"),
        }
    }
}

// ============================================================================
// Database Engine
// ============================================================================

/// Database engines reachable through DuckDB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseKind {
    /// PostgreSQL
    Postgres,
    /// MySQL
    Mysql,
    /// SQLite
    Sqlite,
    /// DuckDB (native)
    Duckdb,
}

impl std::fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseKind::Postgres => write!(f, "postgres"),
            DatabaseKind::Mysql => write!(f, "mysql"),
            DatabaseKind::Sqlite => write!(f, "sqlite"),
            DatabaseKind::Duckdb => write!(f, "duckdb"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_default_is_snappy() {
        assert_eq!(CompressionCodec::default(), CompressionCodec::Snappy);
        assert_eq!(
            Compression::from(CompressionCodec::default()),
            Compression::SNAPPY
        );
    }

    #[test]
    fn test_compression_serde_names() {
        let codec: CompressionCodec = serde_yaml::from_str("zstd").unwrap();
        assert_eq!(codec, CompressionCodec::Zstd);
        assert_eq!(codec.to_string(), "zstd");
    }

    #[test]
    fn test_database_kind_display() {
        assert_eq!(DatabaseKind::Postgres.to_string(), "postgres");
        let kind: DatabaseKind = serde_yaml::from_str("sqlite").unwrap();
        assert_eq!(kind, DatabaseKind::Sqlite);
    }
}
