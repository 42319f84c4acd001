//! Error types for table-to-parquet
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for table-to-parquet
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to serialize JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Schema Errors
    // ============================================================================
    #[error(
        "Unsupported source type '{type_name}'{}",
        .column.as_deref().map(|c| format!(" for column '{c}'")).unwrap_or_default()
    )]
    UnsupportedType {
        type_name: String,
        column: Option<String>,
    },

    #[error("Schema mismatch: {message}")]
    SchemaMismatch { message: String },

    #[error("Duplicate column name: {column}")]
    DuplicateColumn { column: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Failed to read source '{source_name}': {message}")]
    SourceRead {
        source_name: String,
        message: String,
    },

    #[error("Database error: {message}")]
    Database { message: String },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Destination '{path}' is not writable: {message}")]
    DestinationUnwritable { path: String, message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("Cannot {operation} a writer that is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported type error not yet tied to a column
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
            column: None,
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create a source read error
    pub fn source_read(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create a destination error
    pub fn destination(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DestinationUnwritable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Attach a column name to an `UnsupportedType` error; other errors pass through
    #[must_use]
    pub fn for_column(self, name: &str) -> Self {
        match self {
            Self::UnsupportedType { type_name, .. } => Self::UnsupportedType {
                type_name,
                column: Some(name.to_string()),
            },
            other => other,
        }
    }

    /// Stable, machine-readable kind used in run reports
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_) => "config",
            Error::JsonParse(_) => "serialization",
            Error::UnsupportedType { .. } => "unsupported_type",
            Error::SchemaMismatch { .. } | Error::DuplicateColumn { .. } => "schema_mismatch",
            Error::SourceRead { .. } | Error::Database { .. } => "source_read",
            Error::DestinationUnwritable { .. } => "destination_unwritable",
            Error::Output { .. } => "output",
            Error::InvalidState { .. } => "invalid_state",
            Error::Arrow(_) => "arrow",
            Error::Parquet(_) => "parquet",
            Error::Io(_) => "io",
            Error::Other(_) => "other",
        }
    }
}

/// Result type alias for table-to-parquet
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
