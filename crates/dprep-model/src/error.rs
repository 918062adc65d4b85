//! Error types for the preparation pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::stage::Stage;

/// Errors that can occur while preparing the dataset.
#[derive(Debug, Error)]
pub enum PrepError {
    // === Configuration Errors ===
    /// Missing or malformed configuration value.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Configuration document could not be parsed.
    #[error("failed to parse configuration {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    // === File System Errors ===
    /// Input dataset not found.
    #[error("raw data not found at: {path}")]
    FileNotFound { path: PathBuf },

    /// File I/O error.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Data Errors ===
    /// A transform cannot produce a well-defined result for a column.
    #[error("{stage} stage failed on column '{column}': {reason}")]
    DataQuality {
        stage: Stage,
        column: String,
        reason: String,
    },

    /// A column required by a mutating stage is absent from the table.
    #[error("column '{column}' required by the {stage} stage is missing")]
    Schema { stage: Stage, column: String },

    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Failed to serialize a report or configuration.
    #[error("failed to serialize {what}: {message}")]
    Serialize { what: &'static str, message: String },
}

impl PrepError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn data_quality(stage: Stage, column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataQuality {
            stage,
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn schema(stage: Stage, column: impl Into<String>) -> Self {
        Self::Schema {
            stage,
            column: column.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for PrepError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;
