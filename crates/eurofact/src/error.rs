//! Error types for the eurofact library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum EurofactError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV layer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A source's column count or shape does not match its configured
    /// layout variant. Fatal: raised before anything is persisted.
    #[error("Schema mismatch in source '{source_name}': {message}")]
    SchemaMismatch {
        source_name: String,
        message: String,
    },

    /// Empty file, or no header/data rows after the metadata offset.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the embedded relational store.
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for eurofact operations.
pub type Result<T> = std::result::Result<T, EurofactError>;
