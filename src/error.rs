//! Error types for the metabfilter library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Missing required group label '{0}' in sample groupings")]
    MissingGroup(String),

    #[error("Duplicate entry for sample '{0}' in sample groupings")]
    DuplicateSample(String),

    #[error("Sample mismatch: {0}")]
    SampleMismatch(String),

    #[error("Empty data: {0}")]
    EmptyData(String),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, FilterError>;
