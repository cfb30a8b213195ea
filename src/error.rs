//! Error types for the wdbc-api crate

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, WdbcError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum WdbcError {
    #[error("Data error: {0}")]
    Data(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Download error: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Model not fitted")]
    ModelNotFitted,
}

impl From<polars::error::PolarsError> for WdbcError {
    fn from(err: polars::error::PolarsError) -> Self {
        WdbcError::Data(err.to_string())
    }
}
