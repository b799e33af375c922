//! Error types for dataset conversion

use thiserror::Error;

/// Errors raised while resolving, reading, converting or writing a dataset
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Wrong or missing input for the selected conversion, or an unknown label.
    ///
    /// The message is user-facing and displayed as-is.
    #[error("{0}")]
    InvalidInput(String),

    /// HTTP fetch of a remote file failed (network error or non-2xx status)
    #[error("Failed to fetch remote file: {0}")]
    RemoteFetch(String),

    /// Reading a source format failed
    #[error("Read error: {0}")]
    ReadError(String),

    /// Writing an output format failed
    #[error("Write error: {0}")]
    WriteError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Shorthand for [`ConvertError::InvalidInput`]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ConvertError::InvalidInput(message.into())
    }

    /// True for failures caused by the request itself rather than the data
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ConvertError::InvalidInput(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConvertError>;
