//! Payload error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the injected dashboard payload
#[derive(Error, Debug)]
pub enum PayloadError {
    /// No payload was injected into the page
    #[error("Dashboard payload not found")]
    Missing,

    /// Payload file could not be read
    #[error("Failed to read payload {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    /// Payload is not valid JSON for the expected shape
    #[error("Invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for payload operations
pub type PayloadResult<T> = Result<T, PayloadError>;
