//! Table error types

use thiserror::Error;

/// Errors raised while loading table rows
#[derive(Error, Debug)]
pub enum TableError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Input held no columns at all
    #[error("Table has no columns")]
    Empty,
}

/// Result type alias for table operations
pub type TableResult<T> = Result<T, TableError>;
