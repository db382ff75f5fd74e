//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading signals, records or universes.
#[derive(Debug, Error)]
pub enum DataError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// A required column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
}
