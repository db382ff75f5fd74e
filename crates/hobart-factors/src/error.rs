//! Error types for factor computations.

use thiserror::Error;

/// Result type for factor operations.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors that can occur during factor computation.
#[derive(Debug, Error)]
pub enum FactorError {
    /// A signal provider failed unexpectedly while fetching a value.
    #[error("Provider failure for {symbol}: {reason}")]
    Provider {
        /// Symbol that was queried
        symbol: String,
        /// Description of the failure
        reason: String,
    },

    /// Factor weight is negative or not finite
    #[error("Invalid weight for {factor}: {weight}")]
    InvalidWeight {
        /// Factor name
        factor: String,
        /// Offending weight
        weight: f64,
    },

    /// Invalid factor configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Factor not found in registry
    #[error("Factor not found: {0}")]
    NotFound(String),

    /// Metric name not recognized
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

impl FactorError {
    /// Build a provider failure for `symbol`.
    pub fn provider(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Provider {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}
