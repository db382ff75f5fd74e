//! Engine configuration.

use crate::ranking::FactorWeights;
use hobart_factors::{DEFAULT_WINSOR_LIMIT, FactorError, build_factors};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while configuring or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Factor computation error
    #[error(transparent)]
    Factor(#[from] FactorError),
}

/// Engine settings, loadable from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Winsorization width shared by every factor (default: 3.0)
    pub winsor_limit: f64,
    /// Market caps below this are unavailable to the size factor (default: None)
    pub min_market_cap: Option<f64>,
    /// Default factor weights
    pub weights: FactorWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            winsor_limit: DEFAULT_WINSOR_LIMIT,
            min_market_cap: None,
            weights: FactorWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Check the clipping width, market cap floor and default weights.
    pub fn validate(&self) -> Result<()> {
        build_factors(self.winsor_limit, self.min_market_cap)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        self.weights.validate()?;
        Ok(())
    }
}
