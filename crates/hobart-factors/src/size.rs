//! Size factor
//!
//! Scores `-ln(market_cap)`, so smaller companies score higher. Non-positive or
//! missing market caps are unavailable.

use crate::error::{FactorError, Result};
use crate::factor::{Factor, FactorId, SignalSpec, StyleFactor, Transform};
use crate::signal::Metric;
use crate::winsorize::{DEFAULT_WINSOR_LIMIT, validate_limit};
use serde::{Deserialize, Serialize};

const SIGNALS: [SignalSpec; 1] = [SignalSpec::new(Metric::MarketCap, Transform::NegativeLog)];

/// Configuration for the size factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    /// Winsorization width in standard deviations (default: 3.0)
    pub winsor_limit: f64,
    /// Market caps below this are treated as unavailable (default: None)
    pub min_market_cap: Option<f64>,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            winsor_limit: DEFAULT_WINSOR_LIMIT,
            min_market_cap: None,
        }
    }
}

impl SizeConfig {
    /// Validate the clipping width and market cap floor.
    pub fn validate(&self) -> Result<()> {
        validate_limit(self.winsor_limit)?;
        match self.min_market_cap {
            Some(floor) if !floor.is_finite() || floor < 0.0 => Err(FactorError::InvalidConfig(
                format!("min_market_cap must be finite and non-negative, got {floor}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Small-cap factor on log market capitalization
#[derive(Debug, Default)]
pub struct SizeFactor {
    config: SizeConfig,
}

impl Factor for SizeFactor {
    fn id(&self) -> FactorId {
        FactorId::Size
    }

    fn signals(&self) -> &[SignalSpec] {
        &SIGNALS
    }

    fn winsor_limit(&self) -> f64 {
        self.config.winsor_limit
    }

    fn prepare(&self, spec: &SignalSpec, raw: f64) -> Option<f64> {
        if let Some(floor) = self.config.min_market_cap
            && raw < floor
        {
            return None;
        }
        spec.transform.apply(raw)
    }
}

impl StyleFactor for SizeFactor {
    type Config = SizeConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
