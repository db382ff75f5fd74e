//! Market-risk factor
//!
//! Negated beta against the market benchmark: defensive, low-beta stocks score
//! higher.

use crate::factor::{Factor, FactorConfig, FactorId, SignalSpec, StyleFactor, Transform};
use crate::signal::Metric;

const SIGNALS: [SignalSpec; 1] = [SignalSpec::new(Metric::Beta, Transform::Negate)];

/// Low-beta factor
#[derive(Debug, Default)]
pub struct MarketRiskFactor {
    config: FactorConfig,
}

impl Factor for MarketRiskFactor {
    fn id(&self) -> FactorId {
        FactorId::MarketRisk
    }

    fn signals(&self) -> &[SignalSpec] {
        &SIGNALS
    }

    fn winsor_limit(&self) -> f64 {
        self.config.winsor_limit
    }
}

impl StyleFactor for MarketRiskFactor {
    type Config = FactorConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
