//! Quality factor - profitability and balance sheet strength
//!
//! Averages return on equity, gross profitability and profit margin with
//! negated leverage. Profitable, lightly levered companies score higher.

use crate::factor::{Factor, FactorConfig, FactorId, SignalSpec, StyleFactor, Transform};
use crate::signal::Metric;

const SIGNALS: [SignalSpec; 4] = [
    SignalSpec::new(Metric::ReturnOnEquity, Transform::Identity),
    SignalSpec::new(Metric::GrossProfitability, Transform::Identity),
    SignalSpec::new(Metric::ProfitMargin, Transform::Identity),
    SignalSpec::new(Metric::Leverage, Transform::Negate),
];

/// Composite quality factor
#[derive(Debug, Default)]
pub struct QualityFactor {
    config: FactorConfig,
}

impl Factor for QualityFactor {
    fn id(&self) -> FactorId {
        FactorId::Quality
    }

    fn signals(&self) -> &[SignalSpec] {
        &SIGNALS
    }

    fn winsor_limit(&self) -> f64 {
        self.config.winsor_limit
    }
}

impl StyleFactor for QualityFactor {
    type Config = FactorConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
