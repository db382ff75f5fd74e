//! Value factor - measures of relative cheapness
//!
//! Averages four yield-style ratios: book-to-market, earnings-to-price,
//! cash-flow-to-price and sales-to-price. Higher ratios mean cheaper stocks and
//! score higher.

use crate::factor::{Factor, FactorConfig, FactorId, SignalSpec, StyleFactor, Transform};
use crate::signal::Metric;

const SIGNALS: [SignalSpec; 4] = [
    SignalSpec::new(Metric::BookToMarket, Transform::Identity),
    SignalSpec::new(Metric::EarningsToPrice, Transform::Identity),
    SignalSpec::new(Metric::CashflowToPrice, Transform::Identity),
    SignalSpec::new(Metric::SalesToPrice, Transform::Identity),
];

/// Composite value factor
#[derive(Debug, Default)]
pub struct ValueFactor {
    config: FactorConfig,
}

impl Factor for ValueFactor {
    fn id(&self) -> FactorId {
        FactorId::Value
    }

    fn signals(&self) -> &[SignalSpec] {
        &SIGNALS
    }

    fn winsor_limit(&self) -> f64 {
        self.config.winsor_limit
    }
}

impl StyleFactor for ValueFactor {
    type Config = FactorConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}
