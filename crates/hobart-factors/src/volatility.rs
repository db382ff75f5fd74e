//! Low-volatility factor
//!
//! Negated annualized volatility over 252 and 180 trading sessions, so calmer
//! stocks score higher.

use crate::factor::{Factor, FactorConfig, FactorId, SignalSpec, StyleFactor, Transform};
use crate::signal::Metric;

const SIGNALS: [SignalSpec; 2] = [
    SignalSpec::new(Metric::Volatility252D, Transform::Negate),
    SignalSpec::new(Metric::Volatility180D, Transform::Negate),
];

/// Low-volatility factor
#[derive(Debug, Default)]
pub struct LowVolFactor {
    config: FactorConfig,
}

impl Factor for LowVolFactor {
    fn id(&self) -> FactorId {
        FactorId::LowVol
    }

    fn signals(&self) -> &[SignalSpec] {
        &SIGNALS
    }

    fn winsor_limit(&self) -> f64 {
        self.config.winsor_limit
    }
}

impl StyleFactor for LowVolFactor {
    type Config = FactorConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_name() {
        let factor = LowVolFactor::default();
        assert_eq!(factor.name(), "lowvol");
        assert!(factor.signals().iter().all(|s| s.transform == Transform::Negate));
    }
}
