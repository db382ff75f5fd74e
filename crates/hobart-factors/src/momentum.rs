//! Momentum factor
//!
//! Averages 12-1, 6-1 and 3-1 month total returns. The most recent month is
//! skipped in every horizon to avoid short-term reversal.

use crate::factor::{Factor, FactorConfig, FactorId, SignalSpec, StyleFactor, Transform};
use crate::signal::Metric;

const SIGNALS: [SignalSpec; 3] = [
    SignalSpec::new(Metric::Momentum12M, Transform::Identity),
    SignalSpec::new(Metric::Momentum6M, Transform::Identity),
    SignalSpec::new(Metric::Momentum3M, Transform::Identity),
];

/// Price momentum factor
#[derive(Debug, Default)]
pub struct MomentumFactor {
    config: FactorConfig,
}

impl Factor for MomentumFactor {
    fn id(&self) -> FactorId {
        FactorId::Momentum
    }

    fn signals(&self) -> &[SignalSpec] {
        &SIGNALS
    }

    fn winsor_limit(&self) -> f64 {
        self.config.winsor_limit
    }
}

impl StyleFactor for MomentumFactor {
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
    fn test_horizons() {
        let factor = MomentumFactor::default();
        let metrics: Vec<Metric> = factor.signals().iter().map(|s| s.metric).collect();
        assert_eq!(
            metrics,
            [Metric::Momentum12M, Metric::Momentum6M, Metric::Momentum3M]
        );
    }
}
