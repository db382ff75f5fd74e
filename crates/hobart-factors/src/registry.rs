//! Factor Registry
//!
//! Central registry of the six factor families. Allows lookup of factor
//! metadata by name and builds the factor set used by the ranking engine.

use crate::error::Result;
use crate::factor::{Factor, FactorConfig, FactorId, StyleFactor};
use crate::market_risk::MarketRiskFactor;
use crate::momentum::MomentumFactor;
use crate::quality::QualityFactor;
use crate::signal::Metric;
use crate::size::{SizeConfig, SizeFactor};
use crate::value::ValueFactor;
use crate::volatility::LowVolFactor;
use serde::Serialize;

/// Factor metadata
#[derive(Debug, Clone, Serialize)]
pub struct FactorInfo {
    /// Factor identifier
    pub id: FactorId,
    /// Factor name
    pub name: &'static str,
    /// Brief description of what the factor measures
    pub description: &'static str,
    /// Elementary metrics averaged into the factor
    pub signals: &'static [Metric],
}

/// Get all factor info, in canonical order
pub fn available_factors() -> Vec<FactorInfo> {
    vec![
        FactorInfo {
            id: FactorId::Value,
            name: "value",
            description: "Cheapness: book, earnings, cash flow and sales yields",
            signals: &[
                Metric::BookToMarket,
                Metric::EarningsToPrice,
                Metric::CashflowToPrice,
                Metric::SalesToPrice,
            ],
        },
        FactorInfo {
            id: FactorId::Size,
            name: "size",
            description: "Small capitalization: negative log market cap",
            signals: &[Metric::MarketCap],
        },
        FactorInfo {
            id: FactorId::Momentum,
            name: "momentum",
            description: "Trailing 12-1, 6-1 and 3-1 month returns",
            signals: &[Metric::Momentum12M, Metric::Momentum6M, Metric::Momentum3M],
        },
        FactorInfo {
            id: FactorId::LowVol,
            name: "lowvol",
            description: "Low realized volatility over 252 and 180 sessions",
            signals: &[Metric::Volatility252D, Metric::Volatility180D],
        },
        FactorInfo {
            id: FactorId::Quality,
            name: "quality",
            description: "Profitability and low leverage",
            signals: &[
                Metric::ReturnOnEquity,
                Metric::GrossProfitability,
                Metric::ProfitMargin,
                Metric::Leverage,
            ],
        },
        FactorInfo {
            id: FactorId::MarketRisk,
            name: "market_risk",
            description: "Low beta against the market benchmark",
            signals: &[Metric::Beta],
        },
    ]
}

/// Get factor info by name
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    let id: FactorId = name.parse().ok()?;
    available_factors().into_iter().find(|f| f.id == id)
}

/// List all factor names
pub fn list_factor_names() -> Vec<&'static str> {
    available_factors().into_iter().map(|f| f.name).collect()
}

/// Build the six factors with default configuration, in canonical order.
pub fn default_factors() -> Vec<Box<dyn Factor>> {
    vec![
        Box::new(ValueFactor::default()),
        Box::new(SizeFactor::default()),
        Box::new(MomentumFactor::default()),
        Box::new(LowVolFactor::default()),
        Box::new(QualityFactor::default()),
        Box::new(MarketRiskFactor::default()),
    ]
}

/// Build the six factors sharing one clipping width, in canonical order.
///
/// `min_market_cap` only applies to the size factor.
pub fn build_factors(winsor_limit: f64, min_market_cap: Option<f64>) -> Result<Vec<Box<dyn Factor>>> {
    let config = FactorConfig { winsor_limit };
    config.validate()?;
    let size = SizeConfig {
        winsor_limit,
        min_market_cap,
    };
    size.validate()?;

    Ok(vec![
        Box::new(ValueFactor::with_config(config)),
        Box::new(SizeFactor::with_config(size)),
        Box::new(MomentumFactor::with_config(config)),
        Box::new(LowVolFactor::with_config(config)),
        Box::new(QualityFactor::with_config(config)),
        Box::new(MarketRiskFactor::with_config(config)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_factors_count() {
        assert_eq!(available_factors().len(), 6);
    }

    #[test]
    fn test_registry_matches_factor_definitions() {
        for (info, factor) in available_factors().iter().zip(default_factors()) {
            assert_eq!(info.id, factor.id());
            assert_eq!(info.name, factor.name());
            let metrics: Vec<Metric> = factor.signals().iter().map(|s| s.metric).collect();
            assert_eq!(info.signals, metrics.as_slice());
        }
    }

    #[test]
    fn test_get_factor_info() {
        let info = get_factor_info("market_risk").unwrap();
        assert_eq!(info.id, FactorId::MarketRisk);
        assert_eq!(info.signals, &[Metric::Beta]);
        assert!(get_factor_info("growth").is_none());
    }

    #[test]
    fn test_list_factor_names_canonical_order() {
        assert_eq!(
            list_factor_names(),
            ["value", "size", "momentum", "lowvol", "quality", "market_risk"]
        );
    }

    #[test]
    fn test_build_factors_validates() {
        let factors = build_factors(2.5, Some(1e6)).unwrap();
        assert_eq!(factors.len(), 6);
        assert!(factors.iter().all(|f| f.winsor_limit() == 2.5));
        assert!(build_factors(f64::NAN, None).is_err());
        assert!(build_factors(3.0, Some(-1.0)).is_err());
    }
}
