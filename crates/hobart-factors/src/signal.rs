//! Signal provider contract and raw signal collection.
//!
//! A [`SignalProvider`] answers one question: what is metric `m` for symbol `s`?
//! `Ok(None)` is the ordinary "unavailable" answer. `Err` is reserved for
//! unexpected failures, and [`collect_signal`] folds those into missing values so
//! downstream averaging never has to tell the two apart.

use crate::error::{FactorError, Result};
use crate::universe::Universe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-symbol optional values for one signal or factor.
///
/// Keys are universe symbols. `None` marks an unavailable value.
pub type SignalMap = BTreeMap<String, Option<f64>>;

/// Elementary metrics a provider can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Book value over market value
    BookToMarket,
    /// Net income over market capitalization
    EarningsToPrice,
    /// Free cash flow over market capitalization
    CashflowToPrice,
    /// Revenue over market capitalization
    SalesToPrice,
    /// Market capitalization
    MarketCap,
    /// Total return from 12 months ago to 1 month ago
    #[serde(rename = "momentum_12_1")]
    Momentum12M,
    /// Total return from 6 months ago to 1 month ago
    #[serde(rename = "momentum_6_1")]
    Momentum6M,
    /// Total return from 3 months ago to 1 month ago
    #[serde(rename = "momentum_3_1")]
    Momentum3M,
    /// Annualized volatility over the last 252 sessions
    #[serde(rename = "volatility_252d")]
    Volatility252D,
    /// Annualized volatility over the last 180 sessions
    #[serde(rename = "volatility_180d")]
    Volatility180D,
    /// Return on equity
    ReturnOnEquity,
    /// Gross profit over total assets
    GrossProfitability,
    /// Net income over revenue
    ProfitMargin,
    /// Total debt over total assets
    Leverage,
    /// Beta against the market benchmark
    Beta,
}

impl Metric {
    /// Every metric, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::BookToMarket,
        Self::EarningsToPrice,
        Self::CashflowToPrice,
        Self::SalesToPrice,
        Self::MarketCap,
        Self::Momentum12M,
        Self::Momentum6M,
        Self::Momentum3M,
        Self::Volatility252D,
        Self::Volatility180D,
        Self::ReturnOnEquity,
        Self::GrossProfitability,
        Self::ProfitMargin,
        Self::Leverage,
        Self::Beta,
    ];

    /// Stable snake_case name, as used in files and APIs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BookToMarket => "book_to_market",
            Self::EarningsToPrice => "earnings_to_price",
            Self::CashflowToPrice => "cashflow_to_price",
            Self::SalesToPrice => "sales_to_price",
            Self::MarketCap => "market_cap",
            Self::Momentum12M => "momentum_12_1",
            Self::Momentum6M => "momentum_6_1",
            Self::Momentum3M => "momentum_3_1",
            Self::Volatility252D => "volatility_252d",
            Self::Volatility180D => "volatility_180d",
            Self::ReturnOnEquity => "return_on_equity",
            Self::GrossProfitability => "gross_profitability",
            Self::ProfitMargin => "profit_margin",
            Self::Leverage => "leverage",
            Self::Beta => "beta",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == needle)
            .ok_or_else(|| FactorError::UnknownMetric(s.to_string()))
    }
}

/// Source of raw per-security signals.
///
/// Implementations must return `Ok(None)` for ordinary missing data. Any caching,
/// locking or retry policy belongs to the implementation.
pub trait SignalProvider: Send + Sync {
    /// Value of `metric` for `symbol`.
    fn signal(&self, symbol: &str, metric: Metric) -> Result<Option<f64>>;

    /// Sector label for `symbol`.
    fn sector(&self, symbol: &str) -> Result<Option<String>>;
}

impl<P: SignalProvider + ?Sized> SignalProvider for &P {
    fn signal(&self, symbol: &str, metric: Metric) -> Result<Option<f64>> {
        (**self).signal(symbol, metric)
    }

    fn sector(&self, symbol: &str) -> Result<Option<String>> {
        (**self).sector(symbol)
    }
}

impl<P: SignalProvider + ?Sized> SignalProvider for Box<P> {
    fn signal(&self, symbol: &str, metric: Metric) -> Result<Option<f64>> {
        (**self).signal(symbol, metric)
    }

    fn sector(&self, symbol: &str) -> Result<Option<String>> {
        (**self).sector(symbol)
    }
}

impl<P: SignalProvider + ?Sized> SignalProvider for Arc<P> {
    fn signal(&self, symbol: &str, metric: Metric) -> Result<Option<f64>> {
        (**self).signal(symbol, metric)
    }

    fn sector(&self, symbol: &str) -> Result<Option<String>> {
        (**self).sector(symbol)
    }
}

/// Fetch one metric for every universe symbol.
///
/// `prepare` runs on each finite raw value and may reject it by returning `None`.
/// Non-finite values are unavailable, and provider errors are logged and treated
/// as unavailable for that symbol only.
pub fn collect_signal<F>(
    provider: &dyn SignalProvider,
    universe: &Universe,
    metric: Metric,
    prepare: F,
) -> SignalMap
where
    F: Fn(f64) -> Option<f64>,
{
    let mut failures = 0usize;
    let raw: SignalMap = universe
        .iter()
        .map(|symbol| {
            let value = match provider.signal(symbol, metric) {
                Ok(value) => value
                    .filter(|v| v.is_finite())
                    .and_then(&prepare)
                    .filter(|v| v.is_finite()),
                Err(err) => {
                    failures += 1;
                    warn!(%symbol, %metric, error = %err, "signal fetch failed, treating as unavailable");
                    None
                }
            };
            (symbol.clone(), value)
        })
        .collect();

    debug!(
        %metric,
        available = raw.values().filter(|v| v.is_some()).count(),
        failures,
        universe = universe.len(),
        "collected raw signal"
    );
    raw
}
