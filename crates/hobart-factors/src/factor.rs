//! Factor traits and the shared signal-combination pipeline.
//!
//! Every factor family is a list of elementary signals. Each signal is fetched
//! for the whole universe, sign-transformed, winsorized and standardized on its
//! own, and the resulting z-scores are averaged per symbol into the factor score.

use crate::error::{FactorError, Result};
use crate::signal::{Metric, SignalMap, SignalProvider, collect_signal};
use crate::standardize::standardize;
use crate::universe::{CrossSection, Universe};
use crate::winsorize::{DEFAULT_WINSOR_LIMIT, validate_limit, winsorize};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The six factor families, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactorId {
    /// Cheapness relative to fundamentals
    #[serde(rename = "value")]
    Value,
    /// Small capitalization
    #[serde(rename = "size")]
    Size,
    /// Trailing price momentum
    #[serde(rename = "momentum")]
    Momentum,
    /// Low realized volatility
    #[serde(rename = "lowvol")]
    LowVol,
    /// Profitability and balance sheet strength
    #[serde(rename = "quality")]
    Quality,
    /// Low market beta
    #[serde(rename = "market_risk")]
    MarketRisk,
}

impl FactorId {
    /// Every factor, in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Value,
        Self::Size,
        Self::Momentum,
        Self::LowVol,
        Self::Quality,
        Self::MarketRisk,
    ];

    /// Stable name used in weights, snapshots and APIs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Size => "size",
            Self::Momentum => "momentum",
            Self::LowVol => "lowvol",
            Self::Quality => "quality",
            Self::MarketRisk => "market_risk",
        }
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FactorId {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.name() == needle)
            .ok_or_else(|| FactorError::NotFound(s.to_string()))
    }
}

/// Sign transform applied to a raw value before winsorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Use the value as is
    Identity,
    /// Flip the sign so that lower raw values score higher
    Negate,
    /// `-ln(x)`, unavailable for `x <= 0`
    NegativeLog,
}

impl Transform {
    /// Apply the transform, returning `None` when the value has no image.
    pub fn apply(self, raw: f64) -> Option<f64> {
        match self {
            Self::Identity => Some(raw),
            Self::Negate => Some(-raw),
            Self::NegativeLog => (raw > 0.0).then(|| -raw.ln()),
        }
    }
}

/// One elementary signal of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSpec {
    /// Metric requested from the provider
    pub metric: Metric,
    /// Transform applied to the raw value
    pub transform: Transform,
}

impl SignalSpec {
    /// Create a signal spec.
    pub const fn new(metric: Metric, transform: Transform) -> Self {
        Self { metric, transform }
    }
}

/// A cross-sectional factor built from elementary signals.
pub trait Factor: Send + Sync + fmt::Debug {
    /// Which family this factor belongs to.
    fn id(&self) -> FactorId;

    /// Factor name.
    fn name(&self) -> &str {
        self.id().name()
    }

    /// Elementary signals averaged into the factor score.
    fn signals(&self) -> &[SignalSpec];

    /// Clipping width applied to each signal.
    fn winsor_limit(&self) -> f64;

    /// Turn a finite raw value into the value that gets winsorized.
    fn prepare(&self, spec: &SignalSpec, raw: f64) -> Option<f64> {
        spec.transform.apply(raw)
    }

    /// Score every universe symbol on this factor.
    fn compute_scores(
        &self,
        cross_section: &CrossSection<'_>,
        provider: &dyn SignalProvider,
    ) -> SignalMap {
        combine_signals(self, cross_section, provider)
    }
}

/// A factor with a typed, serializable configuration.
pub trait StyleFactor: Factor + Sized {
    /// Factor configuration
    type Config: Clone + Default + Serialize + DeserializeOwned;

    /// Create the factor from a configuration.
    fn with_config(config: Self::Config) -> Self;

    /// The active configuration.
    fn config(&self) -> &Self::Config;
}

/// Configuration shared by factors that only tune clipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    /// Winsorization width in standard deviations (default: 3.0)
    pub winsor_limit: f64,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            winsor_limit: DEFAULT_WINSOR_LIMIT,
        }
    }
}

impl FactorConfig {
    /// Reject non-finite or negative limits.
    pub fn validate(&self) -> Result<()> {
        validate_limit(self.winsor_limit)
    }
}

/// Run the collect, winsorize and standardize pipeline for every signal of a
/// factor, then average the per-signal z-scores.
pub fn combine_signals<F>(
    factor: &F,
    cross_section: &CrossSection<'_>,
    provider: &dyn SignalProvider,
) -> SignalMap
where
    F: Factor + ?Sized,
{
    let universe = cross_section.universe();
    let limit = factor.winsor_limit();
    let z_scores: Vec<SignalMap> = factor
        .signals()
        .iter()
        .map(|spec| {
            let raw = collect_signal(provider, universe, spec.metric, |v| factor.prepare(spec, v));
            standardize(&winsorize(&raw, limit), cross_section)
        })
        .collect();

    let scores = average_scores(&z_scores, universe);
    debug!(
        factor = factor.name(),
        signals = z_scores.len(),
        scored = scores.values().filter(|v| v.is_some()).count(),
        "factor scores computed"
    );
    scores
}

/// Per-symbol mean of the available values across several signal maps.
///
/// A symbol is `None` only when every map lacks a value for it.
pub fn average_scores(maps: &[SignalMap], universe: &Universe) -> SignalMap {
    universe
        .iter()
        .map(|symbol| {
            let (sum, count) = maps
                .iter()
                .filter_map(|m| m.get(symbol).copied().flatten())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            (symbol.clone(), (count > 0).then(|| sum / count as f64))
        })
        .collect()
}
