//! Factor weights for the composite score.

use hobart_factors::{FactorError, FactorId, Result};
use serde::{Deserialize, Serialize};

/// Relative weight of each factor in the composite score.
///
/// Every field is required when deserializing and unknown fields are rejected.
/// Weights need not sum to one; [`FactorWeights::normalized`] rescales them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactorWeights {
    /// Value factor weight
    pub value: f64,
    /// Size factor weight
    pub size: f64,
    /// Momentum factor weight
    pub momentum: f64,
    /// Low-volatility factor weight
    pub lowvol: f64,
    /// Quality factor weight
    pub quality: f64,
    /// Market-risk factor weight
    pub market_risk: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            value: 0.2,
            size: 0.2,
            momentum: 0.2,
            lowvol: 0.15,
            quality: 0.15,
            market_risk: 0.1,
        }
    }
}

impl FactorWeights {
    /// Equal weight on every factor.
    pub const fn uniform() -> Self {
        let w = 1.0 / FactorId::ALL.len() as f64;
        Self {
            value: w,
            size: w,
            momentum: w,
            lowvol: w,
            quality: w,
            market_risk: w,
        }
    }

    /// Weight for one factor.
    pub const fn get(&self, id: FactorId) -> f64 {
        match id {
            FactorId::Value => self.value,
            FactorId::Size => self.size,
            FactorId::Momentum => self.momentum,
            FactorId::LowVol => self.lowvol,
            FactorId::Quality => self.quality,
            FactorId::MarketRisk => self.market_risk,
        }
    }

    /// Set the weight for one factor.
    pub const fn set(&mut self, id: FactorId, weight: f64) {
        match id {
            FactorId::Value => self.value = weight,
            FactorId::Size => self.size = weight,
            FactorId::Momentum => self.momentum = weight,
            FactorId::LowVol => self.lowvol = weight,
            FactorId::Quality => self.quality = weight,
            FactorId::MarketRisk => self.market_risk = weight,
        }
    }

    /// `(factor, weight)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FactorId, f64)> + '_ {
        FactorId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, w)| w).sum()
    }

    /// Reject negative or non-finite weights.
    pub fn validate(&self) -> Result<()> {
        match self.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            Some((id, weight)) => Err(FactorError::InvalidWeight {
                factor: id.name().to_string(),
                weight,
            }),
            None => Ok(()),
        }
    }

    /// Rescale so the weights sum to one. All-zero weights become uniform.
    ///
    /// Weights whose sum overflows are first scaled by the largest weight.
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        let mut scaled = *self;
        if !self.total().is_finite() {
            let largest = self.iter().map(|(_, w)| w).fold(0.0, f64::max);
            for (id, w) in self.iter() {
                scaled.set(id, w / largest);
            }
        }
        let total = scaled.total();
        if total == 0.0 {
            return Ok(Self::uniform());
        }
        let mut normalized = scaled;
        for (id, w) in scaled.iter() {
            normalized.set(id, w / total);
        }
        Ok(normalized)
    }
}
