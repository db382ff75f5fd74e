//! Request-scoped factor scores and the weighted composite.

use crate::ranking::weights::FactorWeights;
use hobart_factors::{FactorId, Result, SignalMap, Universe};
use hobart_output::{FactorScoreRow, factor_scores_frame};
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::debug;

/// The six factor score maps from one load.
///
/// Serializes as `{"value": {symbol: score | null, ...}, ..., "market_risk": {...}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorSnapshot {
    symbols: Vec<String>,
    scores: BTreeMap<FactorId, SignalMap>,
}

impl FactorSnapshot {
    /// Assemble a snapshot over `universe` from per-factor score maps.
    pub fn new(universe: &Universe, scores: impl IntoIterator<Item = (FactorId, SignalMap)>) -> Self {
        Self {
            symbols: universe.symbols().to_vec(),
            scores: scores.into_iter().collect(),
        }
    }

    /// Symbols in universe order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Score map for one factor.
    pub fn factor(&self, id: FactorId) -> Option<&SignalMap> {
        self.scores.get(&id)
    }

    /// One symbol's score on one factor.
    pub fn score(&self, id: FactorId, symbol: &str) -> Option<f64> {
        self.scores.get(&id)?.get(symbol).copied().flatten()
    }

    /// Number of symbols with a score on a factor.
    pub fn coverage(&self, id: FactorId) -> usize {
        self.scores
            .get(&id)
            .map_or(0, |m| m.values().filter(|v| v.is_some()).count())
    }

    /// Blend factor scores into one composite score per symbol.
    ///
    /// Weights are validated and normalized by their sum. Each symbol's score is
    /// the sum of `score * weight` over the factors it has; missing factors add
    /// nothing and the remaining weights are not rescaled. Symbols with no
    /// factor score at all are dropped.
    pub fn compute_composite(&self, weights: &FactorWeights) -> Result<CompositeScores> {
        let weights = weights.normalized()?;
        let mut entries = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let mut total = 0.0;
            let mut available = 0usize;
            for (id, weight) in weights.iter() {
                if let Some(score) = self.score(id, symbol) {
                    total += score * weight;
                    available += 1;
                }
            }
            if available > 0 {
                entries.push((symbol.clone(), total));
            }
        }
        debug!(
            scored = entries.len(),
            universe = self.symbols.len(),
            "composite scores computed"
        );
        Ok(CompositeScores { entries })
    }

    /// One export row per symbol, in universe order.
    pub fn rows(&self) -> Vec<FactorScoreRow> {
        self.symbols
            .iter()
            .map(|symbol| FactorScoreRow::from_lookup(symbol.as_str(), |id| self.score(id, symbol)))
            .collect()
    }

    /// Scores as a `DataFrame` with one column per factor.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        factor_scores_frame(&self.rows())
    }
}

impl Serialize for FactorSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.scores.serialize(serializer)
    }
}

/// Composite score per symbol, in universe order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeScores {
    entries: Vec<(String, f64)>,
}

impl CompositeScores {
    /// Build from `(symbol, score)` pairs already in universe order.
    pub fn from_entries(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Score for a symbol.
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, score)| *score)
    }

    /// Iterate `(symbol, score)` in universe order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(s, v)| (s.as_str(), *v))
    }

    /// Number of scored symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no symbol has a score.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }
}
