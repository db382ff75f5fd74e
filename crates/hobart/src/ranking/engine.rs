//! The ranking engine and per-request ranking sessions.

use crate::config::{EngineConfig, Result};
use crate::ranking::rank::{Ranking, rank};
use crate::ranking::snapshot::FactorSnapshot;
use crate::ranking::weights::FactorWeights;
use hobart_factors::{
    CrossSection, Factor, SectorMap, SignalProvider, Universe, build_factors, default_factors,
};
use std::fmt;
use tracing::{debug, info};

/// Scores a fixed universe on every factor and ranks it under given weights.
///
/// The engine holds no score state. Each [`RankingSession`] (or direct call to
/// [`RankingEngine::load_factor_scores`]) produces its own [`FactorSnapshot`].
pub struct RankingEngine<P> {
    provider: P,
    universe: Universe,
    sectors: SectorMap,
    factors: Vec<Box<dyn Factor>>,
    default_weights: FactorWeights,
}

impl<P> fmt::Debug for RankingEngine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingEngine")
            .field("universe", &self.universe.len())
            .field("sectors", &self.sectors.len())
            .field("factors", &self.factors)
            .finish_non_exhaustive()
    }
}

impl<P: SignalProvider> RankingEngine<P> {
    /// Create an engine with default factor configuration.
    pub fn new(provider: P, universe: Universe, sectors: SectorMap) -> Self {
        Self {
            provider,
            universe,
            sectors,
            factors: default_factors(),
            default_weights: FactorWeights::default(),
        }
    }

    /// Create an engine whose sector map comes from the provider.
    pub fn from_provider(provider: P, universe: Universe) -> Self {
        let sectors = SectorMap::from_provider(&universe, &provider);
        Self::new(provider, universe, sectors)
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(
        provider: P,
        universe: Universe,
        sectors: SectorMap,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            universe,
            sectors,
            factors: build_factors(config.winsor_limit, config.min_market_cap)?,
            default_weights: config.weights,
        })
    }

    /// The universe being ranked.
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// The sector classification.
    pub const fn sectors(&self) -> &SectorMap {
        &self.sectors
    }

    /// Weights used when a request does not supply its own.
    pub const fn default_weights(&self) -> &FactorWeights {
        &self.default_weights
    }

    /// The signal provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Compute every factor over the universe.
    pub fn load_factor_scores(&self) -> FactorSnapshot {
        info!(
            universe = self.universe.len(),
            sectors = self.sectors.labels(&self.universe).len(),
            "loading factor scores"
        );
        let cross_section = CrossSection::new(&self.universe, &self.sectors);
        let snapshot = FactorSnapshot::new(
            &self.universe,
            self.factors
                .iter()
                .map(|f| (f.id(), f.compute_scores(&cross_section, &self.provider))),
        );
        for factor in &self.factors {
            debug!(
                factor = factor.name(),
                coverage = snapshot.coverage(factor.id()),
                "factor loaded"
            );
        }
        snapshot
    }

    /// Start a ranking session for one request.
    pub const fn session(&self) -> RankingSession<'_, P> {
        RankingSession {
            engine: self,
            snapshot: None,
        }
    }
}

/// Request-scoped ranking state: factor scores are loaded on first use and
/// reused for every ranking in the session.
#[derive(Debug)]
pub struct RankingSession<'a, P> {
    engine: &'a RankingEngine<P>,
    snapshot: Option<FactorSnapshot>,
}

impl<P: SignalProvider> RankingSession<'_, P> {
    /// Factor scores for this session, loading them if needed.
    pub fn snapshot(&mut self) -> &FactorSnapshot {
        self.snapshot
            .get_or_insert_with(|| self.engine.load_factor_scores())
    }

    /// Whether factor scores have been loaded.
    pub const fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Drop loaded factor scores; the next ranking reloads them.
    pub fn reload(&mut self) {
        self.snapshot = None;
    }

    /// Rank the whole universe under `weights`.
    pub fn rank_all(&mut self, weights: &FactorWeights) -> Result<Ranking> {
        let composite = self.snapshot().compute_composite(weights)?;
        Ok(rank(&composite))
    }

    /// The `n` best-ranked securities under `weights`.
    pub fn top_n(&mut self, n: usize, weights: &FactorWeights) -> Result<Ranking> {
        let mut ranking = self.rank_all(weights)?;
        ranking.truncate(n);
        Ok(ranking)
    }
}
