//! Building a ranking engine from the files named on the command line.

use hobart::{EngineConfig, EngineError, RankingEngine};
use hobart_data::{DataError, RecordProvider, SignalSnapshot, load_universe};
use hobart_factors::{Metric, Result as FactorResult, SectorMap, SignalProvider, Universe};
use std::path::PathBuf;
use tracing::info;

/// Error type for input loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum InputError {
    /// Signal, record or universe file could not be read.
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    /// Engine configuration is invalid.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// Neither `--signals` nor `--records` was given.
    #[error("no input: pass --signals <FILE> or --records <FILE>")]
    NoInput,
    /// The selected universe is empty.
    #[error("universe is empty")]
    EmptyUniverse,
}

/// Paths selecting the engine inputs.
#[derive(Debug, Clone, Default)]
pub(crate) struct InputPaths {
    /// Precomputed signal snapshot (CSV or JSON)
    pub(crate) signals: Option<PathBuf>,
    /// Company records (JSON)
    pub(crate) records: Option<PathBuf>,
    /// Benchmark closes for beta estimation (JSON)
    pub(crate) benchmark: Option<PathBuf>,
    /// Reference universe list (CSV)
    pub(crate) universe: Option<PathBuf>,
    /// Engine configuration (JSON)
    pub(crate) config: Option<PathBuf>,
}

/// Either kind of file-backed provider.
#[derive(Debug)]
pub(crate) enum LoadedProvider {
    /// Precomputed signals
    Snapshot(SignalSnapshot),
    /// Metrics derived from company records
    Records(RecordProvider),
}

impl LoadedProvider {
    fn universe(&self) -> Universe {
        match self {
            Self::Snapshot(snapshot) => snapshot.universe(),
            Self::Records(records) => records.universe(),
        }
    }
}

impl SignalProvider for LoadedProvider {
    fn signal(&self, symbol: &str, metric: Metric) -> FactorResult<Option<f64>> {
        match self {
            Self::Snapshot(snapshot) => snapshot.signal(symbol, metric),
            Self::Records(records) => records.signal(symbol, metric),
        }
    }

    fn sector(&self, symbol: &str) -> FactorResult<Option<String>> {
        match self {
            Self::Snapshot(snapshot) => snapshot.sector(symbol),
            Self::Records(records) => records.sector(symbol),
        }
    }
}

/// Load the provider. `--signals` wins when both inputs are given.
pub(crate) fn load_provider(paths: &InputPaths) -> Result<LoadedProvider, InputError> {
    if let Some(path) = &paths.signals {
        return Ok(LoadedProvider::Snapshot(SignalSnapshot::from_path(path)?));
    }
    let Some(path) = &paths.records else {
        return Err(InputError::NoInput);
    };
    let mut records = RecordProvider::from_json_path(path)?;
    if let Some(benchmark) = &paths.benchmark {
        records = records.with_benchmark_path(benchmark)?;
    }
    Ok(LoadedProvider::Records(records))
}

/// Load every input and assemble the engine.
pub(crate) fn build_engine(paths: &InputPaths) -> Result<RankingEngine<LoadedProvider>, InputError> {
    let config = match &paths.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let provider = load_provider(paths)?;
    let universe = match &paths.universe {
        Some(path) => load_universe(path)?,
        None => provider.universe(),
    };
    if universe.is_empty() {
        return Err(InputError::EmptyUniverse);
    }
    let sectors = SectorMap::from_provider(&universe, &provider);
    info!(
        symbols = universe.len(),
        sectors = sectors.labels(&universe).len(),
        "inputs loaded"
    );
    Ok(RankingEngine::with_config(provider, universe, sectors, &config)?)
}
