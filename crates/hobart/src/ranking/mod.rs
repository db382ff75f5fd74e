//! Composite scoring and ranking.

mod engine;
mod rank;
mod snapshot;
mod weights;

pub use engine::{RankingEngine, RankingSession};
pub use rank::{Ranking, rank};
pub use snapshot::{CompositeScores, FactorSnapshot};
pub use weights::FactorWeights;
