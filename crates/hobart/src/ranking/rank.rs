//! Ordering composite scores into a ranking.

use crate::ranking::snapshot::CompositeScores;
use hobart_output::{RankedSecurity, ranking_frame};
use polars::prelude::{DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};

/// Securities ordered by composite score, highest first.
///
/// Serializes as a list of `[symbol, score]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking(Vec<(String, f64)>);

impl Ranking {
    /// Keep only the first `n` entries.
    pub fn truncate(&mut self, n: usize) {
        self.0.truncate(n);
    }

    /// Iterate `(symbol, score)` from best to worst.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(s, v)| (s.as_str(), *v))
    }

    /// Ranked symbols, best first.
    pub fn symbols(&self) -> Vec<&str> {
        self.iter().map(|(s, _)| s).collect()
    }

    /// Number of ranked securities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ranking is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numbered rows for export.
    pub fn to_rows(&self) -> Vec<RankedSecurity> {
        RankedSecurity::from_pairs(self.0.iter().cloned())
    }

    /// Ranking as a `rank`/`symbol`/`score` `DataFrame`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        ranking_frame(&self.to_rows())
    }
}

/// Sort composite scores descending.
///
/// The sort is stable, so tied scores keep universe order.
pub fn rank(composite: &CompositeScores) -> Ranking {
    let mut entries = composite.clone().into_entries();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ranking(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite(values: &[(&str, f64)]) -> CompositeScores {
        CompositeScores::from_entries(values.iter().map(|(s, v)| (s.to_string(), *v)).collect())
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let ranking = rank(&composite(&[("A", 1.0), ("B", 2.0), ("C", 2.0), ("D", -1.0)]));
        assert_eq!(ranking.symbols(), ["B", "C", "A", "D"]);

        let ranking = rank(&composite(&[("C", 2.0), ("A", 1.0), ("B", 2.0)]));
        assert_eq!(ranking.symbols(), ["C", "B", "A"]);
    }

    #[test]
    fn test_ranking_serializes_as_pairs() {
        let ranking = rank(&composite(&[("A", 0.5), ("B", 1.5)]));
        let json = serde_json::to_string(&ranking).unwrap();
        assert_eq!(json, r#"[["B",1.5],["A",0.5]]"#);
    }

    #[test]
    fn test_truncate_and_rows() {
        let mut ranking = rank(&composite(&[("A", 3.0), ("B", 2.0), ("C", 1.0)]));
        ranking.truncate(2);
        let rows = ranking.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[1].symbol, "B");

        let df = ranking.to_frame().unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&CompositeScores::default()).is_empty());
    }
}
