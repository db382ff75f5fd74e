//! Polars `DataFrame` views of rankings and factor scores.

use crate::export::{FactorScoreRow, RankedSecurity};
use hobart_factors::FactorId;
use polars::prelude::*;

/// Ranking as a `DataFrame` with `rank`, `symbol` and `score` columns.
pub fn ranking_frame(rows: &[RankedSecurity]) -> PolarsResult<DataFrame> {
    let ranks: Vec<u32> = rows.iter().map(|r| r.rank as u32).collect();
    let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
    let scores: Vec<f64> = rows.iter().map(|r| r.score).collect();

    DataFrame::new(vec![
        Column::new("rank".into(), ranks),
        Column::new("symbol".into(), symbols),
        Column::new("score".into(), scores),
    ])
}

/// Factor scores as a `DataFrame`: a `symbol` column plus one nullable
/// `f64` column per factor, in canonical factor order.
pub fn factor_scores_frame(rows: &[FactorScoreRow]) -> PolarsResult<DataFrame> {
    let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
    let mut columns = vec![Column::new("symbol".into(), symbols)];
    for id in FactorId::ALL {
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.get(id)).collect();
        columns.push(Column::new(id.name().into(), values));
    }
    DataFrame::new(columns)
}
