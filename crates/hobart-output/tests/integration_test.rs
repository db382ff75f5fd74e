//! Integration tests for ranking exports, tables and reports.

use hobart_factors::FactorId;
use hobart_output::{
    ExportFormat, Exporter, FactorScoreRow, RankedSecurity, RankingTable, ReportBuilder,
    factor_scores_ascii_table, factor_scores_frame, ranking_frame,
};

#[test]
fn test_full_ranking_workflow() {
    let ranking = RankedSecurity::from_pairs([("NVDA", 1.1), ("MSFT", 0.4), ("T", -0.9)]);

    let csv = ranking.export_to_string(ExportFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 4);

    let table = RankingTable::new("Composite Ranking", &ranking);
    assert!(table.to_ascii_table().contains("NVDA"));
    assert!(table.to_markdown().contains("| Rank | Symbol | Score |"));
    assert_eq!(table.to_string(), table.to_ascii_table());

    let df = ranking_frame(&ranking).unwrap();
    assert_eq!(df.height(), 3);

    let mut builder = ReportBuilder::new().universe_size(5);
    for id in FactorId::ALL {
        builder = builder.weight(id.name(), 1.0 / 6.0).coverage(id.name(), 3);
    }
    let report = builder.ranking(ranking).build().unwrap();
    assert_eq!(report.weights.len(), 6);
    assert!(report.to_json().unwrap().contains("\"market_risk\""));
}

#[test]
fn test_full_factor_score_workflow() {
    let rows: Vec<FactorScoreRow> = ["AAPL", "XOM"]
        .into_iter()
        .enumerate()
        .map(|(i, symbol)| {
            FactorScoreRow::from_lookup(symbol, |id| {
                (i == 0 || id == FactorId::Value).then_some(0.5)
            })
        })
        .collect();

    let table = factor_scores_ascii_table(&rows);
    assert!(table.contains("AAPL"));
    assert!(table.contains("XOM"));

    let json = rows.export_to_string(ExportFormat::Json).unwrap();
    let back: Vec<FactorScoreRow> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rows);

    let df = factor_scores_frame(&rows).unwrap();
    assert_eq!(df.column("size").unwrap().null_count(), 1);
    assert_eq!(df.column("value").unwrap().null_count(), 0);
}
