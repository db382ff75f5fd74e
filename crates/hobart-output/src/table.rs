//! Terminal and Markdown tables for rankings and factor scores.

use crate::export::{FactorScoreRow, RankedSecurity};
use hobart_factors::FactorId;
use std::fmt;

const WIDTH: usize = 48;

fn cell(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}

/// A titled ranking ready for display.
#[derive(Debug, Clone)]
pub struct RankingTable<'a> {
    title: &'a str,
    rows: &'a [RankedSecurity],
}

impl<'a> RankingTable<'a> {
    /// Create a table over ranked rows.
    pub const fn new(title: &'a str, rows: &'a [RankedSecurity]) -> Self {
        Self { title, rows }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!("{:>6}  {:<20} {:>18}\n", "Rank", "Symbol", "Score"));
        output.push_str(&"-".repeat(WIDTH));
        output.push('\n');

        for row in self.rows {
            output.push_str(&format!(
                "{:>6}  {:<20} {:>18.4}\n",
                row.rank, row.symbol, row.score
            ));
        }

        output.push_str(&"=".repeat(WIDTH));
        output.push('\n');
        output.push_str(&format!("{} securities\n", self.rows.len()));
        output
    }

    /// Format as Markdown table for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));
        output.push_str("| Rank | Symbol | Score |\n");
        output.push_str("|-----:|--------|------:|\n");
        for row in self.rows {
            output.push_str(&format!(
                "| {} | {} | {:.4} |\n",
                row.rank, row.symbol, row.score
            ));
        }
        output
    }
}

impl fmt::Display for RankingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ascii_table())
    }
}

/// Format factor scores as an ASCII table, one row per symbol.
pub fn factor_scores_ascii_table(rows: &[FactorScoreRow]) -> String {
    let mut output = String::new();
    let width = 12 + 11 * FactorId::ALL.len();

    output.push_str("\nFactor Scores\n");
    output.push_str(&"=".repeat(width));
    output.push('\n');
    output.push_str(&format!("{:<12}", "Symbol"));
    for id in FactorId::ALL {
        output.push_str(&format!("{:>11}", id.name()));
    }
    output.push('\n');
    output.push_str(&"-".repeat(width));
    output.push('\n');

    for row in rows {
        output.push_str(&format!("{:<12}", row.symbol));
        for id in FactorId::ALL {
            output.push_str(&format!("{:>11}", cell(row.get(id))));
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_ascii_table() {
        let rows = RankedSecurity::from_pairs([("MSFT", 1.5), ("KO", -0.25)]);
        let table = RankingTable::new("Top 2", &rows).to_ascii_table();
        assert!(table.contains("Top 2"));
        assert!(table.contains("MSFT"));
        assert!(table.contains("1.5000"));
        assert!(table.contains("-0.2500"));
        assert!(table.contains("2 securities"));
    }

    #[test]
    fn test_ranking_markdown() {
        let rows = RankedSecurity::from_pairs([("MSFT", 1.5)]);
        let md = RankingTable::new("Ranking", &rows).to_markdown();
        assert!(md.starts_with("# Ranking"));
        assert!(md.contains("| 1 | MSFT | 1.5000 |"));
    }

    #[test]
    fn test_factor_table_marks_missing() {
        let rows = vec![FactorScoreRow::from_lookup("JNJ", |id| {
            (id == FactorId::Quality).then_some(0.42)
        })];
        let table = factor_scores_ascii_table(&rows);
        assert!(table.contains("market_risk"));
        assert!(table.contains("0.4200"));
        assert!(table.contains('-'));
    }
}
