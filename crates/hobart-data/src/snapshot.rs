//! Precomputed signal snapshots.
//!
//! A snapshot holds one row per symbol: an optional sector and a value for any
//! subset of metrics. It can be read from CSV (`symbol,sector,<metric>...`),
//! from JSON, or from a polars `DataFrame` with the same column layout.

use crate::error::{DataError, Result};
use hobart_factors::{Metric, SectorMap, SignalProvider, Universe, normalize_symbol};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const SYMBOL_COLUMN: &str = "symbol";
const SECTOR_COLUMN: &str = "sector";
const MISSING_MARKERS: [&str; 5] = ["na", "n/a", "none", "null", "nan"];

/// One symbol's row in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Ticker symbol
    pub symbol: String,
    /// Sector classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Metric values; absent or `null` means unavailable
    #[serde(default)]
    pub signals: BTreeMap<Metric, Option<f64>>,
}

/// In-memory signal provider over precomputed rows.
#[derive(Debug, Clone, Default)]
pub struct SignalSnapshot {
    rows: HashMap<String, SnapshotRow>,
    order: Vec<String>,
}

impl SignalSnapshot {
    /// Build a snapshot from rows. Symbols are normalized, rows with a blank
    /// symbol are skipped, and a later row for the same symbol replaces the
    /// earlier one.
    pub fn from_rows(rows: impl IntoIterator<Item = SnapshotRow>) -> Result<Self> {
        let mut snapshot = Self::default();
        for row in rows {
            snapshot.insert_or_skip(row)?;
        }
        Ok(snapshot)
    }

    fn insert_or_skip(&mut self, row: SnapshotRow) -> Result<()> {
        match self.insert(row) {
            Err(DataError::InvalidSymbol(raw)) => {
                warn!(symbol = %raw, "skipping snapshot row with blank symbol");
                Ok(())
            }
            other => other,
        }
    }

    /// Insert or replace a row. A blank symbol is an error.
    pub fn insert(&mut self, mut row: SnapshotRow) -> Result<()> {
        let symbol = normalize_symbol(&row.symbol)
            .ok_or_else(|| DataError::InvalidSymbol(row.symbol.clone()))?;
        row.symbol = symbol.clone();
        row.sector = row
            .sector
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if self.rows.insert(symbol.clone(), row).is_none() {
            self.order.push(symbol);
        }
        Ok(())
    }

    /// Read a snapshot from CSV with a `symbol` column, an optional `sector`
    /// column and one column per metric. Unknown columns and rows with a blank
    /// symbol are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv.headers()?.clone();

        let mut symbol_idx = None;
        let mut sector_idx = None;
        let mut metric_cols = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let name = header.to_lowercase();
            match name.as_str() {
                SYMBOL_COLUMN => symbol_idx = Some(idx),
                SECTOR_COLUMN => sector_idx = Some(idx),
                _ => match name.parse::<Metric>() {
                    Ok(metric) => metric_cols.push((idx, metric)),
                    Err(_) => warn!(column = header, "skipping unknown snapshot column"),
                },
            }
        }
        let symbol_idx =
            symbol_idx.ok_or_else(|| DataError::MissingColumn(SYMBOL_COLUMN.to_string()))?;

        let mut snapshot = Self::default();
        for record in csv.records() {
            let record = record?;
            let symbol = record.get(symbol_idx).unwrap_or_default();
            let mut signals = BTreeMap::new();
            for &(idx, metric) in &metric_cols {
                let cell = record.get(idx).unwrap_or_default();
                signals.insert(metric, parse_cell(cell, symbol, metric)?);
            }
            snapshot.insert_or_skip(SnapshotRow {
                symbol: symbol.to_string(),
                sector: sector_idx.and_then(|i| record.get(i)).map(str::to_string),
                signals,
            })?;
        }
        Ok(snapshot)
    }

    /// Load a CSV snapshot from disk.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Self::from_csv_reader(File::open(path)?)?;
        info!(path = %path.display(), symbols = snapshot.len(), "loaded signal snapshot");
        Ok(snapshot)
    }

    /// Parse a JSON array of [`SnapshotRow`]s.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<SnapshotRow> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// Load a JSON snapshot from disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let snapshot = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), symbols = snapshot.len(), "loaded signal snapshot");
        Ok(snapshot)
    }

    /// Load a snapshot by file extension (`.json`, anything else is CSV).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_path(path),
            _ => Self::from_csv_path(path),
        }
    }

    /// Read a snapshot from a `DataFrame` with a `symbol` column, an optional
    /// `sector` column and metric columns castable to `f64`.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        if !names.iter().any(|n| n == SYMBOL_COLUMN) {
            return Err(DataError::MissingColumn(SYMBOL_COLUMN.to_string()));
        }

        let symbols = df.column(SYMBOL_COLUMN)?.cast(&DataType::String)?;
        let symbols = symbols.str()?;
        let sectors = if names.iter().any(|n| n == SECTOR_COLUMN) {
            Some(df.column(SECTOR_COLUMN)?.cast(&DataType::String)?)
        } else {
            None
        };
        let sectors = sectors.as_ref().map(|c| c.str()).transpose()?;

        let mut metric_cols = Vec::new();
        for name in names.iter().filter(|n| *n != SYMBOL_COLUMN && *n != SECTOR_COLUMN) {
            match name.parse::<Metric>() {
                Ok(metric) => metric_cols.push((metric, df.column(name)?.cast(&DataType::Float64)?)),
                Err(_) => warn!(column = %name, "skipping unknown snapshot column"),
            }
        }
        let metric_cols = metric_cols
            .iter()
            .map(|(metric, col)| Ok((*metric, col.f64()?)))
            .collect::<PolarsResult<Vec<_>>>()?;

        let mut snapshot = Self::default();
        for i in 0..df.height() {
            let symbol = symbols.get(i).unwrap_or_default();
            let signals = metric_cols
                .iter()
                .map(|(metric, values)| (*metric, values.get(i).filter(|v| v.is_finite())))
                .collect();
            snapshot.insert_or_skip(SnapshotRow {
                symbol: symbol.to_string(),
                sector: sectors.and_then(|s| s.get(i)).map(str::to_string),
                signals,
            })?;
        }
        Ok(snapshot)
    }

    /// Row for a symbol.
    pub fn row(&self, symbol: &str) -> Option<&SnapshotRow> {
        self.rows.get(symbol)
    }

    /// Rows in load order.
    pub fn rows(&self) -> impl Iterator<Item = &SnapshotRow> {
        self.order.iter().filter_map(|s| self.rows.get(s))
    }

    /// Universe of every loaded symbol, in load order.
    pub fn universe(&self) -> Universe {
        Universe::new(&self.order)
    }

    /// Sector map from the snapshot's sector column.
    pub fn sectors(&self) -> SectorMap {
        self.rows()
            .filter_map(|r| r.sector.as_ref().map(|s| (r.symbol.as_str(), s.as_str())))
            .collect()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl SignalProvider for SignalSnapshot {
    fn signal(&self, symbol: &str, metric: Metric) -> hobart_factors::Result<Option<f64>> {
        Ok(self
            .rows
            .get(symbol)
            .and_then(|row| row.signals.get(&metric).copied().flatten()))
    }

    fn sector(&self, symbol: &str) -> hobart_factors::Result<Option<String>> {
        Ok(self.rows.get(symbol).and_then(|row| row.sector.clone()))
    }
}

fn parse_cell(cell: &str, symbol: &str, metric: Metric) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    let value: f64 = cell
        .parse()
        .map_err(|_| DataError::Parse(format!("{symbol} {metric}: '{cell}' is not a number")))?;
    Ok(Some(value).filter(|v| v.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CSV: &str = "\
symbol,sector,book_to_market,beta,comment
aapl,Technology,0.12,1.2,x
msft,Technology,NA,0.9,y
xom,,0.55,,z
";

    #[test]
    fn test_csv_snapshot() {
        let snapshot = SignalSnapshot::from_csv_reader(CSV.as_bytes()).unwrap();

        assert_eq!(snapshot.universe().symbols(), ["AAPL", "MSFT", "XOM"]);
        assert_eq!(snapshot.signal("AAPL", Metric::Beta).unwrap(), Some(1.2));
        assert_eq!(snapshot.signal("MSFT", Metric::BookToMarket).unwrap(), None);
        assert_eq!(snapshot.signal("XOM", Metric::Beta).unwrap(), None);
        assert_eq!(snapshot.signal("XOM", Metric::MarketCap).unwrap(), None);
        assert_eq!(snapshot.sector("XOM").unwrap(), None);

        let sectors = snapshot.sectors();
        assert_eq!(sectors.sector("MSFT"), Some("Technology"));
        assert_eq!(sectors.len(), 2);
    }

    #[test]
    fn test_csv_requires_symbol_column() {
        let err = SignalSnapshot::from_csv_reader("ticker,beta\nA,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(_)));
    }

    #[test]
    fn test_csv_rejects_garbage_number() {
        let err = SignalSnapshot::from_csv_reader("symbol,beta\nA,high\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_csv_skips_blank_symbol_rows() {
        let csv = "symbol,beta\nA,1.0\n  ,2.0\nB,3.0\n";
        let snapshot = SignalSnapshot::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(snapshot.universe().symbols(), ["A", "B"]);
        assert_eq!(snapshot.signal("B", Metric::Beta).unwrap(), Some(3.0));
    }

    #[test]
    fn test_json_skips_blank_symbol_rows() {
        let json = r#"[{"symbol": ""}, {"symbol": "jpm"}]"#;
        let snapshot = SignalSnapshot::from_json_str(json).unwrap();
        assert_eq!(snapshot.universe().symbols(), ["JPM"]);
    }

    #[test]
    fn test_insert_rejects_blank_symbol() {
        let mut snapshot = SignalSnapshot::default();
        let err = snapshot.insert(SnapshotRow::default()).unwrap_err();
        assert!(matches!(err, DataError::InvalidSymbol(_)));
        assert!(snapshot.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("NA")]
    #[case("n/a")]
    #[case("None")]
    #[case("null")]
    #[case("NaN")]
    fn test_missing_markers(#[case] cell: &str) {
        assert_eq!(parse_cell(cell, "A", Metric::Beta).unwrap(), None);
    }

    #[test]
    fn test_json_snapshot() {
        let json = r#"[
            {"symbol": "brk.b", "sector": "Financials", "signals": {"market_cap": 9.0e11, "beta": null}},
            {"symbol": "JPM", "signals": {"momentum_12_1": 0.25}}
        ]"#;
        let snapshot = SignalSnapshot::from_json_str(json).unwrap();

        assert_eq!(snapshot.signal("BRK-B", Metric::MarketCap).unwrap(), Some(9.0e11));
        assert_eq!(snapshot.signal("BRK-B", Metric::Beta).unwrap(), None);
        assert_eq!(snapshot.signal("JPM", Metric::Momentum12M).unwrap(), Some(0.25));
        assert_eq!(snapshot.sector("JPM").unwrap(), None);
    }

    #[test]
    fn test_dataframe_snapshot() {
        let df = df!(
            "symbol" => ["a", "b", "c"],
            "sector" => [Some("Energy"), None, Some("Energy")],
            "leverage" => [Some(0.1), Some(0.2), None],
            "notes" => ["x", "y", "z"],
        )
        .unwrap();

        let snapshot = SignalSnapshot::from_dataframe(&df).unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.signal("B", Metric::Leverage).unwrap(), Some(0.2));
        assert_eq!(snapshot.signal("C", Metric::Leverage).unwrap(), None);
        assert_eq!(snapshot.sector("A").unwrap().as_deref(), Some("Energy"));
        assert_eq!(snapshot.sector("B").unwrap(), None);
    }
}
