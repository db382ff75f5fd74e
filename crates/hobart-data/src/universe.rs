//! Universe loading from reference ticker lists.
//!
//! Reference lists (index constituents, watchlists) are CSV files with a
//! `Symbol` or `Ticker` column. Files without either header use their first
//! column.

use crate::error::{DataError, Result};
use hobart_factors::{Universe, normalize_symbol};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const SYMBOL_HEADERS: [&str; 2] = ["symbol", "ticker"];

/// Read a universe from CSV.
///
/// Symbols are normalized and de-duplicated keeping first occurrence. Rows
/// with a blank symbol are skipped.
pub fn read_universe<R: Read>(reader: R) -> Result<Universe> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::MissingColumn("symbol".to_string()));
    }
    let column = SYMBOL_HEADERS
        .iter()
        .find_map(|wanted| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(wanted))
        })
        .unwrap_or(0);

    let mut symbols = Vec::new();
    for record in csv.records() {
        let record = record?;
        match record.get(column).and_then(normalize_symbol) {
            Some(symbol) => symbols.push(symbol),
            None => warn!(
                line = ?record.position().map(|p| p.line()),
                "skipping universe row with blank symbol"
            ),
        }
    }
    Ok(Universe::new(symbols))
}

/// Load a universe from a CSV file.
pub fn load_universe(path: impl AsRef<Path>) -> Result<Universe> {
    let path = path.as_ref();
    let universe = read_universe(File::open(path)?)?;
    info!(path = %path.display(), symbols = universe.len(), "loaded universe");
    Ok(universe)
}
