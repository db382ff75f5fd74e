//! Export functionality for Hobart rankings and factor scores.
//!
//! Rankings export one row per ranked security; factor scores export one row
//! per symbol with a column for each factor. Both support CSV and JSON.

use hobart_factors::FactorId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One security in a ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedSecurity {
    /// 1-based position in the ranking.
    pub rank: usize,

    /// Security symbol.
    pub symbol: String,

    /// Composite score.
    pub score: f64,
}

impl RankedSecurity {
    /// Number `(symbol, score)` pairs from 1 in the order given.
    pub fn from_pairs<I, S>(pairs: I) -> Vec<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, score))| Self {
                rank: i + 1,
                symbol: symbol.into(),
                score,
            })
            .collect()
    }
}

/// Factor scores for one symbol. Missing scores export as empty CSV cells
/// and JSON `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactorScoreRow {
    /// Security symbol.
    pub symbol: String,

    /// Value factor score.
    pub value: Option<f64>,

    /// Size factor score.
    pub size: Option<f64>,

    /// Momentum factor score.
    pub momentum: Option<f64>,

    /// Low-volatility factor score.
    pub lowvol: Option<f64>,

    /// Quality factor score.
    pub quality: Option<f64>,

    /// Market-risk factor score.
    pub market_risk: Option<f64>,
}

impl FactorScoreRow {
    /// Build a row by looking up each factor's score for `symbol`.
    pub fn from_lookup<F>(symbol: impl Into<String>, score: F) -> Self
    where
        F: Fn(FactorId) -> Option<f64>,
    {
        Self {
            symbol: symbol.into(),
            value: score(FactorId::Value),
            size: score(FactorId::Size),
            momentum: score(FactorId::Momentum),
            lowvol: score(FactorId::LowVol),
            quality: score(FactorId::Quality),
            market_risk: score(FactorId::MarketRisk),
        }
    }

    /// Score for one factor.
    pub const fn get(&self, id: FactorId) -> Option<f64> {
        match id {
            FactorId::Value => self.value,
            FactorId::Size => self.size,
            FactorId::Momentum => self.momentum,
            FactorId::LowVol => self.lowvol,
            FactorId::Quality => self.quality,
            FactorId::MarketRisk => self.market_risk,
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn csv_string<'a, T, I>(records: I) -> Result<String, ExportError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

impl Exporter for Vec<RankedSecurity> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_string(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<FactorScoreRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_string(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
