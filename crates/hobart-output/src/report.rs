//! Run reports for Hobart rankings.

use crate::export::RankedSecurity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required report section was never set.
    #[error("Report is missing {0}")]
    Incomplete(&'static str),
}

/// Record of one ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Number of securities in the universe.
    pub universe_size: usize,

    /// Normalized factor weights used for the composite.
    pub weights: BTreeMap<String, f64>,

    /// Number of symbols with a score, per factor.
    pub coverage: BTreeMap<String, usize>,

    /// Ranked securities.
    pub ranking: Vec<RankedSecurity>,
}

impl RankingReport {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON.
    pub fn write_json(&self, path: &std::path::Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    universe_size: Option<usize>,
    weights: BTreeMap<String, f64>,
    coverage: BTreeMap<String, usize>,
    ranking: Option<Vec<RankedSecurity>>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the universe size.
    pub const fn universe_size(mut self, size: usize) -> Self {
        self.universe_size = Some(size);
        self
    }

    /// Record the weight used for a factor.
    pub fn weight(mut self, factor: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(factor.into(), weight);
        self
    }

    /// Record how many symbols a factor scored.
    pub fn coverage(mut self, factor: impl Into<String>, scored: usize) -> Self {
        self.coverage.insert(factor.into(), scored);
        self
    }

    /// Set the ranking.
    pub fn ranking(mut self, ranking: Vec<RankedSecurity>) -> Self {
        self.ranking = Some(ranking);
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<RankingReport, ReportError> {
        let ranking = self.ranking.ok_or(ReportError::Incomplete("ranking"))?;
        Ok(RankingReport {
            timestamp: Utc::now(),
            universe_size: self.universe_size.unwrap_or(ranking.len()),
            weights: self.weights,
            coverage: self.coverage,
            ranking,
        })
    }
}
