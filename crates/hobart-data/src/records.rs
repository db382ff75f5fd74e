//! Signal provider backed by raw company records.
//!
//! Each record carries the fundamentals a quote feed usually returns plus the
//! daily close history. Metrics prefer the feed's precomputed field and fall
//! back to deriving it from statements and prices.

use crate::derive::{self, TRADING_DAYS, safe_div};
use crate::error::Result;
use hobart_factors::{Metric, SignalProvider, Universe, normalize_symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw fundamentals and price history for one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRecord {
    /// Ticker symbol
    pub symbol: String,
    /// Sector classification
    pub sector: Option<String>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Price to book ratio
    pub price_to_book: Option<f64>,
    /// Book value per share
    pub book_value_per_share: Option<f64>,
    /// Shares outstanding
    pub shares_outstanding: Option<f64>,
    /// Net income (latest annual or TTM)
    pub net_income: Option<f64>,
    /// Free cash flow
    pub free_cash_flow: Option<f64>,
    /// Total revenue
    pub revenue: Option<f64>,
    /// Gross profit
    pub gross_profit: Option<f64>,
    /// Total assets
    pub total_assets: Option<f64>,
    /// Total debt
    pub total_debt: Option<f64>,
    /// Stockholders' equity
    pub stockholders_equity: Option<f64>,
    /// Return on equity as reported by the feed
    pub return_on_equity: Option<f64>,
    /// Profit margin as reported by the feed
    pub profit_margin: Option<f64>,
    /// Beta as reported by the feed
    pub beta: Option<f64>,
    /// Daily closes, oldest first
    pub closes: Vec<f64>,
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl CompanyRecord {
    /// Most recent finite close.
    pub fn latest_price(&self) -> Option<f64> {
        self.closes.iter().rev().copied().find(|v| v.is_finite())
    }

    /// Reported market cap, else latest price times shares outstanding.
    pub fn market_cap(&self) -> Option<f64> {
        finite(self.market_cap).or_else(|| {
            let product = self.latest_price()? * finite(self.shares_outstanding)?;
            Some(product).filter(|v| v.is_finite())
        })
    }

    /// Reported book value per share, else equity over shares.
    pub fn book_value_per_share(&self) -> Option<f64> {
        finite(self.book_value_per_share)
            .or_else(|| safe_div(finite(self.stockholders_equity), finite(self.shares_outstanding)))
    }

    /// Reported price to book, else latest price over book value per share.
    pub fn price_to_book(&self) -> Option<f64> {
        finite(self.price_to_book)
            .or_else(|| safe_div(self.latest_price(), self.book_value_per_share()))
    }

    /// Compute one metric from this record.
    ///
    /// `benchmark` holds the market closes used when beta must be estimated.
    pub fn metric(&self, metric: Metric, benchmark: Option<&[f64]>) -> Option<f64> {
        let market_cap = || self.market_cap();
        match metric {
            Metric::BookToMarket => safe_div(Some(1.0), self.price_to_book()),
            Metric::EarningsToPrice => safe_div(finite(self.net_income), market_cap()),
            Metric::CashflowToPrice => safe_div(finite(self.free_cash_flow), market_cap()),
            Metric::SalesToPrice => safe_div(finite(self.revenue), market_cap()),
            Metric::MarketCap => market_cap(),
            Metric::Momentum12M => derive::momentum(&self.closes, TRADING_DAYS),
            Metric::Momentum6M => derive::momentum(&self.closes, TRADING_DAYS / 2),
            Metric::Momentum3M => derive::momentum(&self.closes, TRADING_DAYS / 4),
            Metric::Volatility252D => derive::annualized_volatility(&self.closes, TRADING_DAYS),
            Metric::Volatility180D => derive::annualized_volatility(&self.closes, 180),
            Metric::ReturnOnEquity => finite(self.return_on_equity).or_else(|| {
                safe_div(finite(self.net_income), finite(self.stockholders_equity))
            }),
            Metric::GrossProfitability => {
                safe_div(finite(self.gross_profit), finite(self.total_assets))
            }
            Metric::ProfitMargin => finite(self.profit_margin)
                .or_else(|| safe_div(finite(self.net_income), finite(self.revenue))),
            Metric::Leverage => safe_div(finite(self.total_debt), finite(self.total_assets)),
            Metric::Beta => finite(self.beta)
                .or_else(|| benchmark.and_then(|market| derive::beta(&self.closes, market))),
        }
    }
}

/// Benchmark close history file: either a bare array of closes or an object
/// with a `closes` field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BenchmarkFile {
    Closes(Vec<f64>),
    Record { closes: Vec<f64> },
}

/// Signal provider deriving metrics from [`CompanyRecord`]s.
#[derive(Debug, Clone, Default)]
pub struct RecordProvider {
    records: HashMap<String, CompanyRecord>,
    order: Vec<String>,
    benchmark: Option<Vec<f64>>,
}

impl RecordProvider {
    /// Build a provider from records. Symbols are normalized, records with a
    /// blank symbol are skipped, and a later record for the same symbol replaces
    /// the earlier one.
    pub fn new(records: impl IntoIterator<Item = CompanyRecord>) -> Result<Self> {
        let mut provider = Self::default();
        for mut record in records {
            let Some(symbol) = normalize_symbol(&record.symbol) else {
                warn!(symbol = %record.symbol, "skipping company record with blank symbol");
                continue;
            };
            record.symbol = symbol.clone();
            if provider.records.insert(symbol.clone(), record).is_none() {
                provider.order.push(symbol);
            }
        }
        Ok(provider)
    }

    /// Parse records from a JSON array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CompanyRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load records from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let provider = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), records = provider.len(), "loaded company records");
        Ok(provider)
    }

    /// Attach benchmark closes for beta estimation.
    pub fn with_benchmark(mut self, closes: Vec<f64>) -> Self {
        self.benchmark = Some(closes);
        self
    }

    /// Load benchmark closes from a JSON file.
    pub fn with_benchmark_path(self, path: impl AsRef<Path>) -> Result<Self> {
        let file: BenchmarkFile = serde_json::from_str(&fs::read_to_string(path)?)?;
        let closes = match file {
            BenchmarkFile::Closes(closes) | BenchmarkFile::Record { closes } => closes,
        };
        debug!(sessions = closes.len(), "loaded benchmark closes");
        Ok(self.with_benchmark(closes))
    }

    /// Record for a symbol.
    pub fn record(&self, symbol: &str) -> Option<&CompanyRecord> {
        self.records.get(symbol)
    }

    /// Universe of every loaded symbol, in file order.
    pub fn universe(&self) -> Universe {
        Universe::new(&self.order)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SignalProvider for RecordProvider {
    fn signal(&self, symbol: &str, metric: Metric) -> hobart_factors::Result<Option<f64>> {
        Ok(self
            .records
            .get(symbol)
            .and_then(|record| record.metric(metric, self.benchmark.as_deref())))
    }

    fn sector(&self, symbol: &str) -> hobart_factors::Result<Option<String>> {
        Ok(self.records.get(symbol).and_then(|r| r.sector.clone()))
    }
}
