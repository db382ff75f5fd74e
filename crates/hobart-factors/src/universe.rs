//! Universe and sector classification for one ranking request.
//!
//! A [`Universe`] is the ordered, de-duplicated set of symbols being ranked. Its
//! order is significant: ties in the final ranking keep universe order. A
//! [`SectorMap`] assigns each symbol an optional sector label used for
//! sector-neutral standardization.

use crate::signal::SignalProvider;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Normalize a raw ticker to the form used throughout the engine.
///
/// Trims whitespace, upper-cases, and replaces share-class dots with dashes
/// (`brk.b` becomes `BRK-B`). Returns `None` for empty input.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase().replace('.', "-");
    (!symbol.is_empty()).then_some(symbol)
}

/// Ordered set of unique security identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl Universe {
    /// Build a universe from raw tickers.
    ///
    /// Tickers are normalized with [`normalize_symbol`]; empty entries are dropped
    /// and duplicates keep their first position.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut universe = Self::default();
        for raw in symbols {
            if let Some(symbol) = normalize_symbol(raw.as_ref())
                && !universe.index.contains_key(&symbol)
            {
                universe.index.insert(symbol.clone(), universe.symbols.len());
                universe.symbols.push(symbol);
            }
        }
        universe
    }

    /// All symbols in universe order.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Iterate symbols in universe order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.symbols.iter()
    }

    /// Check if a symbol is in the universe.
    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Position of a symbol in universe order.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Number of constituents.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the universe has no constituents.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mapping from symbol to sector label.
///
/// Symbols without an entry have an unknown sector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorMap {
    sectors: HashMap<String, String>,
}

impl SectorMap {
    /// Create an empty sector map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up every universe symbol's sector through a provider.
    ///
    /// Provider failures leave the sector unknown.
    pub fn from_provider(universe: &Universe, provider: &dyn SignalProvider) -> Self {
        let mut map = Self::new();
        for symbol in universe {
            match provider.sector(symbol) {
                Ok(Some(sector)) => map.insert(symbol.clone(), sector),
                Ok(None) => {}
                Err(err) => {
                    warn!(%symbol, error = %err, "sector lookup failed, treating as unknown");
                }
            }
        }
        debug!(
            known = map.len(),
            universe = universe.len(),
            "sector map built"
        );
        map
    }

    /// Assign a sector to a symbol. Blank labels are ignored.
    pub fn insert(&mut self, symbol: impl Into<String>, sector: impl Into<String>) {
        let sector = sector.into();
        let sector = sector.trim();
        if !sector.is_empty() {
            self.sectors.insert(symbol.into(), sector.to_string());
        }
    }

    /// Get the sector label for a symbol.
    pub fn sector(&self, symbol: &str) -> Option<&str> {
        self.sectors.get(symbol).map(String::as_str)
    }

    /// Number of symbols with a known sector.
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Whether no symbol has a known sector.
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Group universe symbols by sector.
    ///
    /// Sectors appear in order of their first member in the universe, and
    /// members keep universe order. Symbols with unknown sector are skipped.
    pub fn groups<'a>(&'a self, universe: &'a Universe) -> Vec<(&'a str, Vec<&'a str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for symbol in universe {
            let Some(sector) = self.sector(symbol) else {
                continue;
            };
            let idx = *slot.entry(sector).or_insert_with(|| {
                groups.push((sector, Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(symbol.as_str());
        }
        groups
    }

    /// Distinct sector labels present among universe members, in first-seen order.
    pub fn labels<'a>(&'a self, universe: &'a Universe) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        universe
            .iter()
            .filter_map(|s| self.sector(s))
            .filter(|sector| seen.insert(*sector))
            .collect()
    }
}

impl<S, T> FromIterator<(S, T)> for SectorMap
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (symbol, sector) in iter {
            map.insert(symbol, sector);
        }
        map
    }
}

/// A universe paired with its sector classification.
#[derive(Debug, Clone, Copy)]
pub struct CrossSection<'a> {
    universe: &'a Universe,
    sectors: &'a SectorMap,
}

impl<'a> CrossSection<'a> {
    /// Pair a universe with its sector map.
    pub const fn new(universe: &'a Universe, sectors: &'a SectorMap) -> Self {
        Self { universe, sectors }
    }

    /// The universe being scored.
    pub const fn universe(&self) -> &'a Universe {
        self.universe
    }

    /// The sector classification.
    pub const fn sectors(&self) -> &'a SectorMap {
        self.sectors
    }
}
