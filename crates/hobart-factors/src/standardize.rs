//! Sector-neutral cross-sectional standardization.
//!
//! Scores each symbol against its sector peers, and falls back to the whole
//! universe for symbols whose sector cannot support a z-score (fewer than two
//! available values, or no dispersion) and for symbols with unknown sector.

use crate::signal::SignalMap;
use crate::stats::Moments;
use crate::universe::CrossSection;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Convert raw values into sector-neutral z-scores with a global fallback.
///
/// Two passes over the universe:
///
/// 1. For each sector with at least two available values and non-zero spread,
///    every member is resolved to `(x - mean) / std` over that sector (a missing
///    value stays missing). Other sectors leave their members unresolved.
/// 2. If the universe as a whole supports a z-score, every unresolved symbol
///    with an available value gets its z-score against the universe.
///
/// Sector-resolved scores are never replaced by the fallback. The result has an
/// entry for every universe symbol.
pub fn standardize(raw: &SignalMap, cross_section: &CrossSection<'_>) -> SignalMap {
    let universe = cross_section.universe();
    let value_of = |symbol: &str| raw.get(symbol).copied().flatten();

    let mut scores: SignalMap = universe.iter().map(|s| (s.clone(), None)).collect();
    let mut resolved: HashSet<&str> = HashSet::new();

    for (sector, members) in cross_section.sectors().groups(universe) {
        let moments = Moments::from_values(members.iter().filter_map(|s| value_of(*s)));
        match moments {
            Some(m) if m.supports_z_scores() => {
                for &symbol in &members {
                    scores.insert(symbol.to_string(), value_of(symbol).map(|v| m.z_score(v)));
                    resolved.insert(symbol);
                }
            }
            _ => trace!(sector, members = members.len(), "sector left to global fallback"),
        }
    }

    let global = Moments::from_values(universe.iter().filter_map(|s| value_of(s.as_str())));
    match global {
        Some(m) if m.supports_z_scores() => {
            for symbol in universe.iter().filter(|s| !resolved.contains(s.as_str())) {
                scores.insert(symbol.clone(), value_of(symbol.as_str()).map(|v| m.z_score(v)));
            }
        }
        _ => debug!(
            unresolved = universe.len() - resolved.len(),
            "global fallback unavailable"
        ),
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::{SectorMap, Universe};
    use approx::assert_relative_eq;

    fn signal(values: &[(&str, Option<f64>)]) -> SignalMap {
        values.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn test_sector_scores_with_single_member_fallback() {
        let universe = Universe::new(["X", "Y", "Z", "W"]);
        let sectors: SectorMap = [("X", "A"), ("Y", "A"), ("Z", "A"), ("W", "B")]
            .into_iter()
            .collect();
        let raw = signal(&[
            ("X", Some(1.0)),
            ("Y", Some(2.0)),
            ("Z", Some(3.0)),
            ("W", Some(5.0)),
        ]);

        let z = standardize(&raw, &CrossSection::new(&universe, &sectors));

        let sector_std = (2.0f64 / 3.0).sqrt();
        assert_relative_eq!(z["X"].unwrap(), -1.0 / sector_std, epsilon = 1e-12);
        assert_relative_eq!(z["Y"].unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(z["Z"].unwrap(), 1.0 / sector_std, epsilon = 1e-12);

        // W falls back to the universe {1, 2, 3, 5}
        let global_mean = 11.0 / 4.0;
        let global_std = (8.75f64 / 4.0).sqrt();
        assert_relative_eq!(
            z["W"].unwrap(),
            (5.0 - global_mean) / global_std,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_global_fallback_disabled_below_two_values() {
        let universe = Universe::new(["A", "B", "C"]);
        let sectors: SectorMap = [("A", "Tech"), ("B", "Energy")].into_iter().collect();
        let raw = signal(&[("A", Some(1.0)), ("B", None), ("C", None)]);

        let z = standardize(&raw, &CrossSection::new(&universe, &sectors));

        assert_eq!(z.len(), 3);
        assert!(z.values().all(Option::is_none));
    }

    #[test]
    fn test_zero_spread_sector_falls_back() {
        let universe = Universe::new(["A", "B", "C", "D"]);
        let sectors: SectorMap = [("A", "Flat"), ("B", "Flat"), ("C", "Other"), ("D", "Other")]
            .into_iter()
            .collect();
        let raw = signal(&[
            ("A", Some(2.0)),
            ("B", Some(2.0)),
            ("C", Some(0.0)),
            ("D", Some(4.0)),
        ]);

        let z = standardize(&raw, &CrossSection::new(&universe, &sectors));

        // Other: mean 2, std 2
        assert_relative_eq!(z["C"].unwrap(), -1.0);
        assert_relative_eq!(z["D"].unwrap(), 1.0);
        // Flat falls back to the universe {2, 2, 0, 4}: mean 2, so both score 0
        assert_relative_eq!(z["A"].unwrap(), 0.0);
        assert_relative_eq!(z["B"].unwrap(), 0.0);
    }

    #[test]
    fn test_missing_value_in_resolved_sector_stays_missing() {
        let universe = Universe::new(["A", "B", "C", "D"]);
        let sectors: SectorMap = [("A", "Tech"), ("B", "Tech"), ("C", "Tech")]
            .into_iter()
            .collect();
        let raw = signal(&[
            ("A", Some(1.0)),
            ("B", Some(3.0)),
            ("C", None),
            ("D", Some(8.0)),
        ]);

        let z = standardize(&raw, &CrossSection::new(&universe, &sectors));

        assert_relative_eq!(z["A"].unwrap(), -1.0);
        assert_relative_eq!(z["B"].unwrap(), 1.0);
        assert_eq!(z["C"], None);
        // Unknown sector goes straight to the global pass over {1, 3, 8}
        let m = Moments::from_values([1.0, 3.0, 8.0]).unwrap();
        assert_relative_eq!(z["D"].unwrap(), m.z_score(8.0), epsilon = 1e-12);
    }

    #[test]
    fn test_sector_score_not_overwritten_by_global() {
        let universe = Universe::new(["A", "B", "C"]);
        let sectors: SectorMap = [("A", "Tech"), ("B", "Tech")].into_iter().collect();
        let raw = signal(&[("A", Some(10.0)), ("B", Some(20.0)), ("C", Some(100.0))]);

        let z = standardize(&raw, &CrossSection::new(&universe, &sectors));

        assert_relative_eq!(z["A"].unwrap(), -1.0);
        assert_relative_eq!(z["B"].unwrap(), 1.0);
        assert!(z["C"].unwrap() > 1.0);
    }

    #[test]
    fn test_small_scale_sector_is_standardized() {
        let universe = Universe::new(["A", "B", "C"]);
        let sectors: SectorMap = [("A", "Tiny"), ("B", "Tiny"), ("C", "Tiny")]
            .into_iter()
            .collect();
        let raw = signal(&[("A", Some(1e-17)), ("B", Some(2e-17)), ("C", Some(3e-17))]);

        let z = standardize(&raw, &CrossSection::new(&universe, &sectors));

        let std = (2.0f64 / 3.0).sqrt();
        assert_relative_eq!(z["A"].unwrap(), -1.0 / std, epsilon = 1e-9);
        assert_relative_eq!(z["B"].unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(z["C"].unwrap(), 1.0 / std, epsilon = 1e-9);
    }
}
