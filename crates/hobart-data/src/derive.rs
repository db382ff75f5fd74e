//! Metric derivation from daily close histories.
//!
//! Close series are oldest first. Every function returns `None` rather than a
//! non-finite number when the history is too short or a denominator is zero.

/// Trading sessions per year, used to annualize volatility.
pub const TRADING_DAYS: usize = 252;

/// Sessions in one month, the skip window for momentum.
pub const SKIP_MONTH: usize = 21;

/// Fewest returns needed for a volatility estimate.
pub const MIN_VOL_OBSERVATIONS: usize = 60;

/// `numerator / denominator`, or `None` when either side is missing, the
/// denominator is zero, or the result is not finite.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 {
        return None;
    }
    Some(n / d).filter(|v| v.is_finite())
}

/// Simple returns between consecutive closes.
///
/// A return is skipped when either close is not finite or the earlier close is
/// zero.
pub fn pct_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter_map(|w| safe_div(Some(w[1] - w[0]), Some(w[0])))
        .collect()
}

/// Total return from `lookback` sessions ago to one month ago.
///
/// Requires at least `lookback` closes; `lookback` must exceed the one-month
/// skip window.
pub fn momentum(closes: &[f64], lookback: usize) -> Option<f64> {
    if lookback <= SKIP_MONTH || closes.len() < lookback {
        return None;
    }
    let start = closes[closes.len() - lookback];
    let end = closes[closes.len() - SKIP_MONTH];
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    safe_div(Some(end), Some(start)).map(|ratio| ratio - 1.0)
}

/// Annualized volatility of the last `window` daily returns.
///
/// Uses the sample standard deviation scaled by `sqrt(252)`, and needs at least
/// 60 returns inside the window.
pub fn annualized_volatility(closes: &[f64], window: usize) -> Option<f64> {
    let returns = pct_returns(closes);
    let recent = &returns[returns.len().saturating_sub(window)..];
    if recent.len() < MIN_VOL_OBSERVATIONS {
        return None;
    }
    let std = sample_std(recent)?;
    Some(std * (TRADING_DAYS as f64).sqrt())
}

/// Beta of a stock against a benchmark, `cov(r_s, r_m) / var(r_m)`.
///
/// Both histories are aligned on their most recent sessions. Needs at least two
/// overlapping returns and a benchmark with non-zero variance.
pub fn beta(stock: &[f64], market: &[f64]) -> Option<f64> {
    let overlap = stock.len().min(market.len());
    let stock = &stock[stock.len() - overlap..];
    let market = &market[market.len() - overlap..];

    let pairs: Vec<(f64, f64)> = stock
        .windows(2)
        .zip(market.windows(2))
        .filter_map(|(s, m)| {
            let rs = safe_div(Some(s[1] - s[0]), Some(s[0]))?;
            let rm = safe_div(Some(m[1] - m[0]), Some(m[0]))?;
            Some((rs, rm))
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_s = pairs.iter().map(|(s, _)| s).sum::<f64>() / n;
    let mean_m = pairs.iter().map(|(_, m)| m).sum::<f64>() / n;
    let cov = pairs
        .iter()
        .map(|(s, m)| (s - mean_s) * (m - mean_m))
        .sum::<f64>();
    let var = pairs.iter().map(|(_, m)| (m - mean_m).powi(2)).sum::<f64>();
    safe_div(Some(cov), Some(var))
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(6.0), Some(3.0), Some(2.0))]
    #[case(Some(6.0), Some(0.0), None)]
    #[case(None, Some(3.0), None)]
    #[case(Some(6.0), None, None)]
    #[case(Some(f64::INFINITY), Some(2.0), None)]
    fn test_safe_div(
        #[case] n: Option<f64>,
        #[case] d: Option<f64>,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(safe_div(n, d), expected);
    }

    #[test]
    fn test_momentum_skips_last_month() {
        let mut closes = vec![100.0; 252];
        // 21 sessions back is the "one month ago" close
        closes[252 - 21] = 120.0;
        assert_relative_eq!(momentum(&closes, 252).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_momentum_requires_history() {
        let closes = vec![100.0; 125];
        assert_eq!(momentum(&closes, 126), None);
        assert!(momentum(&closes, 63).is_some());
    }

    #[test]
    fn test_momentum_zero_start() {
        let mut closes = vec![50.0; 63];
        closes[0] = 0.0;
        assert_eq!(momentum(&closes, 63), None);
    }

    #[test]
    fn test_volatility_needs_sixty_returns() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 2) as f64).collect();
        // 59 returns
        assert_eq!(annualized_volatility(&closes, 252), None);

        let closes: Vec<f64> = (0..61).map(|i| 100.0 + (i % 2) as f64).collect();
        assert!(annualized_volatility(&closes, 252).unwrap() > 0.0);
    }

    #[test]
    fn test_volatility_of_flat_prices_is_zero() {
        let closes = vec![10.0; 300];
        assert_eq!(annualized_volatility(&closes, 180), Some(0.0));
    }

    #[test]
    fn test_beta_of_scaled_returns() {
        let market = [100.0, 101.0, 99.0, 102.0, 100.0];
        let returns: Vec<f64> = pct_returns(&market);
        let mut stock = vec![50.0];
        for r in &returns {
            let last = *stock.last().unwrap();
            stock.push(last * (1.0 + 2.0 * r));
        }
        assert_relative_eq!(beta(&stock, &market).unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_beta_flat_market() {
        let market = [100.0; 10];
        let stock = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0];
        assert_eq!(beta(&stock, &market), None);
    }
}
