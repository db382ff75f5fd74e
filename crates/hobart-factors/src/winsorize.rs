//! Outlier clipping for raw signals.
//!
//! Clips each available value into `mean ± limit·std`, with the mean and the
//! population standard deviation taken over the available values only. Missing
//! values pass through untouched.

use crate::error::{FactorError, Result};
use crate::signal::SignalMap;
use crate::stats::Moments;

/// Default clipping width, in standard deviations.
pub const DEFAULT_WINSOR_LIMIT: f64 = 3.0;

/// Check that a clipping width is finite and non-negative.
pub fn validate_limit(limit: f64) -> Result<()> {
    if limit.is_finite() && limit >= 0.0 {
        Ok(())
    } else {
        Err(FactorError::InvalidConfig(format!(
            "winsor limit must be finite and non-negative, got {limit}"
        )))
    }
}

/// Winsorize a signal to `mean ± limit·std`.
///
/// With fewer than two available values the input is returned unchanged.
pub fn winsorize(raw: &SignalMap, limit: f64) -> SignalMap {
    let Some(moments) = Moments::from_values(raw.values().flatten().copied()) else {
        return raw.clone();
    };
    if moments.is_insufficient() {
        return raw.clone();
    }

    let (lower, upper) = moments.bounds(limit);
    raw.iter()
        .map(|(symbol, value)| (symbol.clone(), value.map(|v| v.max(lower).min(upper))))
        .collect()
}
