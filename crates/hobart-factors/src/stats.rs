//! Summary statistics shared by the winsorizer and the standardizer.
//!
//! Every dispersion figure in the engine is the population standard deviation
//! (divide by `n`), so clipping bounds and z-scores agree with each other.

/// Fewest non-missing observations for which a mean/std is meaningful.
pub const MIN_SAMPLE: usize = 2;

/// Count, mean, population standard deviation and range of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Number of observations
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Smallest observation
    pub min: f64,
    /// Largest observation
    pub max: f64,
}

impl Moments {
    /// Compute moments of the given values, or `None` for an empty sample.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        Some(Self {
            count,
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }

    /// Whether the sample has too few observations for a statistic.
    pub const fn is_insufficient(&self) -> bool {
        self.count < MIN_SAMPLE
    }

    /// Whether every observation is equal, or the spread underflows to zero.
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max || self.std == 0.0
    }

    /// Whether z-scores can be computed against this sample.
    pub fn supports_z_scores(&self) -> bool {
        !self.is_insufficient() && !self.is_degenerate()
    }

    /// Standardize a value against this sample.
    pub fn z_score(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }

    /// Clipping bounds `mean ± limit·std`.
    pub fn bounds(&self, limit: f64) -> (f64, f64) {
        (self.mean - limit * self.std, self.mean + limit * self.std)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_population_moments() {
        let m = Moments::from_values([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.count, 3);
        assert_relative_eq!(m.mean, 2.0);
        assert_relative_eq!(m.std, (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_sample() {
        assert!(Moments::from_values(std::iter::empty()).is_none());
    }

    #[test]
    fn test_single_value_is_insufficient() {
        let m = Moments::from_values([4.0]).unwrap();
        assert!(m.is_insufficient());
        assert!(!m.supports_z_scores());
    }

    #[test]
    fn test_constant_sample_is_degenerate() {
        let m = Moments::from_values([0.1, 0.1, 0.1]).unwrap();
        assert!(m.is_degenerate());
        assert!(!m.supports_z_scores());
    }

    #[test]
    fn test_small_scale_sample_is_not_degenerate() {
        let m = Moments::from_values([1e-17, 2e-17, 3e-17]).unwrap();
        assert_eq!(m.min, 1e-17);
        assert_eq!(m.max, 3e-17);
        assert!(m.std > 0.0);
        assert!(m.supports_z_scores());
    }

    #[test]
    fn test_bounds() {
        let m = Moments::from_values([1.0, 3.0]).unwrap();
        let (lo, hi) = m.bounds(2.0);
        assert_relative_eq!(lo, 0.0);
        assert_relative_eq!(hi, 4.0);
    }
}
