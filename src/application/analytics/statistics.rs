//! Statistical primitives shared by the feature synthesizer and the analytics
//!
//! This module provides:
//! - Mean and sample standard deviation (via `statrs`)
//! - Linear-interpolation percentiles
//! - Simple returns and consecutive differences

use statrs::statistics::{Data, Distribution};

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Data::new(values.to_vec()).mean()
}

/// Sample standard deviation (n - 1 denominator).
///
/// # Returns
/// * `Some(f64)` - for two or more values
/// * `None` - when the estimate is undefined
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Data::new(values.to_vec()).std_dev()
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is a fraction in `[0, 1]`: the value at fractional rank `q * (n - 1)`
/// of the sorted data.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Median as the 50th percentile.
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 0.5)
}

/// Simple returns `p[t] / p[t-1] - 1`. The undefined first value is dropped.
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] / w[0]) - 1.0).collect()
}

/// Consecutive differences `p[t] - p[t-1]`.
pub fn differences(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_sample_std() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

        assert_relative_eq!(mean(&values).unwrap(), 5.0);
        // Sample variance = 32 / 7
        assert_relative_eq!(
            sample_std_dev(&values).unwrap(),
            (32.0_f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_std_undefined_for_single_value() {
        assert!(sample_std_dev(&[3.0]).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = vec![10.0, 20.0, 30.0, 40.0, 50.0];

        assert_relative_eq!(percentile(&values, 0.0).unwrap(), 10.0);
        assert_relative_eq!(percentile(&values, 1.0).unwrap(), 50.0);
        // rank 0.05 * 4 = 0.2
        assert_relative_eq!(percentile(&values, 0.05).unwrap(), 12.0, epsilon = 1e-12);
        // rank 0.95 * 4 = 3.8
        assert_relative_eq!(percentile(&values, 0.95).unwrap(), 48.0, epsilon = 1e-12);
        assert_relative_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_returns_drop_first_value() {
        let returns = simple_returns(&[100.0, 110.0, 99.0]);

        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(returns[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_round_to_two_decimals() {
        assert_eq!(round_to(12.0689, 2), 12.07);
        assert_eq!(round_to(-3.14159, 2), -3.14);
    }
}
