//! Volatility analysis and descriptive statistics of the full history.

use super::statistics::{differences, mean, median, percentile, sample_std_dev, simple_returns};
use crate::domain::analytics::{SeriesStats, StreakCount, VolatilityLevel, VolatilityReport};
use crate::domain::errors::{PredictorError, Result};
use crate::domain::series::HistoricalSeries;

/// Trading periods per year used to annualise return volatility.
pub const PERIODS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreakKind {
    Up,
    Down,
}

/// Count maximal runs of same-signed differences.
///
/// A streak starts whenever a non-zero difference has a different sign than
/// the streak currently tracked. Zero differences neither start, extend nor
/// break a streak.
pub fn count_streaks(diffs: &[f64]) -> StreakCount {
    let mut count = StreakCount::default();
    let mut current: Option<StreakKind> = None;

    for &diff in diffs {
        let kind = if diff > 0.0 {
            StreakKind::Up
        } else if diff < 0.0 {
            StreakKind::Down
        } else {
            continue;
        };

        if current != Some(kind) {
            match kind {
                StreakKind::Up => count.bullish += 1,
                StreakKind::Down => count.bearish += 1,
            }
            current = Some(kind);
        }
    }

    count
}

/// Volatility profile of every known price in the series.
pub fn volatility(series: &HistoricalSeries) -> Result<VolatilityReport> {
    let prices = series.known_prices();
    if prices.len() < 2 {
        return Err(PredictorError::InsufficientData(
            "volatility needs at least two prices".to_string(),
        ));
    }

    let avg = mean(&prices).unwrap_or(0.0);
    let std_dev = sample_std_dev(&prices).unwrap_or(0.0);
    if avg == 0.0 {
        return Err(PredictorError::InsufficientData(
            "mean price is zero, coefficient of variation undefined".to_string(),
        ));
    }
    let coefficient_of_variation = std_dev / avg * 100.0;

    let returns = simple_returns(&prices);
    let daily_volatility = sample_std_dev(&returns).unwrap_or(0.0);
    let annualized_volatility = daily_volatility * PERIODS_PER_YEAR.sqrt();

    let percentile_5 = percentile(&prices, 0.05).unwrap_or(avg);
    let percentile_95 = percentile(&prices, 0.95).unwrap_or(avg);

    Ok(VolatilityReport {
        std_dev,
        coefficient_of_variation,
        daily_volatility,
        annualized_volatility,
        mean_return: mean(&returns).unwrap_or(0.0),
        max_return: returns.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        min_return: returns.iter().cloned().fold(f64::INFINITY, f64::min),
        positive_returns: returns.iter().filter(|&&r| r > 0.0).count(),
        negative_returns: returns.iter().filter(|&&r| r < 0.0).count(),
        percentile_5,
        percentile_95,
        inter_percentile_range: percentile_95 - percentile_5,
        streaks: count_streaks(&differences(&prices)),
        level: VolatilityLevel::classify(coefficient_of_variation),
    })
}

/// Record count, coverage and price distribution of the history.
pub fn descriptive_stats(series: &HistoricalSeries) -> Result<SeriesStats> {
    let prices = series.known_prices();
    let (Some(start_date), Some(end_date)) = (series.first_date(), series.last_date()) else {
        return Err(PredictorError::InsufficientData(
            "no historical data loaded".to_string(),
        ));
    };
    let Some(avg) = mean(&prices) else {
        return Err(PredictorError::InsufficientData(
            "the series has no known prices".to_string(),
        ));
    };

    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = sample_std_dev(&prices).unwrap_or(0.0);
    let price_range = max - min;
    let (coefficient_of_variation, relative_range) = if avg != 0.0 {
        (std_dev / avg * 100.0, price_range / avg * 100.0)
    } else {
        (0.0, 0.0)
    };

    Ok(SeriesStats {
        total_records: series.len(),
        start_date,
        end_date,
        mean: avg,
        min,
        max,
        std_dev,
        median: median(&prices).unwrap_or(avg),
        coefficient_of_variation,
        price_range,
        relative_range,
    })
}
