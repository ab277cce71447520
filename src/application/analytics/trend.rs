//! Windowed trend summaries over the historical series.

use super::statistics::{mean, round_to, sample_std_dev};
use crate::domain::analytics::{TrendDirection, TrendSummary};
use crate::domain::errors::{PredictorError, Result};
use crate::domain::series::HistoricalSeries;
use chrono::Months;
use tracing::debug;

/// Windows reported by the multi-period trend view.
pub const DEFAULT_TREND_WINDOWS: &[u32] = &[3, 6, 12];

/// Summarise the last `window_months` calendar months of history.
///
/// The window is `(max_date - window_months, max_date]`: the anchor date
/// exactly `window_months` months back is excluded, so a monthly series
/// contributes exactly `window_months` observations. Month subtraction is
/// calendar based and clamps to the last day of shorter months.
/// Missing prices inside the window are skipped.
pub fn trend(series: &HistoricalSeries, window_months: u32) -> Result<TrendSummary> {
    if window_months == 0 {
        return Err(PredictorError::ConfigError(
            "trend window must be at least one month".to_string(),
        ));
    }

    let last_date = series
        .last_date()
        .ok_or_else(|| PredictorError::InsufficientData("no historical data loaded".to_string()))?;
    let window_start = last_date
        .checked_sub_months(Months::new(window_months))
        .ok_or_else(|| {
            PredictorError::ConfigError(format!("window of {} months is out of range", window_months))
        })?;

    let prices: Vec<f64> = series.after(window_start).filter_map(|p| p.price).collect();
    debug!(
        "Trend window {} months: {} prices after {}",
        window_months,
        prices.len(),
        window_start
    );

    let (Some(&price_start), Some(&price_end)) = (prices.first(), prices.last()) else {
        return Err(PredictorError::InsufficientData(format!(
            "no prices in the last {} months",
            window_months
        )));
    };

    if price_start == 0.0 {
        return Err(PredictorError::InsufficientData(
            "first price of the window is zero".to_string(),
        ));
    }

    let abs_change = price_end - price_start;
    let pct_change = abs_change / price_start * 100.0;
    let direction = TrendDirection::classify(pct_change);

    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let avg = mean(&prices).unwrap_or(price_start);
    // A single observation has no spread.
    let volatility = sample_std_dev(&prices).unwrap_or(0.0);

    Ok(TrendSummary {
        period: format!("{} months", window_months),
        price_start: round_to(price_start, 2),
        price_end: round_to(price_end, 2),
        abs_change: round_to(abs_change, 2),
        pct_change: round_to(pct_change, 2),
        direction,
        mean: round_to(avg, 2),
        max: round_to(max, 2),
        min: round_to(min, 2),
        volatility: round_to(volatility, 2),
    })
}

/// Trend summaries for several windows; each window fails independently.
pub fn trend_report(series: &HistoricalSeries, windows: &[u32]) -> Vec<Result<TrendSummary>> {
    windows.iter().map(|&months| trend(series, months)).collect()
}
