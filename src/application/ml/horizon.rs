//! Multi-month projections built on the prediction engine.

use super::predictor::PricePredictor;
use crate::application::analytics::statistics::{mean, round_to};
use crate::domain::analytics::TrendDirection;
use crate::domain::errors::{PredictorError, Result};
use crate::domain::prediction::PredictionResult;
use crate::interfaces::records::{Record, records};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::info;

pub const MAX_HORIZON_MONTHS: u32 = 24;

/// Days counted as one month when stepping forward.
pub const DAYS_PER_MONTH: i64 = 30;

/// `months` dates after `start`, one every 30 days.
pub fn future_dates(start: NaiveDate, months: u32) -> Result<Vec<NaiveDate>> {
    if months == 0 || months > MAX_HORIZON_MONTHS {
        return Err(PredictorError::ConfigError(format!(
            "number of months must be between 1 and {}, got {}",
            MAX_HORIZON_MONTHS, months
        )));
    }

    (1..=i64::from(months))
        .map(|k| {
            start
                .checked_add_signed(Duration::days(DAYS_PER_MONTH * k))
                .ok_or_else(|| {
                    PredictorError::ConfigError(format!("{} plus {} months is out of range", start, k))
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionReport {
    pub predictions: Vec<Record<PredictionResult>>,
    pub successful: usize,
    pub average_price: Option<f64>,
    pub projected_change_pct: Option<f64>,
    pub projected_direction: Option<TrendDirection>,
}

/// Predict each future date and summarise the successful predictions.
///
/// Change and direction compare the first and last successful prices and
/// need at least two of them.
pub fn project(predictor: &PricePredictor, start: NaiveDate, months: u32) -> Result<ProjectionReport> {
    let dates: Vec<String> = future_dates(start, months)?
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let results = predictor.predict_many(&dates);
    let prices: Vec<f64> = results.iter().flatten().map(|r| r.price).collect();

    let change = match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 && first != 0.0 => {
            Some((last - first) / first * 100.0)
        }
        _ => None,
    };

    info!(
        "Projected {} months from {}: {}/{} predictions succeeded",
        months,
        start,
        prices.len(),
        dates.len()
    );

    Ok(ProjectionReport {
        successful: prices.len(),
        average_price: mean(&prices).map(|m| round_to(m, 2)),
        projected_change_pct: change.map(|c| round_to(c, 2)),
        projected_direction: change.map(TrendDirection::classify),
        predictions: records(results),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_thirty_day_steps() {
        let dates = future_dates(d(2024, 1, 31), 3).unwrap();
        assert_eq!(dates, vec![d(2024, 3, 1), d(2024, 3, 31), d(2024, 4, 30)]);
    }

    #[test]
    fn test_horizon_bounds() {
        assert_eq!(future_dates(d(2024, 1, 1), 24).unwrap().len(), 24);
        assert_eq!(
            future_dates(d(2024, 1, 1), 0).unwrap_err().kind(),
            "ConfigError"
        );
        assert_eq!(
            future_dates(d(2024, 1, 1), 25).unwrap_err().kind(),
            "ConfigError"
        );
    }

    #[test]
    fn test_projection_on_unloaded_predictor() {
        let predictor = PricePredictor::unloaded();
        let report = project(&predictor, d(2024, 1, 1), 2).unwrap();

        assert_eq!(report.predictions.len(), 2);
        assert_eq!(report.successful, 0);
        assert_eq!(report.average_price, None);
        assert_eq!(report.projected_direction, None);
        assert!(report.predictions.iter().all(|r| r.error().is_some()));
    }
}
