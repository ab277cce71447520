use crate::application::analytics::statistics::{mean, sample_std_dev};
use crate::domain::ml::feature_registry::FeatureRow;
use crate::domain::series::PricePoint;
use chrono::Datelike;
use std::f64::consts::PI;

/// Builds the fixed temporal/lag/rolling feature schema from a price series.
///
/// Every feature of row `i` depends only on rows `0..=i` (causal). Rolling
/// windows include the row's own price and need every price in the window,
/// so a missing price anywhere in a window leaves that feature `None`.
/// `days_since_start` is measured from the earliest date of the slice given.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalFeatureService;

impl TemporalFeatureService {
    pub fn new() -> Self {
        Self
    }

    /// One feature row per input point, in input order.
    pub fn synthesize(&self, points: &[PricePoint]) -> Vec<FeatureRow> {
        (0..points.len())
            .filter_map(|i| self.row_at(points, i))
            .collect()
    }

    /// Features of the point at `index`, computed from its trailing window only.
    pub fn row_at(&self, points: &[PricePoint], index: usize) -> Option<FeatureRow> {
        let point = points.get(index)?;
        let start = points.iter().map(|p| p.date).min()?;

        let date = point.date;
        let month = date.month();
        let day_of_year = date.ordinal();
        let month_angle = 2.0 * PI * month as f64 / 12.0;
        let day_angle = 2.0 * PI * day_of_year as f64 / 365.0;

        let window3 = trailing_window(points, index, 3);
        let window6 = trailing_window(points, index, 6);

        Some(FeatureRow {
            date,
            year: date.year(),
            month,
            day_of_year,
            quarter: (month - 1) / 3 + 1,
            month_sin: month_angle.sin(),
            month_cos: month_angle.cos(),
            day_sin: day_angle.sin(),
            day_cos: day_angle.cos(),
            days_since_start: (date - start).num_days(),
            precio_lag1: lag(points, index, 1),
            precio_lag2: lag(points, index, 2),
            precio_lag3: lag(points, index, 3),
            precio_ma3: window3.as_deref().and_then(mean),
            precio_ma6: window6.as_deref().and_then(mean),
            precio_std3: window3.as_deref().and_then(sample_std_dev),
            precio_diff1: difference(points, index, 1),
            precio_diff2: difference(points, index, 2),
        })
    }
}

/// Price `offset` positions back.
fn lag(points: &[PricePoint], index: usize, offset: usize) -> Option<f64> {
    index
        .checked_sub(offset)
        .and_then(|i| points.get(i))
        .and_then(|p| p.price)
}

/// Price change against the point `offset` positions back.
fn difference(points: &[PricePoint], index: usize, offset: usize) -> Option<f64> {
    let current = points.get(index)?.price?;
    Some(current - lag(points, index, offset)?)
}

/// The `size` prices ending at `index`, if the window is full and complete.
fn trailing_window(points: &[PricePoint], index: usize, size: usize) -> Option<Vec<f64>> {
    let first = (index + 1).checked_sub(size)?;
    points
        .get(first..=index)?
        .iter()
        .map(|p| p.price)
        .collect()
}
