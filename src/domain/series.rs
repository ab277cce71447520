use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of the historical series. `price` is `None` for missing
/// values and for the placeholder row of a date being predicted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self {
            date,
            price: Some(price),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, price: None }
    }
}

/// Date-ordered price history.
///
/// Construction sorts ascending by date with a stable sort, so rows sharing a
/// date keep their source order. Duplicates are never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalSeries {
    points: Vec<PricePoint>,
}

impl HistoricalSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    /// Convenience constructor from `(date, price)` pairs.
    pub fn from_pairs(pairs: &[(NaiveDate, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(date, price)| PricePoint::new(date, price))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Known prices in date order, missing values skipped.
    pub fn known_prices(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.price).collect()
    }

    /// Most recent non-missing price.
    pub fn last_known_price(&self) -> Option<f64> {
        self.points.iter().rev().find_map(|p| p.price)
    }

    /// Points strictly after `start`.
    pub fn after(&self, start: NaiveDate) -> impl Iterator<Item = &PricePoint> {
        self.points.iter().filter(move |p| p.date > start)
    }

    /// Merge a missing-price row at `date` into a copy of the history.
    ///
    /// The placeholder goes after every row dated on or before `date`, which
    /// is where a stable re-sort of `history ++ [placeholder]` would put it.
    /// Returns the merged points and the placeholder's index.
    pub fn with_placeholder(&self, date: NaiveDate) -> (Vec<PricePoint>, usize) {
        let index = self.points.partition_point(|p| p.date <= date);
        let mut merged = Vec::with_capacity(self.points.len() + 1);
        merged.extend_from_slice(&self.points[..index]);
        merged.push(PricePoint::missing(date));
        merged.extend_from_slice(&self.points[index..]);
        (merged, index)
    }
}
