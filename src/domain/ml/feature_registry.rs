use crate::domain::errors::{PredictorError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered list of feature names produced by the synthesizer.
/// These names are the contract with the trained artifact: its
/// `feature_columns` file selects and orders a subset of them.
/// Renaming any entry breaks every stored model.
pub const FEATURE_NAMES: &[&str] = &[
    "year",
    "month",
    "day_of_year",
    "quarter",
    "month_sin",
    "month_cos",
    "day_sin",
    "day_cos",
    "days_since_start",
    "precio_lag1",
    "precio_lag2",
    "precio_lag3",
    "precio_ma3",
    "precio_ma6",
    "precio_std3",
    "precio_diff1",
    "precio_diff2",
];

/// Features for one position of a price series.
///
/// Calendar features are always defined. Price-derived features are `None`
/// when their trailing window is not full or contains a missing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day_of_year: u32,
    pub quarter: u32,
    pub month_sin: f64,
    pub month_cos: f64,
    pub day_sin: f64,
    pub day_cos: f64,
    pub days_since_start: i64,
    pub precio_lag1: Option<f64>,
    pub precio_lag2: Option<f64>,
    pub precio_lag3: Option<f64>,
    pub precio_ma3: Option<f64>,
    pub precio_ma6: Option<f64>,
    pub precio_std3: Option<f64>,
    pub precio_diff1: Option<f64>,
    pub precio_diff2: Option<f64>,
}

impl FeatureRow {
    /// Look a feature up by its schema name.
    ///
    /// Outer `None`: the name is not part of the schema.
    /// Inner `None`: the feature is known but unavailable for this row.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        let value = match name {
            "year" => Some(self.year as f64),
            "month" => Some(self.month as f64),
            "day_of_year" => Some(self.day_of_year as f64),
            "quarter" => Some(self.quarter as f64),
            "month_sin" => Some(self.month_sin),
            "month_cos" => Some(self.month_cos),
            "day_sin" => Some(self.day_sin),
            "day_cos" => Some(self.day_cos),
            "days_since_start" => Some(self.days_since_start as f64),
            "precio_lag1" => self.precio_lag1,
            "precio_lag2" => self.precio_lag2,
            "precio_lag3" => self.precio_lag3,
            "precio_ma3" => self.precio_ma3,
            "precio_ma6" => self.precio_ma6,
            "precio_std3" => self.precio_std3,
            "precio_diff1" => self.precio_diff1,
            "precio_diff2" => self.precio_diff2,
            _ => return None,
        };
        Some(value)
    }

    /// Build the model input vector in the artifact's column order.
    ///
    /// Features outside `columns` are dropped. Any selected feature that is
    /// still unavailable takes `fill`.
    pub fn to_vector(&self, columns: &[String], fill: f64) -> Result<Vec<f64>> {
        columns
            .iter()
            .map(|name| match self.get(name) {
                Some(value) => Ok(value.unwrap_or(fill)),
                None => Err(PredictorError::PredictionError(format!(
                    "feature '{}' is not produced by the synthesizer",
                    name
                ))),
            })
            .collect()
    }
}
