//! Fitted feature scalers stored alongside the regression model.
//!
//! Both scalers keep per-feature parameters and an exact inverse so the
//! model's scaled output can be mapped back to a price.

use crate::domain::errors::{PredictorError, Result};
use crate::domain::ports::Scaler;
use serde::{Deserialize, Serialize};

fn check_width(expected: usize, row: &[f64]) -> Result<()> {
    if row.len() != expected {
        return Err(PredictorError::PredictionError(format!(
            "scaler expects {} features, got {}",
            expected,
            row.len()
        )));
    }
    Ok(())
}

/// Columns of a row-major matrix, validating a rectangular shape.
fn columns(rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let width = rows
        .first()
        .map(|r| r.len())
        .ok_or_else(|| PredictorError::EmptyData("cannot fit a scaler on zero rows".to_string()))?;

    let mut cols = vec![Vec::with_capacity(rows.len()); width];
    for row in rows {
        check_width(width, row)?;
        for (col, &value) in cols.iter_mut().zip(row) {
            col.push(value);
        }
    }
    Ok(cols)
}

/// A zero spread scales by 1 so constant features pass through.
fn non_zero(scale: f64) -> f64 {
    if scale.abs() < 1e-12 { 1.0 } else { scale }
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Maps each feature linearly from `[data_min, data_max]` onto `feature_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

impl MinMaxScaler {
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = columns(rows)?;
        Ok(Self {
            data_min: cols
                .iter()
                .map(|c| c.iter().cloned().fold(f64::INFINITY, f64::min))
                .collect(),
            data_max: cols
                .iter()
                .map(|c| c.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
                .collect(),
            feature_range: default_feature_range(),
        })
    }

    fn scale(&self, j: usize) -> f64 {
        let (low, high) = self.feature_range;
        (high - low) / non_zero(self.data_max[j] - self.data_min[j])
    }

    fn offset(&self, j: usize) -> f64 {
        self.feature_range.0 - self.data_min[j] * self.scale(j)
    }
}

impl Scaler for MinMaxScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), row)?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| x * self.scale(j) + self.offset(j))
            .collect())
    }

    fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), row)?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| (x - self.offset(j)) / self.scale(j))
            .collect())
    }

    fn n_features(&self) -> usize {
        self.data_min.len()
    }

    fn label(&self) -> &str {
        "MinMaxScaler"
    }
}

/// Standardises each feature to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit with the population standard deviation.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = columns(rows)?;
        let mut mean = Vec::with_capacity(cols.len());
        let mut scale = Vec::with_capacity(cols.len());

        for col in &cols {
            let n = col.len() as f64;
            let m = col.iter().sum::<f64>() / n;
            let variance = col.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n;
            mean.push(m);
            scale.push(non_zero(variance.sqrt()));
        }

        Ok(Self { mean, scale })
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), row)?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| (x - self.mean[j]) / non_zero(self.scale[j]))
            .collect())
    }

    fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), row)?;
        Ok(row
            .iter()
            .enumerate()
            .map(|(j, &x)| x * non_zero(self.scale[j]) + self.mean[j])
            .collect())
    }

    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn label(&self) -> &str {
        "StandardScaler"
    }
}

/// On-disk scaler blob, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

impl ScalerArtifact {
    /// Reject blobs whose per-feature vectors disagree in length.
    pub fn validate(&self) -> Result<()> {
        let consistent = match self {
            ScalerArtifact::MinMax(s) => s.data_min.len() == s.data_max.len(),
            ScalerArtifact::Standard(s) => s.mean.len() == s.scale.len(),
        };
        if !consistent || self.n_features() == 0 {
            return Err(PredictorError::FormatError(
                "scaler parameters have inconsistent or zero width".to_string(),
            ));
        }
        Ok(())
    }

    fn inner(&self) -> &dyn Scaler {
        match self {
            ScalerArtifact::MinMax(s) => s as &dyn Scaler,
            ScalerArtifact::Standard(s) => s as &dyn Scaler,
        }
    }
}

impl Scaler for ScalerArtifact {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.inner().transform(row)
    }

    fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.inner().inverse_transform(row)
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn label(&self) -> &str {
        self.inner().label()
    }
}
