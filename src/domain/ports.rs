use crate::domain::errors::Result;
use crate::domain::series::HistoricalSeries;
use serde::{Deserialize, Serialize};

/// Hyperparameters a regression model may expose for introspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub kernel: Option<String>,
    pub c: Option<f64>,
    pub gamma: Option<f64>,
    pub epsilon: Option<f64>,
}

/// Opaque trained regression function `R^n -> R`.
pub trait Regressor: Send + Sync {
    /// Predict a single (already scaled) input row.
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Input width the model was trained on, when the model records it.
    fn expected_features(&self) -> Option<usize> {
        None
    }

    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::default()
    }

    /// Human readable model family.
    fn label(&self) -> &str;
}

/// Fitted feature-wise scaler with an exact inverse.
pub trait Scaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>>;

    fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>>;

    fn n_features(&self) -> usize;

    fn label(&self) -> &str;
}

/// Storage holding the four artifact components.
///
/// Each component loads independently so a caller can report exactly which
/// ones are missing.
pub trait ArtifactStore {
    fn load_regressor(&self) -> Result<Box<dyn Regressor>>;
    fn load_input_scaler(&self) -> Result<Box<dyn Scaler>>;
    fn load_output_scaler(&self) -> Result<Box<dyn Scaler>>;
    fn load_feature_names(&self) -> Result<Vec<String>>;

    /// Where the artifact lives, for logs and error messages.
    fn location(&self) -> String;
}

/// Source of the historical price series.
pub trait SeriesSource {
    fn load(&self) -> Result<HistoricalSeries>;
}

impl SeriesSource for HistoricalSeries {
    fn load(&self) -> Result<HistoricalSeries> {
        Ok(self.clone())
    }
}
