use crate::domain::errors::{PredictorError, Result};
use crate::domain::ports::Regressor;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest backend for artifacts trained with smartcore.
///
/// Exposes no SVR hyperparameters, so model introspection reports them as
/// unavailable.
pub struct SmartCoreRegressor {
    model: ForestModel,
}

impl SmartCoreRegressor {
    pub fn new(model: ForestModel) -> Self {
        Self { model }
    }
}

impl Regressor for SmartCoreRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        let input_matrix = match DenseMatrix::from_2d_vec(&vec![features.to_vec()]) {
            Ok(m) => m,
            Err(e) => {
                return Err(PredictorError::PredictionError(format!(
                    "Matrix creation failed: {}",
                    e
                )));
            }
        };

        match self.model.predict(&input_matrix) {
            Ok(predictions) => predictions.first().copied().ok_or_else(|| {
                PredictorError::PredictionError("No prediction returned".to_string())
            }),
            Err(e) => Err(PredictorError::PredictionError(format!(
                "Random forest inference failed: {}",
                e
            ))),
        }
    }

    fn label(&self) -> &str {
        "SmartCore Random Forest"
    }
}
