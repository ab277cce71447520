use crate::domain::errors::{PredictorError, Result};
use crate::domain::ports::{Hyperparameters, Regressor};
use serde::{Deserialize, Serialize};

/// Kernel function of a support vector regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { degree: u32, gamma: f64, coef0: f64 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let sq_dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * sq_dist).exp()
            }
            Kernel::Poly {
                degree,
                gamma,
                coef0,
            } => (gamma * dot(a, b) + coef0).powi(*degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Linear => "linear",
            Kernel::Rbf { .. } => "rbf",
            Kernel::Poly { .. } => "poly",
            Kernel::Sigmoid { .. } => "sigmoid",
        }
    }

    pub fn gamma(&self) -> Option<f64> {
        match self {
            Kernel::Linear => None,
            Kernel::Rbf { gamma } | Kernel::Poly { gamma, .. } | Kernel::Sigmoid { gamma, .. } => {
                Some(*gamma)
            }
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Trained epsilon-SVR in dual form:
/// `f(x) = sum_i dual_coef[i] * K(support_vectors[i], x) + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelSvr {
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub c: Option<f64>,
    #[serde(default)]
    pub epsilon: Option<f64>,
}

impl KernelSvr {
    /// Check the dual form is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.support_vectors.is_empty() {
            return Err(PredictorError::FormatError(
                "SVR model has no support vectors".to_string(),
            ));
        }
        if self.support_vectors.len() != self.dual_coef.len() {
            return Err(PredictorError::FormatError(format!(
                "SVR model has {} support vectors but {} dual coefficients",
                self.support_vectors.len(),
                self.dual_coef.len()
            )));
        }
        let width = self.support_vectors[0].len();
        if self.support_vectors.iter().any(|sv| sv.len() != width) {
            return Err(PredictorError::FormatError(
                "SVR support vectors differ in width".to_string(),
            ));
        }
        Ok(())
    }
}

impl Regressor for KernelSvr {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if let Some(width) = self.expected_features() {
            if features.len() != width {
                return Err(PredictorError::PredictionError(format!(
                    "SVR expects {} features, got {}",
                    width,
                    features.len()
                )));
            }
        }

        let value = self
            .support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * self.kernel.apply(sv, features))
            .sum::<f64>()
            + self.intercept;

        if !value.is_finite() {
            return Err(PredictorError::PredictionError(
                "SVR produced a non-finite value".to_string(),
            ));
        }
        Ok(value)
    }

    fn expected_features(&self) -> Option<usize> {
        self.support_vectors.first().map(|sv| sv.len())
    }

    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            kernel: Some(self.kernel.name().to_string()),
            c: self.c,
            gamma: self.kernel.gamma(),
            epsilon: self.epsilon,
        }
    }

    fn label(&self) -> &str {
        "Support Vector Regression (SVR)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rbf_model() -> KernelSvr {
        KernelSvr {
            kernel: Kernel::Rbf { gamma: 0.5 },
            support_vectors: vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            dual_coef: vec![1.0, -1.0],
            intercept: 0.25,
            c: Some(10.0),
            epsilon: Some(0.1),
        }
    }

    #[test]
    fn test_rbf_prediction() {
        let model = rbf_model();
        // K(sv0, x) = 1, K(sv1, x) = exp(-0.5 * 2)
        let value = model.predict(&[0.0, 0.0]).unwrap();
        assert_relative_eq!(value, 1.0 - (-1.0_f64).exp() + 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_kernel() {
        let model = KernelSvr {
            kernel: Kernel::Linear,
            support_vectors: vec![vec![2.0, 0.0]],
            dual_coef: vec![0.5],
            intercept: 1.0,
            c: None,
            epsilon: None,
        };
        assert_relative_eq!(model.predict(&[3.0, 7.0]).unwrap(), 4.0);
        assert_eq!(model.hyperparameters().gamma, None);
    }

    #[test]
    fn test_width_mismatch() {
        let err = rbf_model().predict(&[1.0]).unwrap_err();
        assert_eq!(err.kind(), "PredictionError");
    }

    #[test]
    fn test_hyperparameters_exposed() {
        let params = rbf_model().hyperparameters();
        assert_eq!(params.kernel.as_deref(), Some("rbf"));
        assert_eq!(params.c, Some(10.0));
        assert_eq!(params.gamma, Some(0.5));
        assert_eq!(params.epsilon, Some(0.1));
    }

    #[test]
    fn test_inconsistent_model_rejected() {
        let mut model = rbf_model();
        model.dual_coef.pop();
        assert!(model.validate().is_err());
    }
}
