use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the prediction pipeline and the historical analytics.
///
/// Every public operation either returns its record or one of these; the
/// presentation boundary (`interfaces::records`) turns them into an error
/// record instead of letting them escape as control flow.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PredictorError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid data format: {0}")]
    FormatError(String),

    #[error("No data available: {0}")]
    EmptyData(String),

    #[error("Invalid date '{input}', expected YYYY-MM-DD: {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("The model is not loaded")]
    ModelNotLoaded,

    #[error("Prediction failed: {0}")]
    PredictionError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl PredictorError {
    /// Stable label for the error kind, independent of the message.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictorError::NotFound { .. } => "NotFound",
            PredictorError::FormatError(_) => "FormatError",
            PredictorError::EmptyData(_) => "EmptyData",
            PredictorError::InvalidDate { .. } => "InvalidDate",
            PredictorError::ModelNotLoaded => "ModelNotLoaded",
            PredictorError::PredictionError(_) => "PredictionError",
            PredictorError::InsufficientData(_) => "InsufficientData",
            PredictorError::ConfigError(_) => "ConfigError",
        }
    }
}

pub type Result<T> = std::result::Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_formatting() {
        let error = PredictorError::NotFound {
            path: PathBuf::from("models/scaler_y.json"),
        };

        let msg = error.to_string();
        assert!(msg.contains("scaler_y.json"));
        assert_eq!(error.kind(), "NotFound");
    }

    #[test]
    fn test_invalid_date_formatting() {
        let error = PredictorError::InvalidDate {
            input: "2024-13-45".to_string(),
            reason: "input is out of range".to_string(),
        };

        let msg = error.to_string();
        assert!(msg.contains("2024-13-45"));
        assert!(msg.contains("YYYY-MM-DD"));
    }
}
