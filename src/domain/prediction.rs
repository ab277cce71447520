use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const CURRENCY: &str = "MXN";
pub const UNIT: &str = "kg";
pub const MODEL_LABEL: &str = "SVR (RBF kernel)";
pub const UNAVAILABLE: &str = "unavailable";

/// A single price estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub date: String,
    pub price: f64,
    pub currency: String,
    pub unit: String,
    pub prediction_timestamp: String,
    pub model_label: String,
}

/// Lifecycle of the predictor's artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    LoadFailed { reasons: Vec<String> },
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded)
    }
}

/// Which predictor components are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "modelo_svm_cargado")]
    pub regressor_loaded: bool,
    #[serde(rename = "scaler_x_cargado")]
    pub scaler_x_loaded: bool,
    #[serde(rename = "scaler_y_cargado")]
    pub scaler_y_loaded: bool,
    #[serde(rename = "columnas_caracteristicas_cargadas")]
    pub feature_names_loaded: bool,
    #[serde(rename = "datos_historicos_cargados")]
    pub history_loaded: bool,
    pub fully_functional: bool,
}

impl ValidationReport {
    pub fn new(
        regressor_loaded: bool,
        scaler_x_loaded: bool,
        scaler_y_loaded: bool,
        feature_names_loaded: bool,
        history_loaded: bool,
    ) -> Self {
        Self {
            regressor_loaded,
            scaler_x_loaded,
            scaler_y_loaded,
            feature_names_loaded,
            history_loaded,
            fully_functional: regressor_loaded
                && scaler_x_loaded
                && scaler_y_loaded
                && feature_names_loaded
                && history_loaded,
        }
    }
}

/// A value the artifact may or may not expose. Serialises as the value
/// itself or as the string `"unavailable"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reported<T> {
    Available(T),
    Unavailable(&'static str),
}

impl<T> Reported<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Reported::Available(_))
    }
}

impl<T> From<Option<T>> for Reported<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Reported::Available(v),
            None => Reported::Unavailable(UNAVAILABLE),
        }
    }
}

/// Static description of the loaded artifact and the history it predicts from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub kernel: Reported<String>,
    pub c: Reported<f64>,
    pub gamma: Reported<f64>,
    pub epsilon: Reported<f64>,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub scaler: String,
    pub history_records: usize,
    pub history_start: Option<NaiveDate>,
    pub history_end: Option<NaiveDate>,
}
