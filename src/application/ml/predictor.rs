use crate::application::analytics::statistics::round_to;
use crate::application::feature_engineering_service::TemporalFeatureService;
use crate::domain::errors::{PredictorError, Result};
use crate::domain::ports::{ArtifactStore, Regressor, Scaler, SeriesSource};
use crate::domain::prediction::{
    CURRENCY, LoadState, MODEL_LABEL, ModelInfo, PredictionResult, UNIT, ValidationReport,
};
use crate::domain::series::HistoricalSeries;
use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` target date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| PredictorError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Borrowed view of a fully loaded artifact.
struct LoadedArtifact<'a> {
    regressor: &'a dyn Regressor,
    scaler_x: &'a dyn Scaler,
    scaler_y: &'a dyn Scaler,
    feature_names: &'a [String],
}

/// Price predictor wrapping a trained artifact and the history it predicts from.
///
/// Loading happens once, in [`PricePredictor::load`]. The instance is
/// immutable afterwards; a reload builds a new instance that the owner swaps
/// in as a whole. Each artifact component is kept even when a sibling failed,
/// so [`PricePredictor::validate`] can report partial loads.
pub struct PricePredictor {
    regressor: Option<Box<dyn Regressor>>,
    scaler_x: Option<Box<dyn Scaler>>,
    scaler_y: Option<Box<dyn Scaler>>,
    feature_names: Option<Vec<String>>,
    history: Option<HistoricalSeries>,
    state: LoadState,
    features: TemporalFeatureService,
    parallel_batch: bool,
}

fn keep<T>(component: &str, loaded: Result<T>, failures: &mut Vec<String>) -> Option<T> {
    match loaded {
        Ok(value) => {
            info!("Loaded {}", component);
            Some(value)
        }
        Err(e) => {
            error!("Failed to load {}: {}", component, e);
            failures.push(format!("{}: {}", component, e));
            None
        }
    }
}

impl PricePredictor {
    /// A predictor that never attempted to load anything.
    pub fn unloaded() -> Self {
        Self {
            regressor: None,
            scaler_x: None,
            scaler_y: None,
            feature_names: None,
            history: None,
            state: LoadState::Unloaded,
            features: TemporalFeatureService::new(),
            parallel_batch: false,
        }
    }

    /// Load the artifact and the history. Never fails: the outcome is
    /// recorded in [`PricePredictor::state`] and [`PricePredictor::validate`].
    pub fn load(store: &dyn ArtifactStore, source: &dyn SeriesSource) -> Self {
        let mut predictor = Self::unloaded();
        predictor.state = LoadState::Loading;
        info!("Loading model artifact from {}", store.location());

        let mut failures = Vec::new();
        predictor.regressor = keep("regression model", store.load_regressor(), &mut failures);
        predictor.scaler_x = keep("input scaler", store.load_input_scaler(), &mut failures);
        predictor.scaler_y = keep("output scaler", store.load_output_scaler(), &mut failures);
        predictor.feature_names = keep("feature list", store.load_feature_names(), &mut failures);

        predictor.state = if failures.is_empty() {
            info!("Model artifact loaded from {}", store.location());
            LoadState::Loaded
        } else {
            warn!(
                "Model artifact incomplete ({} component(s) failed); predictions disabled",
                failures.len()
            );
            LoadState::LoadFailed { reasons: failures }
        };

        predictor.history = match source.load() {
            Ok(series) => {
                info!(
                    "Loaded {} historical records ({:?} to {:?})",
                    series.len(),
                    series.first_date(),
                    series.last_date()
                );
                Some(series)
            }
            Err(e) => {
                error!("Failed to load historical data: {}", e);
                None
            }
        };

        predictor
    }

    /// Build a fresh instance from the same kind of sources.
    pub fn reload(&self, store: &dyn ArtifactStore, source: &dyn SeriesSource) -> Self {
        Self::load(store, source).with_parallel_batch(self.parallel_batch)
    }

    /// Run batch predictions on the rayon pool.
    pub fn with_parallel_batch(mut self, enabled: bool) -> Self {
        self.parallel_batch = enabled;
        self
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn history(&self) -> Option<&HistoricalSeries> {
        self.history.as_ref()
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn artifact(&self) -> Result<LoadedArtifact<'_>> {
        if !self.state.is_loaded() {
            return Err(PredictorError::ModelNotLoaded);
        }
        match (
            self.regressor.as_deref(),
            self.scaler_x.as_deref(),
            self.scaler_y.as_deref(),
            self.feature_names.as_deref(),
        ) {
            (Some(regressor), Some(scaler_x), Some(scaler_y), Some(feature_names)) => {
                Ok(LoadedArtifact {
                    regressor,
                    scaler_x,
                    scaler_y,
                    feature_names,
                })
            }
            _ => Err(PredictorError::ModelNotLoaded),
        }
    }

    /// Unrounded model estimate for `date`.
    pub fn estimate(&self, date: NaiveDate) -> Result<f64> {
        let artifact = self.artifact()?;
        let history = self.history.as_ref().ok_or_else(|| {
            PredictorError::PredictionError("no historical data loaded".to_string())
        })?;
        let fill = history.last_known_price().ok_or_else(|| {
            PredictorError::PredictionError("history has no known price".to_string())
        })?;

        let (merged, index) = history.with_placeholder(date);
        let row = self.features.row_at(&merged, index).ok_or_else(|| {
            PredictorError::PredictionError(format!("no feature row for {}", date))
        })?;
        let input = row.to_vector(artifact.feature_names, fill)?;

        let scaled = artifact.scaler_x.transform(&input)?;
        let raw = artifact.regressor.predict(&scaled)?;
        let price = artifact
            .scaler_y
            .inverse_transform(&[raw])?
            .first()
            .copied()
            .ok_or_else(|| {
                PredictorError::PredictionError("output scaler returned no value".to_string())
            })?;

        if !price.is_finite() {
            return Err(PredictorError::PredictionError(
                "model produced a non-finite price".to_string(),
            ));
        }
        Ok(price)
    }

    /// Predict the price for a `YYYY-MM-DD` date.
    pub fn predict(&self, date: &str) -> Result<PredictionResult> {
        if !self.state.is_loaded() {
            return Err(PredictorError::ModelNotLoaded);
        }
        let target = parse_date(date)?;
        let price = round_to(self.estimate(target)?, 2);
        debug!("Predicted {} {}/{} for {}", price, CURRENCY, UNIT, target);

        Ok(PredictionResult {
            date: date.to_string(),
            price,
            currency: CURRENCY.to_string(),
            unit: UNIT.to_string(),
            prediction_timestamp: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            model_label: MODEL_LABEL.to_string(),
        })
    }

    /// One outcome per input date, in input order. Failures stay in place.
    pub fn predict_many<S>(&self, dates: &[S]) -> Vec<Result<PredictionResult>>
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<Result<PredictionResult>> = if self.parallel_batch {
            dates.par_iter().map(|d| self.predict(d.as_ref())).collect()
        } else {
            dates.iter().map(|d| self.predict(d.as_ref())).collect()
        };

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "Batch prediction: {} dates, {} succeeded, {} failed",
            results.len(),
            results.len() - failed,
            failed
        );
        results
    }

    /// Which components are present. Callable in any state.
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::new(
            self.regressor.is_some(),
            self.scaler_x.is_some(),
            self.scaler_y.is_some(),
            self.feature_names.is_some(),
            self.history.is_some(),
        )
    }

    /// Hyperparameters, feature layout and data coverage of the loaded model.
    pub fn model_info(&self) -> Result<ModelInfo> {
        let artifact = self.artifact()?;
        let params = artifact.regressor.hyperparameters();

        Ok(ModelInfo {
            model_type: artifact.regressor.label().to_string(),
            kernel: params.kernel.into(),
            c: params.c.into(),
            gamma: params.gamma.into(),
            epsilon: params.epsilon.into(),
            feature_count: artifact.feature_names.len(),
            feature_names: artifact.feature_names.to_vec(),
            scaler: artifact.scaler_x.label().to_string(),
            history_records: self.history.as_ref().map_or(0, |h| h.len()),
            history_start: self.history.as_ref().and_then(|h| h.first_date()),
            history_end: self.history.as_ref().and_then(|h| h.last_date()),
        })
    }
}
