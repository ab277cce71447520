//! Decoding of the stored artifact components.
//!
//! Each component is a JSON blob. The regressor and scaler blobs carry a
//! `kind` tag selecting the implementation; the feature list is a plain
//! array of names.

use super::kernel_svr::KernelSvr;
use super::scaler::ScalerArtifact;
use super::smartcore_predictor::{ForestModel, SmartCoreRegressor};
use crate::domain::errors::{PredictorError, Result};
use crate::domain::ml::feature_registry::FEATURE_NAMES;
use crate::domain::ports::{Regressor, Scaler};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// On-disk regressor blob.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Svr(KernelSvr),
    RandomForest { model: ForestModel },
}

impl RegressorArtifact {
    pub fn into_regressor(self) -> Result<Box<dyn Regressor>> {
        match self {
            RegressorArtifact::Svr(svr) => {
                svr.validate()?;
                Ok(Box::new(svr))
            }
            RegressorArtifact::RandomForest { model } => Ok(Box::new(SmartCoreRegressor::new(model))),
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(bytes: &[u8], component: &str) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        PredictorError::FormatError(format!("failed to deserialize {}: {}", component, e))
    })
}

pub fn decode_regressor(bytes: &[u8]) -> Result<Box<dyn Regressor>> {
    parse::<RegressorArtifact>(bytes, "regression model")?.into_regressor()
}

pub fn decode_scaler(bytes: &[u8], component: &str) -> Result<Box<dyn Scaler>> {
    let scaler: ScalerArtifact = parse(bytes, component)?;
    scaler.validate()?;
    Ok(Box::new(scaler))
}

/// Ordered feature names.
///
/// Names outside the synthesizer schema are accepted here and surface as a
/// prediction error, so the rest of the artifact still reports as loaded.
pub fn decode_feature_names(bytes: &[u8]) -> Result<Vec<String>> {
    let names: Vec<String> = parse(bytes, "feature list")?;
    if names.is_empty() {
        return Err(PredictorError::FormatError(
            "feature list is empty".to_string(),
        ));
    }
    if let Some(unknown) = names.iter().find(|n| !FEATURE_NAMES.contains(&n.as_str())) {
        warn!("Feature list names '{}', which the synthesizer does not produce", unknown);
    }
    Ok(names)
}
