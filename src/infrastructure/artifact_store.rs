use crate::application::ml::artifact::{decode_feature_names, decode_regressor, decode_scaler};
use crate::domain::errors::{PredictorError, Result};
use crate::domain::ports::{ArtifactStore, Regressor, Scaler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File names of the four artifact components inside the model directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactFileNames {
    pub regressor: String,
    pub input_scaler: String,
    pub output_scaler: String,
    pub feature_names: String,
}

impl Default for ArtifactFileNames {
    fn default() -> Self {
        Self {
            regressor: "svr_model.json".to_string(),
            input_scaler: "scaler_x.json".to_string(),
            output_scaler: "scaler_y.json".to_string(),
            feature_names: "feature_columns.json".to_string(),
        }
    }
}

/// Artifact stored as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
    files: ArtifactFileNames,
}

impl JsonArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, files: ArtifactFileNames) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, file_name: &str, component: &str) -> Result<Vec<u8>> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            warn!("{} file not found at {:?}", component, path);
            return Err(PredictorError::NotFound { path });
        }
        let bytes = fs::read(&path).map_err(|e| {
            PredictorError::FormatError(format!("failed to read {} {:?}: {}", component, path, e))
        })?;
        debug!("Read {} bytes of {} from {:?}", bytes.len(), component, path);
        Ok(bytes)
    }
}

impl ArtifactStore for JsonArtifactStore {
    fn load_regressor(&self) -> Result<Box<dyn Regressor>> {
        decode_regressor(&self.read(&self.files.regressor, "regression model")?)
    }

    fn load_input_scaler(&self) -> Result<Box<dyn Scaler>> {
        decode_scaler(
            &self.read(&self.files.input_scaler, "input scaler")?,
            "input scaler",
        )
    }

    fn load_output_scaler(&self) -> Result<Box<dyn Scaler>> {
        decode_scaler(
            &self.read(&self.files.output_scaler, "output scaler")?,
            "output scaler",
        )
    }

    fn load_feature_names(&self) -> Result<Vec<String>> {
        decode_feature_names(&self.read(&self.files.feature_names, "feature list")?)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_component_names_path() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("scaler_x.json"),
            r#"{"kind":"standard","mean":[0.0],"scale":[1.0]}"#,
        )
        .unwrap();
        let store = JsonArtifactStore::new(dir.path(), ArtifactFileNames::default());

        assert_eq!(store.load_input_scaler().unwrap().n_features(), 1);
        match store.load_output_scaler().err().unwrap() {
            PredictorError::NotFound { path } => assert!(path.ends_with("scaler_y.json")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_component_is_format_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("feature_columns.json"), "month,year").unwrap();
        let store = JsonArtifactStore::new(dir.path(), ArtifactFileNames::default());

        let err = store.load_feature_names().unwrap_err();
        assert_eq!(err.kind(), "FormatError");
        assert!(err.to_string().contains("feature list"));
    }
}
