//! Configuration for the commodity predictor.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `PREDICTOR_*` environment variables.

use crate::application::ml::PricePredictor;
use crate::infrastructure::artifact_store::{ArtifactFileNames, JsonArtifactStore};
use crate::infrastructure::csv_series_loader::{
    ColumnSpec, CsvSeriesLoader, DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_MODEL_DIR: &str = "PREDICTOR_MODEL_DIR";
pub const ENV_DATA_PATH: &str = "PREDICTOR_DATA_PATH";
pub const ENV_DATE_COLUMN: &str = "PREDICTOR_DATE_COLUMN";
pub const ENV_PRICE_COLUMN: &str = "PREDICTOR_PRICE_COLUMN";
pub const ENV_PARALLEL_BATCH: &str = "PREDICTOR_PARALLEL_BATCH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub data_path: PathBuf,
    pub date_column: String,
    pub price_column: String,
    pub model_files: ArtifactFileNames,
    pub parallel_batch: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            data_path: PathBuf::from("data/historical_prices.csv"),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
            model_files: ArtifactFileNames::default(),
            parallel_batch: false,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("Invalid {}: {}. Must be true or false", key, other),
    }
}

impl AppConfig {
    /// Defaults, then `config_file` when given, then the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        info!(
            "Configuration: model_dir={:?} data_path={:?} parallel_batch={}",
            config.model_dir, config.data_path, config.parallel_batch
        );
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden through an explicit key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_MODEL_DIR) {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(column) = lookup(ENV_DATE_COLUMN) {
            self.date_column = column;
        }
        if let Some(column) = lookup(ENV_PRICE_COLUMN) {
            self.price_column = column;
        }
        if let Some(flag) = lookup(ENV_PARALLEL_BATCH) {
            self.parallel_batch = parse_bool(ENV_PARALLEL_BATCH, &flag)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.date_column.trim().is_empty() || self.price_column.trim().is_empty() {
            bail!("Date and price column names must not be empty");
        }
        if self.date_column == self.price_column {
            bail!(
                "Date and price columns must differ (both '{}')",
                self.date_column
            );
        }
        Ok(())
    }

    pub fn columns(&self) -> ColumnSpec {
        ColumnSpec::new(&self.date_column, &self.price_column)
    }

    pub fn artifact_store(&self) -> JsonArtifactStore {
        JsonArtifactStore::new(&self.model_dir, self.model_files.clone())
    }

    pub fn series_loader(&self) -> CsvSeriesLoader {
        CsvSeriesLoader::new(&self.data_path, self.columns())
    }

    /// Load a predictor from the configured artifact directory and data file.
    pub fn build_predictor(&self) -> PricePredictor {
        PricePredictor::load(&self.artifact_store(), &self.series_loader())
            .with_parallel_batch(self.parallel_batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.date_column, "Fecha_Pub_DOF");
        assert_eq!(config.price_column, "Precio promedio");
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.model_files.regressor, "svr_model.json");
        assert!(!config.parallel_batch);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_MODEL_DIR, "/srv/models"),
            (ENV_PRICE_COLUMN, "price"),
            (ENV_PARALLEL_BATCH, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.model_dir, PathBuf::from("/srv/models"));
        assert_eq!(config.price_column, "price");
        assert_eq!(config.date_column, "Fecha_Pub_DOF");
        assert!(config.parallel_batch);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::from_lookup(lookup(&[(ENV_PARALLEL_BATCH, "maybe")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[(ENV_DATE_COLUMN, "Precio promedio")])).is_err());
    }

    #[test]
    fn test_toml_layer() {
        let config = AppConfig::from_toml_str(
            r#"
            data_path = "prices.csv"
            parallel_batch = true

            [model_files]
            regressor = "forest.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("prices.csv"));
        assert!(config.parallel_batch);
        assert_eq!(config.model_files.regressor, "forest.json");
        assert_eq!(config.model_files.input_scaler, "scaler_x.json");
        assert_eq!(config.model_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_toml_unknown_type_rejected() {
        assert!(AppConfig::from_toml_str("parallel_batch = \"sometimes\"").is_err());
    }
}
