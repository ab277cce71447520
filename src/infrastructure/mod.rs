pub mod artifact_store;
pub mod csv_series_loader;

pub use artifact_store::{ArtifactFileNames, JsonArtifactStore};
pub use csv_series_loader::{ColumnSpec, CsvSeriesLoader, validate_data_file};
