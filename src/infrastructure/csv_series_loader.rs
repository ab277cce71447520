//! Historical price series from a delimited text file.

use crate::domain::errors::{PredictorError, Result};
use crate::domain::ports::SeriesSource;
use crate::domain::series::{HistoricalSeries, PricePoint};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_DATE_COLUMN: &str = "Fecha_Pub_DOF";
pub const DEFAULT_PRICE_COLUMN: &str = "Precio promedio";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Header names of the date and price columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub date: String,
    pub price: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE_COLUMN.to_string(),
            price: DEFAULT_PRICE_COLUMN.to_string(),
        }
    }
}

impl ColumnSpec {
    pub fn new(date: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            price: price.into(),
        }
    }

    /// Column positions, or the names that are absent from `headers`.
    fn locate(&self, headers: &StringRecord) -> std::result::Result<(usize, usize), Vec<String>> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        match (find(&self.date), find(&self.price)) {
            (Some(date), Some(price)) => Ok((date, price)),
            (date, price) => {
                let mut missing = Vec::new();
                if date.is_none() {
                    missing.push(self.date.clone());
                }
                if price.is_none() {
                    missing.push(self.price.clone());
                }
                Err(missing)
            }
        }
    }
}

/// Parse a calendar date, discarding any time component.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// An empty or NaN cell is a missing price.
fn parse_price(value: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let price: f64 = value.parse()?;
    Ok(price.is_finite().then_some(price))
}

fn open(path: &Path) -> Result<Reader<File>> {
    if !path.exists() {
        return Err(PredictorError::NotFound {
            path: path.to_path_buf(),
        });
    }
    ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_path(path)
        .map_err(|e| PredictorError::FormatError(format!("cannot open {}: {}", path.display(), e)))
}

/// Loads `(date, price)` rows from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvSeriesLoader {
    path: PathBuf,
    columns: ColumnSpec,
}

impl CsvSeriesLoader {
    pub fn new(path: impl Into<PathBuf>, columns: ColumnSpec) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeriesSource for CsvSeriesLoader {
    fn load(&self) -> Result<HistoricalSeries> {
        let mut reader = open(&self.path)?;
        let headers = reader
            .headers()
            .map_err(|e| PredictorError::FormatError(format!("cannot read header row: {}", e)))?
            .clone();
        let (date_idx, price_idx) = self.columns.locate(&headers).map_err(|missing| {
            PredictorError::FormatError(format!("missing column(s): {}", missing.join(", ")))
        })?;

        let mut points = Vec::new();
        for (i, record) in reader.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let record = record
                .map_err(|e| PredictorError::FormatError(format!("line {}: {}", line, e)))?;
            let raw_date = record.get(date_idx).unwrap_or_default();
            let raw_price = record.get(price_idx).unwrap_or_default();

            let date = parse_flexible_date(raw_date).ok_or_else(|| {
                PredictorError::FormatError(format!("line {}: unparsable date '{}'", line, raw_date))
            })?;
            let price = parse_price(raw_price).map_err(|_| {
                PredictorError::FormatError(format!(
                    "line {}: non-numeric price '{}'",
                    line, raw_price
                ))
            })?;
            points.push(PricePoint { date, price });
        }

        if points.is_empty() {
            return Err(PredictorError::EmptyData(format!(
                "{} has no data rows",
                self.path.display()
            )));
        }

        let missing = points.iter().filter(|p| p.price.is_none()).count();
        debug!("{} rows read, {} without price", points.len(), missing);
        let series = HistoricalSeries::new(points);
        info!(
            "Loaded {} price records from {}",
            series.len(),
            self.path.display()
        );
        Ok(series)
    }
}

/// Check that `path` is a usable history file without loading it.
///
/// Returns `(valid, message)`; never fails.
pub fn validate_data_file(path: &Path, columns: &ColumnSpec) -> (bool, String) {
    if !path.exists() {
        return (false, format!("file does not exist: {}", path.display()));
    }

    let check = || -> std::result::Result<(bool, String), String> {
        let mut reader = open(path).map_err(|e| e.to_string())?;
        let headers = reader.headers().map_err(|e| e.to_string())?.clone();
        let (_, price_idx) = match columns.locate(&headers) {
            Ok(indices) => indices,
            Err(missing) => {
                return Ok((false, format!("missing column(s): {}", missing.join(", "))));
            }
        };

        let mut rows = 0usize;
        let mut priced = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| e.to_string())?;
            rows += 1;
            if let Ok(Some(_)) = parse_price(record.get(price_idx).unwrap_or_default()) {
                priced += 1;
            }
        }

        Ok(match (rows, priced) {
            (0, _) => (false, "file is empty".to_string()),
            (_, 0) => (false, "no valid price data".to_string()),
            _ => (true, "valid file".to_string()),
        })
    };

    check().unwrap_or_else(|e| (false, format!("error reading file: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(parse_flexible_date("2024-03-01"), Some(d(2024, 3, 1)));
        assert_eq!(parse_flexible_date("2024-03-01 12:30:00"), Some(d(2024, 3, 1)));
        assert_eq!(parse_flexible_date("2024-03-01T00:00:00"), Some(d(2024, 3, 1)));
        assert_eq!(parse_flexible_date("15/03/2024"), Some(d(2024, 3, 15)));
        assert_eq!(parse_flexible_date("2024/03/15"), Some(d(2024, 3, 15)));
        assert_eq!(parse_flexible_date("March 2024"), None);
    }

    #[test]
    fn test_load_sorts_and_keeps_missing() {
        let file = csv_file(
            "Fecha_Pub_DOF,Precio promedio,Estado\n\
             2024-03-01,60.5,MICH\n\
             2024-01-01,,MICH\n\
             2024-02-01,55,MICH\n",
        );
        let series = CsvSeriesLoader::new(file.path(), ColumnSpec::default())
            .load()
            .unwrap();

        let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 2, 1), d(2024, 3, 1)]);
        assert_eq!(series.points()[0].price, None);
        assert_eq!(series.last_known_price(), Some(60.5));
    }

    #[test]
    fn test_load_errors() {
        let loader = CsvSeriesLoader::new("/nonexistent/prices.csv", ColumnSpec::default());
        assert_eq!(loader.load().unwrap_err().kind(), "NotFound");

        let header_only = csv_file("Fecha_Pub_DOF,Precio promedio\n");
        let loader = CsvSeriesLoader::new(header_only.path(), ColumnSpec::default());
        assert_eq!(loader.load().unwrap_err().kind(), "EmptyData");

        let bad_price = csv_file("Fecha_Pub_DOF,Precio promedio\n2024-01-01,abc\n");
        let loader = CsvSeriesLoader::new(bad_price.path(), ColumnSpec::default());
        let err = loader.load().unwrap_err();
        assert_eq!(err.kind(), "FormatError");
        assert!(err.to_string().contains("line 2"));

        let bad_date = csv_file("Fecha_Pub_DOF,Precio promedio\nyesterday,10\n");
        let loader = CsvSeriesLoader::new(bad_date.path(), ColumnSpec::default());
        assert_eq!(loader.load().unwrap_err().kind(), "FormatError");
    }

    #[test]
    fn test_custom_columns() {
        let file = csv_file("date,price\n2024-01-01,10\n");
        let series = CsvSeriesLoader::new(file.path(), ColumnSpec::new("date", "price"))
            .load()
            .unwrap();
        assert_eq!(series.len(), 1);

        let err = CsvSeriesLoader::new(file.path(), ColumnSpec::default())
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("missing column(s)"));
    }

    #[test]
    fn test_validate_data_file_messages() {
        let columns = ColumnSpec::default();

        let (ok, msg) = validate_data_file(Path::new("/nonexistent/prices.csv"), &columns);
        assert!(!ok);
        assert!(msg.starts_with("file does not exist"));

        let wrong = csv_file("date,value\n2024-01-01,1\n");
        let (ok, msg) = validate_data_file(wrong.path(), &columns);
        assert!(!ok);
        assert_eq!(msg, "missing column(s): Fecha_Pub_DOF, Precio promedio");

        let empty = csv_file("Fecha_Pub_DOF,Precio promedio\n");
        assert_eq!(
            validate_data_file(empty.path(), &columns),
            (false, "file is empty".to_string())
        );

        let no_prices = csv_file("Fecha_Pub_DOF,Precio promedio\n2024-01-01,\n2024-02-01,\n");
        assert_eq!(
            validate_data_file(no_prices.path(), &columns),
            (false, "no valid price data".to_string())
        );

        let good = csv_file("Fecha_Pub_DOF,Precio promedio\n2024-01-01,\n2024-02-01,50\n");
        assert_eq!(
            validate_data_file(good.path(), &columns),
            (true, "valid file".to_string())
        );
    }
}
