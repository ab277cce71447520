use approx::assert_relative_eq;
use chrono::NaiveDate;
use commodity_predictor::application::analytics::{
    DEFAULT_TREND_WINDOWS, count_streaks, descriptive_stats, trend, trend_report, volatility,
};
use commodity_predictor::application::feature_engineering_service::TemporalFeatureService;
use commodity_predictor::domain::analytics::{TrendDirection, VolatilityLevel};
use commodity_predictor::domain::ports::SeriesSource;
use commodity_predictor::domain::series::HistoricalSeries;
use commodity_predictor::infrastructure::{ColumnSpec, CsvSeriesLoader, validate_data_file};
use commodity_predictor::interfaces::records;
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn load(contents: &str) -> (NamedTempFile, HistoricalSeries) {
    let file = csv_file(contents);
    let series = CsvSeriesLoader::new(file.path(), ColumnSpec::default())
        .load()
        .unwrap();
    (file, series)
}

const SIX_MONTHS: &str = "Fecha_Pub_DOF,Precio promedio\n\
2024-04-01,58\n\
2024-01-01,50\n\
2024-06-01,65\n\
2024-02-01,55\n\
2024-05-01,62\n\
2024-03-01,60\n";

#[test]
fn test_three_month_trend_from_file() {
    let (_file, series) = load(SIX_MONTHS);
    let summary = trend(&series, 3).unwrap();

    assert_eq!(summary.price_start, 58.0);
    assert_eq!(summary.price_end, 65.0);
    assert_eq!(summary.abs_change, 7.0);
    assert_relative_eq!(summary.pct_change, 12.07);
    assert_eq!(summary.direction, TrendDirection::Bullish);
}

#[test]
fn test_trend_report_isolates_failures() {
    let (_file, series) = load(SIX_MONTHS);
    let report = records(trend_report(&series, &[3, 0, 12]));

    assert_eq!(report.len(), 3);
    assert!(report[0].is_success());
    assert!(report[1].error().unwrap().contains("Invalid configuration"));
    // Twelve months covers the whole history.
    assert_eq!(report[2].success().unwrap().price_start, 50.0);
    assert_eq!(DEFAULT_TREND_WINDOWS, &[3, 6, 12]);
}

#[test]
fn test_volatility_from_file() {
    let (_file, series) = load(SIX_MONTHS);
    let report = volatility(&series).unwrap();

    // Differences: +5 +5 -2 +4 +3
    assert_eq!(report.streaks.bullish, 2);
    assert_eq!(report.streaks.bearish, 1);
    assert_eq!(report.positive_returns, 4);
    assert_eq!(report.negative_returns, 1);
    assert_eq!(report.level, VolatilityLevel::Low);
    assert!(report.percentile_5 <= report.percentile_95);
    assert!(report.annualized_volatility > report.daily_volatility);
}

#[test]
fn test_streaks_ignore_flat_moves() {
    let streaks = count_streaks(&[2.0, 1.0, 0.0, -3.0, -1.0, 4.0]);
    assert_eq!((streaks.bullish, streaks.bearish), (2, 1));
}

#[test]
fn test_missing_prices_skipped_by_analytics() {
    let (_file, series) = load(
        "Fecha_Pub_DOF,Precio promedio\n\
         2024-01-01,10\n\
         2024-02-01,\n\
         2024-03-01,12\n",
    );
    let stats = descriptive_stats(&series).unwrap();

    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.min, 10.0);
    assert_eq!(stats.max, 12.0);
    assert_eq!(stats.median, 11.0);
    assert_eq!(
        stats.start_date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
}

#[test]
fn test_single_price_has_no_volatility() {
    let (_file, series) = load("Fecha_Pub_DOF,Precio promedio\n2024-01-01,10\n");
    assert_eq!(volatility(&series).unwrap_err().kind(), "InsufficientData");
}

#[test]
fn test_features_from_loaded_series() {
    let (_file, series) = load(SIX_MONTHS);
    let rows = TemporalFeatureService::new().synthesize(series.points());

    assert_eq!(rows.len(), 6);
    assert_eq!(rows[3].precio_lag1, Some(60.0));
    assert_relative_eq!(rows[3].precio_ma3.unwrap(), (55.0 + 60.0 + 58.0) / 3.0);
    for row in &rows {
        assert_relative_eq!(row.month_sin.powi(2) + row.month_cos.powi(2), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_data_file_check() {
    let columns = ColumnSpec::default();

    let no_price = csv_file("Fecha_Pub_DOF,Estado\n2024-01-01,MICH\n");
    let (ok, msg) = validate_data_file(no_price.path(), &columns);
    assert!(!ok);
    assert!(msg.starts_with("missing column"));

    let empty = csv_file("Fecha_Pub_DOF,Precio promedio\n");
    let (ok, msg) = validate_data_file(empty.path(), &columns);
    assert!(!ok);
    assert!(msg.contains("empty"));

    let good = csv_file(SIX_MONTHS);
    assert!(validate_data_file(good.path(), &columns).0);
}
