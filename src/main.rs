use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commodity_predictor::application::analytics::{
    DEFAULT_TREND_WINDOWS, descriptive_stats, trend_report, volatility,
};
use commodity_predictor::application::ml::predictor::parse_date;
use commodity_predictor::application::ml::{PricePredictor, project};
use commodity_predictor::config::AppConfig;
use commodity_predictor::domain::errors::{self, PredictorError};
use commodity_predictor::domain::series::HistoricalSeries;
use commodity_predictor::infrastructure::validate_data_file;
use commodity_predictor::interfaces::{Record, records};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Commodity price prediction and historical analytics", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the price for one date (YYYY-MM-DD)
    Predict { date: String },

    /// Predict one price every 30 days after START
    Batch {
        start: String,

        /// Number of months (1 to 24)
        months: u32,
    },

    /// Trend summaries over the last N months of history
    Trend {
        /// Window sizes in months
        months: Vec<u32>,
    },

    /// Volatility analysis of the whole history
    Volatility,

    /// Descriptive statistics of the history
    Stats,

    /// Report which model components are loaded
    Validate,

    /// Hyperparameters and feature layout of the loaded model
    Info,

    /// Check a history file without loading the model
    CheckData {
        /// Defaults to the configured data path
        path: Option<PathBuf>,
    },
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn history(predictor: &PricePredictor) -> errors::Result<&HistoricalSeries> {
    predictor
        .history()
        .ok_or_else(|| PredictorError::InsufficientData("no historical data loaded".to_string()))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    if let Commands::CheckData { path } = &cli.command {
        let path = path.clone().unwrap_or_else(|| config.data_path.clone());
        let (valid, message) = validate_data_file(&path, &config.columns());
        return print(&json!({ "valid": valid, "message": message }));
    }

    let predictor = config.build_predictor();
    info!("Predictor state: {:?}", predictor.state());

    match cli.command {
        Commands::Predict { date } => print(&Record::from(predictor.predict(&date))),
        Commands::Batch { start, months } => {
            let report = parse_date(&start).and_then(|s| project(&predictor, s, months));
            print(&Record::from(report))
        }
        Commands::Trend { months } => {
            let windows = if months.is_empty() {
                DEFAULT_TREND_WINDOWS.to_vec()
            } else {
                months
            };
            match history(&predictor) {
                Ok(series) => print(&records(trend_report(series, &windows))),
                Err(e) => print(&Record::<()>::from(Err(e))),
            }
        }
        Commands::Volatility => print(&Record::from(history(&predictor).and_then(volatility))),
        Commands::Stats => print(&Record::from(history(&predictor).and_then(descriptive_stats))),
        Commands::Validate => print(&predictor.validate()),
        Commands::Info => print(&Record::from(predictor.model_info())),
        Commands::CheckData { .. } => Ok(()),
    }
}
