//! Trend and volatility analytics over the historical series.
//!
//! Independent of the trained model: these run even when the artifact failed
//! to load, as long as history is available.

pub mod statistics;
pub mod trend;
pub mod volatility;

pub use trend::{DEFAULT_TREND_WINDOWS, trend, trend_report};
pub use volatility::{count_streaks, descriptive_stats, volatility};
