use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Percent change beyond which a move counts as a trend.
pub const TREND_THRESHOLD_PCT: f64 = 5.0;

/// Direction of a price move over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Stable,
}

impl TrendDirection {
    /// Classify a percent change. The ±5% bounds themselves are `Stable`.
    pub fn classify(pct_change: f64) -> Self {
        if pct_change > TREND_THRESHOLD_PCT {
            TrendDirection::Bullish
        } else if pct_change < -TREND_THRESHOLD_PCT {
            TrendDirection::Bearish
        } else {
            TrendDirection::Stable
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Bullish => write!(f, "Bullish"),
            TrendDirection::Bearish => write!(f, "Bearish"),
            TrendDirection::Stable => write!(f, "Stable"),
        }
    }
}

/// Price movement over the trailing `period` calendar months.
/// All amounts are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub period: String,
    pub price_start: f64,
    pub price_end: f64,
    pub abs_change: f64,
    pub pct_change: f64,
    pub direction: TrendDirection,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub volatility: f64,
}

/// Coefficient-of-variation bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl VolatilityLevel {
    /// `cv_pct` is the coefficient of variation expressed as a percentage.
    pub fn classify(cv_pct: f64) -> Self {
        if cv_pct < 15.0 {
            VolatilityLevel::Low
        } else if cv_pct < 30.0 {
            VolatilityLevel::Moderate
        } else if cv_pct < 50.0 {
            VolatilityLevel::High
        } else {
            VolatilityLevel::VeryHigh
        }
    }
}

/// Number of maximal positive and negative runs in a difference series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakCount {
    pub bullish: usize,
    pub bearish: usize,
}

/// Dispersion and return statistics of the full series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityReport {
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub daily_volatility: f64,
    pub annualized_volatility: f64,
    pub mean_return: f64,
    pub max_return: f64,
    pub min_return: f64,
    pub positive_returns: usize,
    pub negative_returns: usize,
    pub percentile_5: f64,
    pub percentile_95: f64,
    pub inter_percentile_range: f64,
    pub streaks: StreakCount,
    pub level: VolatilityLevel,
}

/// Descriptive statistics over the whole history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub total_records: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub median: f64,
    pub coefficient_of_variation: f64,
    pub price_range: f64,
    pub relative_range: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_classification() {
        assert_eq!(TrendDirection::classify(6.0), TrendDirection::Bullish);
        assert_eq!(TrendDirection::classify(-6.0), TrendDirection::Bearish);
        assert_eq!(TrendDirection::classify(2.0), TrendDirection::Stable);
    }

    #[test]
    fn test_trend_threshold_is_exclusive() {
        assert_eq!(TrendDirection::classify(5.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(-5.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(5.0001), TrendDirection::Bullish);
    }

    #[test]
    fn test_volatility_bands() {
        assert_eq!(VolatilityLevel::classify(14.9), VolatilityLevel::Low);
        assert_eq!(VolatilityLevel::classify(15.0), VolatilityLevel::Moderate);
        assert_eq!(VolatilityLevel::classify(30.0), VolatilityLevel::High);
        assert_eq!(VolatilityLevel::classify(49.9), VolatilityLevel::High);
        assert_eq!(VolatilityLevel::classify(50.0), VolatilityLevel::VeryHigh);
    }
}
