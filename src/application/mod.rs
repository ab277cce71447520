// Trend, volatility and descriptive statistics over the history
pub mod analytics;

// Feature synthesis from the raw price series
pub mod feature_engineering_service;

// Trained model components and the prediction engine
pub mod ml;
