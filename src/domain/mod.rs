// Historical analytics value types
pub mod analytics;

// Domain-specific error types
pub mod errors;

// Feature schema shared with trained models
pub mod ml;

// Port interfaces
pub mod ports;

// Prediction records and predictor state
pub mod prediction;

// Price history
pub mod series;
