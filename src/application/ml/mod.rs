pub mod artifact;
pub mod horizon;
pub mod kernel_svr;
pub mod predictor;
pub mod scaler;
pub mod smartcore_predictor;

pub use horizon::{ProjectionReport, future_dates, project};
pub use predictor::PricePredictor;
