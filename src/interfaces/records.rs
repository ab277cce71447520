use crate::domain::errors::{PredictorError, Result};
use serde::{Deserialize, Serialize};

/// Failure as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: String,
}

impl From<PredictorError> for ErrorRecord {
    fn from(e: PredictorError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

/// Either the operation's record or an error record. Serialised without a
/// tag, so consumers branch on the presence of the `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record<T> {
    Error(ErrorRecord),
    Success(T),
}

impl<T> Record<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Record::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            Record::Success(value) => Some(value),
            Record::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Record::Success(_) => None,
            Record::Error(record) => Some(&record.error),
        }
    }
}

impl<T> From<Result<T>> for Record<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Record::Success(value),
            Err(e) => Record::Error(e.into()),
        }
    }
}

/// Convert a batch of outcomes, keeping positions.
pub fn records<T>(results: Vec<Result<T>>) -> Vec<Record<T>> {
    results.into_iter().map(Record::from).collect()
}
