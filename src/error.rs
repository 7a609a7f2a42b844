//! Error types for the pv_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the pv_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed cyclical or lag configuration
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// Not enough rows to build lag features for training
    #[error("insufficient history: need at least {needed} rows, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// History tail cannot supply enough trailing target observations
    #[error("insufficient history tail: need at least {needed} trailing rows, got {got}")]
    InsufficientHistoryTail { needed: usize, got: usize },

    /// Future exogenous input has fewer rows than the requested horizon
    #[error("insufficient future data: need at least {needed} rows, got {got}")]
    InsufficientFutureData { needed: usize, got: usize },

    /// Requested regressor name is not registered
    #[error("unknown regressor kind: {0}")]
    UnknownRegressorKind(String),

    /// Feature/label alignment or column layout failure
    #[error("column mismatch: {0}")]
    ColumnMismatch(String),

    /// Pipeline used before fitting
    #[error("pipeline must be fitted before transform")]
    NotFitted,

    /// Error related to data validation or processing
    #[error("data error: {0}")]
    DataError(String),

    /// Error from the underlying regression algorithm during fitting
    #[error("training error: {0}")]
    TrainingError(String),

    /// Error from the underlying regression algorithm during prediction
    #[error("prediction error: {0}")]
    PredictionError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("polars error: {0}")]
    PolarsError(String),

    /// Error while (de)serializing a fitted artifact
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
