//! Recursive multi-step forecasting: each step's prediction becomes history
//! for the next step's lag window.

use crate::artifact::FittedArtifact;
use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ordered (timestamp, prediction) pairs, one per forecast step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl ForecastResult {
    pub(crate) fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::ColumnMismatch(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        Ok(Self { timestamps, values })
    }

    /// Predicted values in timestamp order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Forecast timestamps, taken from the future exogenous index
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Number of forecast steps
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (timestamp, prediction) pairs
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Serialize the forecast as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ForecastError::SerializationError(e.to_string()))
    }
}

/// Produce a `steps`-long forecast by iterative feedback.
///
/// `history_tail` must be the most recent observed rows including the target
/// column, at least `n_lags` of them; `future_exogenous` must cover the first
/// `steps` future timestamps with every non-target feature column populated.
///
/// Each step builds a window from the trailing `n_lags` rows of an owned
/// accumulator plus the step's exogenous row carrying a placeholder target
/// (the most recently known or generated value — the lag builder discards it,
/// it is only present to satisfy the transform's column contract), transforms
/// the window, predicts from the last produced feature row, and appends the
/// predicted row to the accumulator so the next step sees it as history.
///
/// The caller's `history_tail` is never mutated, so independent callers may
/// share one artifact concurrently. Deterministic for fixed inputs. Steps are
/// inherently sequential and must not be parallelized: step i+1's lag window
/// contains step i's output.
pub fn predict_future(
    artifact: &FittedArtifact,
    history_tail: &TimeSeriesData,
    future_exogenous: &TimeSeriesData,
    steps: usize,
) -> Result<ForecastResult> {
    if steps == 0 {
        return Err(ForecastError::InvalidSpec(
            "forecast horizon must be at least 1 step".to_string(),
        ));
    }

    let n_lags = artifact.n_lags;
    let target = artifact.target_column.as_str();

    if future_exogenous.len() < steps {
        return Err(ForecastError::InsufficientFutureData {
            needed: steps,
            got: future_exogenous.len(),
        });
    }
    if !history_tail.has_column(target) {
        return Err(ForecastError::ColumnMismatch(format!(
            "history tail lacks target column '{}'",
            target
        )));
    }
    if history_tail.len() < n_lags {
        return Err(ForecastError::InsufficientHistoryTail {
            needed: n_lags,
            got: history_tail.len(),
        });
    }

    let future_timestamps = future_exogenous.timestamps()?;

    // Owned accumulator: predictions are appended here, never to the
    // caller's frame.
    let mut tail = history_tail.clone();
    let mut values = Vec::with_capacity(steps);

    for i in 0..steps {
        let mut row = future_exogenous.row(i)?;

        let observed = tail.column(target)?;
        let placeholder = observed.last().copied().ok_or_else(|| {
            ForecastError::InsufficientHistoryTail {
                needed: n_lags,
                got: 0,
            }
        })?;
        row.set_column_scalar(target, placeholder)?;

        // n_lags rows of lag context plus the placeholder row: the lag
        // builder drops the context rows, leaving exactly one feature row.
        let window = tail.tail(n_lags).append(&row)?;
        let features = artifact.pipeline().transform(&window)?;
        let step_features = features.last().ok_or_else(|| {
            ForecastError::PredictionError("pipeline produced no feature rows".to_string())
        })?;

        let prediction = artifact.regressor().predict_one(step_features)?;
        tracing::debug!(step = i, prediction, "recursive forecast step");

        row.set_column_scalar(target, prediction)?;
        tail = tail.append(&row)?;
        values.push(prediction);
    }

    ForecastResult::new(future_timestamps[..steps].to_vec(), values)
}
