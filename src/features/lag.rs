//! Autoregressive lag features.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Lag feature configuration: target column plus lag count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagSpec {
    target_column: String,
    n_lags: usize,
}

impl LagSpec {
    /// Create a lag spec. `n_lags` must be at least 1.
    pub fn new(target_column: impl Into<String>, n_lags: usize) -> Result<Self> {
        if n_lags == 0 {
            return Err(ForecastError::InvalidSpec(
                "n_lags must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            target_column: target_column.into(),
            n_lags,
        })
    }

    /// Name of the target column the lags are derived from.
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// Number of lag columns produced.
    pub fn n_lags(&self) -> usize {
        self.n_lags
    }

    /// Names of the derived lag columns, `<target>_lag_1..n`.
    pub fn lag_column_names(&self) -> Vec<String> {
        (1..=self.n_lags)
            .map(|k| format!("{}_lag_{}", self.target_column, k))
            .collect()
    }

    /// Derive lag features from the target column.
    ///
    /// Appends `n_lags` columns where column k holds the target value k rows
    /// earlier in time order, drops the first `n_lags` rows (their shift
    /// window reaches before the start of the table, so keeping them would
    /// fabricate history), and removes the raw target column — it is the
    /// label, not a feature, except through its lags.
    ///
    /// Output row count = input row count − n_lags, order preserved.
    pub fn build(&self, data: &TimeSeriesData) -> Result<TimeSeriesData> {
        if !data.has_column(&self.target_column) {
            return Err(ForecastError::InvalidSpec(format!(
                "target column '{}' not found",
                self.target_column
            )));
        }
        if data.len() < self.n_lags + 1 {
            return Err(ForecastError::InsufficientHistory {
                needed: self.n_lags + 1,
                got: data.len(),
            });
        }

        let target = data.column(&self.target_column)?;
        let mut out = data.clone();

        for k in 1..=self.n_lags {
            // Rows i < k get a filler value; they are sliced off below before
            // anything can observe it.
            let lagged: Vec<f64> = (0..target.len())
                .map(|i| if i >= k { target[i - k] } else { 0.0 })
                .collect();
            out.add_column(&format!("{}_lag_{}", self.target_column, k), lagged)?;
        }

        out.skip_rows(self.n_lags).drop_column(&self.target_column)
    }
}
