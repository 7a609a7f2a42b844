//! Feature pipeline: cyclical encoding, lag features, and standardization
//! composed into one fit/transform unit, decoupled from the regressor.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::features::{CyclicalSpec, LagSpec};
use serde::{Deserialize, Serialize};

/// Minimum standard deviation before a column is treated as constant.
const STD_FLOOR: f64 = 1e-10;

/// Per-column z-score scaler fitted on training data.
///
/// Stores the training-time mean and sample standard deviation of each
/// column. Transforming always applies the stored statistics; the scaler is
/// never refit at prediction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and standard deviations on a row-major matrix.
    pub fn fit(matrix: &[Vec<f64>]) -> Result<Self> {
        let n_rows = matrix.len();
        if n_rows == 0 {
            return Err(ForecastError::DataError(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }
        let n_cols = matrix[0].len();
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n_cols {
                return Err(ForecastError::ColumnMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
        }

        let mut means = vec![0.0; n_cols];
        for row in matrix {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n_rows as f64;
        }

        let mut stds = vec![0.0; n_cols];
        if n_rows > 1 {
            for row in matrix {
                for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                    *s += (v - m).powi(2);
                }
            }
            for s in &mut stds {
                let std = (*s / (n_rows as f64 - 1.0)).sqrt();
                *s = if std < STD_FLOOR { 1.0 } else { std };
            }
        } else {
            stds.fill(1.0);
        }

        Ok(Self { means, stds })
    }

    /// Apply the stored statistics to a row-major matrix.
    pub fn transform(&self, matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        matrix
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != self.means.len() {
                    return Err(ForecastError::ColumnMismatch(format!(
                        "row {} has {} columns, scaler was fitted on {}",
                        i,
                        row.len(),
                        self.means.len()
                    )));
                }
                Ok(row
                    .iter()
                    .zip(self.means.iter().zip(&self.stds))
                    .map(|(v, (m, s))| (v - m) / s)
                    .collect())
            })
            .collect()
    }

    /// Number of columns the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    /// Per-column training means
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Per-column training standard deviations
    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}

/// Cyclical encoder + lag builder + fitted scaler as one fit/transform unit.
///
/// The encoding and lag stages are stateless; only the scaler and the
/// feature-column order are captured at fit time. Transforming replays the
/// recorded column order, so the downstream regressor always sees the same
/// feature vector shape — including on the small rolling windows the
/// recursive forecaster transforms at prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    cyclical: CyclicalSpec,
    lags: LagSpec,
    scaler: Option<StandardScaler>,
    feature_names: Vec<String>,
}

impl FeaturePipeline {
    pub fn new(cyclical: CyclicalSpec, lags: LagSpec) -> Self {
        Self {
            cyclical,
            lags,
            scaler: None,
            feature_names: Vec::new(),
        }
    }

    pub fn lags(&self) -> &LagSpec {
        &self.lags
    }

    pub fn cyclical(&self) -> &CyclicalSpec {
        &self.cyclical
    }

    /// Feature column order recorded at fit time (empty before fitting).
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn engineer(&self, data: &TimeSeriesData) -> Result<TimeSeriesData> {
        let encoded = self.cyclical.encode(data)?;
        self.lags.build(&encoded)
    }

    /// Fit the scaler on `data` and return the scaled feature matrix.
    pub fn fit_transform(&mut self, data: &TimeSeriesData) -> Result<Vec<Vec<f64>>> {
        let engineered = self.engineer(data)?;
        let time_column = engineered.time_column().to_string();
        let feature_names: Vec<String> = engineered
            .column_names()
            .into_iter()
            .filter(|name| *name != time_column)
            .collect();

        let matrix = to_matrix(&engineered, &feature_names)?;
        let scaler = StandardScaler::fit(&matrix)?;
        let scaled = scaler.transform(&matrix)?;

        self.feature_names = feature_names;
        self.scaler = Some(scaler);
        Ok(scaled)
    }

    /// Transform any slice with the training-time statistics and column
    /// order. Fails with `NotFitted` before `fit_transform` was called.
    pub fn transform(&self, data: &TimeSeriesData) -> Result<Vec<Vec<f64>>> {
        let scaler = self.scaler.as_ref().ok_or(ForecastError::NotFitted)?;
        let engineered = self.engineer(data)?;
        let matrix = to_matrix(&engineered, &self.feature_names)?;
        scaler.transform(&matrix)
    }
}

fn to_matrix(data: &TimeSeriesData, feature_names: &[String]) -> Result<Vec<Vec<f64>>> {
    let columns: Vec<Vec<f64>> = feature_names
        .iter()
        .map(|name| {
            data.column(name).map_err(|_| {
                ForecastError::ColumnMismatch(format!(
                    "feature column '{}' missing from transform input",
                    name
                ))
            })
        })
        .collect::<Result<_>>()?;

    let n_rows = data.len();
    let mut rows = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        rows.push(columns.iter().map(|col| col[i]).collect());
    }
    Ok(rows)
}
