//! Point-regression plug-in point: a closed registry of algorithm kinds and
//! a serializable dispatch enum over the fitted smartcore models.
//!
//! The registry replaces name-based dynamic lookup with a fixed enumeration
//! resolved up front; an unregistered name fails fast with
//! `UnknownRegressorKind` instead of surfacing later inside training.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::lasso::{Lasso, LassoParameters};
use smartcore::linear::linear_regression::LinearRegression;
use smartcore::linear::ridge_regression::{RidgeRegression, RidgeRegressionParameters};
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_regressor::{KNNRegressor, KNNRegressorParameters};
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};

/// Fixed seed for ensemble bootstrap sampling; predictions must be
/// reproducible from a fixed artifact.
const FOREST_SEED: u64 = 42;

/// Registered point-regression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegressorKind {
    Linear,
    Ridge,
    Lasso,
    DecisionTree,
    RandomForest,
    KNearest,
}

impl RegressorKind {
    /// Every registered kind, in registry order.
    pub const ALL: [RegressorKind; 6] = [
        RegressorKind::Linear,
        RegressorKind::Ridge,
        RegressorKind::Lasso,
        RegressorKind::DecisionTree,
        RegressorKind::RandomForest,
        RegressorKind::KNearest,
    ];

    /// Canonical name of the algorithm kind.
    pub fn name(&self) -> &'static str {
        match self {
            RegressorKind::Linear => "linear",
            RegressorKind::Ridge => "ridge",
            RegressorKind::Lasso => "lasso",
            RegressorKind::DecisionTree => "decision_tree",
            RegressorKind::RandomForest => "random_forest",
            RegressorKind::KNearest => "k_nearest",
        }
    }

    /// Resolve a kind from its name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linear" | "linear_regression" => Ok(RegressorKind::Linear),
            "ridge" => Ok(RegressorKind::Ridge),
            "lasso" => Ok(RegressorKind::Lasso),
            "decision_tree" | "tree" => Ok(RegressorKind::DecisionTree),
            "random_forest" | "forest" => Ok(RegressorKind::RandomForest),
            "k_nearest" | "knn" => Ok(RegressorKind::KNearest),
            _ => Err(ForecastError::UnknownRegressorKind(name.to_string())),
        }
    }

    /// Fit the algorithm on a row-major feature matrix and labels.
    pub fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<FittedRegressor> {
        if x.len() != y.len() {
            return Err(ForecastError::ColumnMismatch(format!(
                "{} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        let matrix = dense_matrix(x)?;
        let labels = y.to_vec();

        let fitted = match self {
            RegressorKind::Linear => FittedRegressor::Linear(
                LinearRegression::fit(&matrix, &labels, Default::default())
                    .map_err(training_error)?,
            ),
            RegressorKind::Ridge => FittedRegressor::Ridge(
                RidgeRegression::fit(&matrix, &labels, RidgeRegressionParameters::default())
                    .map_err(training_error)?,
            ),
            RegressorKind::Lasso => FittedRegressor::Lasso(
                Lasso::fit(&matrix, &labels, LassoParameters::default())
                    .map_err(training_error)?,
            ),
            RegressorKind::DecisionTree => FittedRegressor::DecisionTree(
                DecisionTreeRegressor::fit(
                    &matrix,
                    &labels,
                    DecisionTreeRegressorParameters::default(),
                )
                .map_err(training_error)?,
            ),
            RegressorKind::RandomForest => FittedRegressor::RandomForest(
                RandomForestRegressor::fit(&matrix, &labels, forest_parameters())
                    .map_err(training_error)?,
            ),
            RegressorKind::KNearest => FittedRegressor::KNearest(
                KNNRegressor::fit(&matrix, &labels, KNNRegressorParameters::default().with_k(3))
                    .map_err(training_error)?,
            ),
        };

        Ok(fitted)
    }
}

/// Conservative, seeded forest parameters: bounded depth keeps memory flat,
/// the fixed seed keeps predictions reproducible.
fn forest_parameters() -> RandomForestRegressorParameters {
    RandomForestRegressorParameters {
        max_depth: Some(10),
        min_samples_leaf: 2,
        min_samples_split: 5,
        n_trees: 50,
        m: None,
        keep_samples: false,
        seed: FOREST_SEED,
    }
}

/// Fitted regression model, dispatching over the registered algorithms.
#[derive(Debug, Serialize, Deserialize)]
pub enum FittedRegressor {
    Linear(LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    Ridge(RidgeRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    Lasso(Lasso<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    DecisionTree(DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    RandomForest(RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>),
    KNearest(KNNRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>, Euclidian<f64>>),
}

impl FittedRegressor {
    /// The kind this model was fitted as.
    pub fn kind(&self) -> RegressorKind {
        match self {
            FittedRegressor::Linear(_) => RegressorKind::Linear,
            FittedRegressor::Ridge(_) => RegressorKind::Ridge,
            FittedRegressor::Lasso(_) => RegressorKind::Lasso,
            FittedRegressor::DecisionTree(_) => RegressorKind::DecisionTree,
            FittedRegressor::RandomForest(_) => RegressorKind::RandomForest,
            FittedRegressor::KNearest(_) => RegressorKind::KNearest,
        }
    }

    /// Predict one value per row of a row-major feature matrix.
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.predict_matrix(&dense_matrix(x)?)
    }

    /// Predict a single value from one feature vector.
    pub fn predict_one(&self, features: &[f64]) -> Result<f64> {
        let matrix = DenseMatrix::new(1, features.len(), features.to_vec(), false);
        let predictions = self.predict_matrix(&matrix)?;
        predictions.first().copied().ok_or_else(|| {
            ForecastError::PredictionError("regressor returned no predictions".to_string())
        })
    }

    fn predict_matrix(&self, matrix: &DenseMatrix<f64>) -> Result<Vec<f64>> {
        let predictions = match self {
            FittedRegressor::Linear(model) => model.predict(matrix),
            FittedRegressor::Ridge(model) => model.predict(matrix),
            FittedRegressor::Lasso(model) => model.predict(matrix),
            FittedRegressor::DecisionTree(model) => model.predict(matrix),
            FittedRegressor::RandomForest(model) => model.predict(matrix),
            FittedRegressor::KNearest(model) => model.predict(matrix),
        };
        predictions.map_err(|e| ForecastError::PredictionError(e.to_string()))
    }
}

fn dense_matrix(x: &[Vec<f64>]) -> Result<DenseMatrix<f64>> {
    if x.is_empty() {
        return Err(ForecastError::DataError(
            "cannot build a matrix from zero rows".to_string(),
        ));
    }

    let n_rows = x.len();
    let n_features = x[0].len();
    let mut flat = Vec::with_capacity(n_rows * n_features);
    for (i, row) in x.iter().enumerate() {
        if row.len() != n_features {
            return Err(ForecastError::ColumnMismatch(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                n_features
            )));
        }
        flat.extend_from_slice(row);
    }

    Ok(DenseMatrix::new(n_rows, n_features, flat, false))
}

fn training_error(err: smartcore::error::Failed) -> ForecastError {
    ForecastError::TrainingError(err.to_string())
}
