//! Model training: pipeline fitting, feature/label realignment, and artifact
//! assembly.

use crate::artifact::FittedArtifact;
use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::features::{CyclicalSpec, LagSpec};
use crate::pipeline::FeaturePipeline;
use crate::regressors::RegressorKind;
use std::path::Path;

/// Train a forecasting model on historical data.
///
/// Fits the feature pipeline on `history`, realigns the labels to the rows
/// that survive the lag builder's leakage guard, and fits the requested
/// regressor. The returned artifact is held in memory; persist it with
/// [`FittedArtifact::save`] or use [`train_and_save`].
pub fn train_model(
    history: &TimeSeriesData,
    target_column: &str,
    n_lags: usize,
    kind: RegressorKind,
) -> Result<FittedArtifact> {
    let lags = LagSpec::new(target_column, n_lags)?;
    if history.len() < n_lags + 1 {
        return Err(ForecastError::InsufficientHistory {
            needed: n_lags + 1,
            got: history.len(),
        });
    }

    // Labels must be extracted before the pipeline drops the leading rows.
    let full_labels = history.column(target_column).map_err(|_| {
        ForecastError::InvalidSpec(format!("target column '{}' not found", target_column))
    })?;

    let mut pipeline = FeaturePipeline::new(CyclicalSpec::default(), lags);
    let features = pipeline.fit_transform(history)?;
    if features.is_empty() {
        return Err(ForecastError::InsufficientHistory {
            needed: n_lags + 1,
            got: history.len(),
        });
    }

    // The lag builder dropped exactly n_lags rows from the front, so the
    // i-th feature row belongs to the (i + n_lags)-th original row. Realign
    // the labels by taking the trailing len(features) values, and check the
    // arithmetic instead of assuming it.
    if full_labels.len() != features.len() + n_lags {
        return Err(ForecastError::ColumnMismatch(format!(
            "feature/label alignment failed: {} feature rows + {} dropped lag rows != {} labels",
            features.len(),
            n_lags,
            full_labels.len()
        )));
    }
    let labels = full_labels[full_labels.len() - features.len()..].to_vec();

    let regressor = kind.fit(&features, &labels)?;

    tracing::info!(
        rows = features.len(),
        features = pipeline.feature_names().len(),
        model = kind.name(),
        target = target_column,
        n_lags,
        "trained forecasting model"
    );

    Ok(FittedArtifact::new(
        target_column.to_string(),
        n_lags,
        kind,
        features.len(),
        pipeline,
        regressor,
    ))
}

/// Train a model and persist the artifact to `path` in one call.
pub fn train_and_save<P: AsRef<Path>>(
    history: &TimeSeriesData,
    target_column: &str,
    n_lags: usize,
    kind: RegressorKind,
    path: P,
) -> Result<FittedArtifact> {
    let artifact = train_model(history, target_column, n_lags, kind)?;
    artifact.save(path)?;
    Ok(artifact)
}
