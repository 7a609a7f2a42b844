//! Fitted training artifact: pipeline state plus regressor parameters,
//! serializable as an opaque bincode blob.

use crate::error::{ForecastError, Result};
use crate::pipeline::FeaturePipeline;
use crate::regressors::{FittedRegressor, RegressorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bumped whenever the serialized layout changes incompatibly.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

/// Everything needed to reproduce predictions without retraining: the fitted
/// feature pipeline (scaler statistics and column order) and the fitted
/// regressor, plus training metadata.
///
/// Immutable after creation; retraining produces a new artifact. A shared
/// reference may be used by concurrent predict calls.
#[derive(Debug, Serialize, Deserialize)]
pub struct FittedArtifact {
    pub schema_version: u32,
    pub target_column: String,
    pub n_lags: usize,
    pub kind: RegressorKind,
    pub trained_at: DateTime<Utc>,
    /// Rows remaining after the lag builder dropped the leading window.
    pub training_rows: usize,
    pub(crate) pipeline: FeaturePipeline,
    pub(crate) regressor: FittedRegressor,
}

impl FittedArtifact {
    pub(crate) fn new(
        target_column: String,
        n_lags: usize,
        kind: RegressorKind,
        training_rows: usize,
        pipeline: FeaturePipeline,
        regressor: FittedRegressor,
    ) -> Self {
        Self {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            target_column,
            n_lags,
            kind,
            trained_at: Utc::now(),
            training_rows,
            pipeline,
            regressor,
        }
    }

    /// The fitted feature pipeline.
    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }

    /// The fitted regressor.
    pub fn regressor(&self) -> &FittedRegressor {
        &self.regressor
    }

    /// Serialize the artifact to a file as a bincode blob.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| ForecastError::SerializationError(e.to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Load an artifact previously written by [`FittedArtifact::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path)?;
        let artifact: FittedArtifact = bincode::deserialize(&bytes)
            .map_err(|e| ForecastError::SerializationError(e.to_string()))?;
        if artifact.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(ForecastError::SerializationError(format!(
                "unsupported artifact schema version {} (expected {})",
                artifact.schema_version, ARTIFACT_SCHEMA_VERSION
            )));
        }
        Ok(artifact)
    }
}
