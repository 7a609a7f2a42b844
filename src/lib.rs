//! # PV Forecast
//!
//! A Rust library for short-horizon photovoltaic generation forecasting.
//!
//! ## Features
//!
//! - Timestamp-indexed tabular data handling (weather + generation series)
//! - Cyclical encoding of calendar attributes (hour, weekday, month,
//!   leap-aware day-of-year)
//! - Autoregressive lag features with a leakage guard
//! - A fit/transform feature pipeline with a fitted standard scaler
//! - A closed registry of point regressors (linear, ridge, lasso, tree,
//!   random forest, k-nearest)
//! - Recursive multi-step forecasting that feeds each prediction back into
//!   the next step's lag window
//! - Serializable training artifacts for predicting without retraining
//!
//! ## Quick Start
//!
//! ```no_run
//! use pv_forecast::{predict_future, train_model, RegressorKind, TimeSeriesData};
//!
//! fn main() -> pv_forecast::Result<()> {
//!     // Historical weather + generation rows, hourly, time-sorted
//!     let history = TimeSeriesData::from_csv("history.csv", "timestamp")?;
//!
//!     // Fit the feature pipeline and a regressor against 24 hours of lags
//!     let artifact = train_model(&history, "pv_output", 24, RegressorKind::RandomForest)?;
//!     artifact.save("pv_model.bin")?;
//!
//!     // Forecast the next 24 hours from fresh weather data
//!     let future = TimeSeriesData::from_csv("weather_forecast.csv", "timestamp")?;
//!     let forecast = predict_future(&artifact, &history.tail(24), &future, 24)?;
//!
//!     for (timestamp, value) in forecast.iter() {
//!         println!("{}: {:.2}", timestamp, value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod data;
pub mod error;
pub mod features;
pub mod forecaster;
pub mod pipeline;
pub mod regressors;
pub mod trainer;
pub mod utils;

// Re-export commonly used types
pub use crate::artifact::FittedArtifact;
pub use crate::data::TimeSeriesData;
pub use crate::error::{ForecastError, Result};
pub use crate::features::{CalendarAttribute, CyclePeriod, CyclicalSpec, LagSpec};
pub use crate::forecaster::{predict_future, ForecastResult};
pub use crate::pipeline::{FeaturePipeline, StandardScaler};
pub use crate::regressors::{FittedRegressor, RegressorKind};
pub use crate::trainer::{train_and_save, train_model};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
