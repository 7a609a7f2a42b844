use assert_approx_eq::assert_approx_eq;
use chrono::{DateTime, Duration, Utc};
use pv_forecast::data::TimeSeriesData;
use pv_forecast::error::ForecastError;
use pv_forecast::features::{CyclicalSpec, LagSpec};
use pv_forecast::pipeline::{FeaturePipeline, StandardScaler};

fn weather_series(n: usize) -> TimeSeriesData {
    let start: DateTime<Utc> = "2023-06-01T00:00:00Z".parse().unwrap();
    let timestamps: Vec<_> = (0..n).map(|i| start + Duration::hours(i as i64)).collect();
    let pv: Vec<f64> = (0..n).map(|i| (i % 24) as f64 * 0.5).collect();
    let temp: Vec<f64> = (0..n).map(|i| 15.0 + (i as f64 / 6.0).sin() * 5.0).collect();
    TimeSeriesData::new(timestamps, vec![("pv_output", pv), ("temp", temp)]).unwrap()
}

fn fitted_pipeline(data: &TimeSeriesData, n_lags: usize) -> (FeaturePipeline, Vec<Vec<f64>>) {
    let mut pipeline = FeaturePipeline::new(
        CyclicalSpec::default(),
        LagSpec::new("pv_output", n_lags).unwrap(),
    );
    let matrix = pipeline.fit_transform(data).unwrap();
    (pipeline, matrix)
}

#[test]
fn test_fit_transform_shape_and_column_order() {
    let data = weather_series(30);
    let (pipeline, matrix) = fitted_pipeline(&data, 2);

    // 30 input rows minus 2 lag rows
    assert_eq!(matrix.len(), 28);
    // temp + 4 sin/cos pairs + 2 lags
    assert_eq!(pipeline.feature_names().len(), 11);
    for row in &matrix {
        assert_eq!(row.len(), 11);
    }

    let names = pipeline.feature_names();
    assert!(names.contains(&"temp".to_string()));
    assert!(names.contains(&"hour_sin".to_string()));
    assert!(names.contains(&"pv_output_lag_1".to_string()));
    assert!(names.contains(&"pv_output_lag_2".to_string()));
    // the label never leaks into the feature set
    assert!(!names.contains(&"pv_output".to_string()));
}

#[test]
fn test_training_matrix_is_standardized() {
    let data = weather_series(30);
    let (_, matrix) = fitted_pipeline(&data, 2);

    let n = matrix.len() as f64;
    for col in 0..matrix[0].len() {
        let mean: f64 = matrix.iter().map(|row| row[col]).sum::<f64>() / n;
        assert_approx_eq!(mean, 0.0, 1e-9);
    }
}

#[test]
fn test_transform_replays_training_statistics() {
    let data = weather_series(30);
    let (pipeline, fitted) = fitted_pipeline(&data, 2);

    // transforming the training data reproduces the fit output exactly
    let replayed = pipeline.transform(&data).unwrap();
    assert_eq!(replayed, fitted);
}

#[test]
fn test_rolling_window_matches_full_history() {
    // the recursive forecaster transforms small windows; the last feature
    // row of a trailing window must equal the last row of the full
    // transform, statistics included
    let data = weather_series(30);
    let (pipeline, fitted) = fitted_pipeline(&data, 2);

    let window = data.tail(3); // n_lags + 1 rows
    let from_window = pipeline.transform(&window).unwrap();

    assert_eq!(from_window.len(), 1);
    assert_eq!(from_window[0], *fitted.last().unwrap());
}

#[test]
fn test_transform_before_fit_fails() {
    let pipeline = FeaturePipeline::new(
        CyclicalSpec::default(),
        LagSpec::new("pv_output", 2).unwrap(),
    );
    let data = weather_series(10);
    assert!(matches!(
        pipeline.transform(&data),
        Err(ForecastError::NotFitted)
    ));
}

#[test]
fn test_transform_missing_feature_column() {
    let data = weather_series(30);
    let (pipeline, _) = fitted_pipeline(&data, 2);

    // a window without the temp column cannot satisfy the recorded layout
    let start: DateTime<Utc> = "2023-07-01T00:00:00Z".parse().unwrap();
    let timestamps: Vec<_> = (0..4).map(|i| start + Duration::hours(i as i64)).collect();
    let window =
        TimeSeriesData::new(timestamps, vec![("pv_output", vec![1.0, 2.0, 3.0, 4.0])]).unwrap();

    assert!(matches!(
        pipeline.transform(&window),
        Err(ForecastError::ColumnMismatch(_))
    ));
}

#[test]
fn test_scaler_statistics() {
    let matrix = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
    let scaler = StandardScaler::fit(&matrix).unwrap();

    assert_eq!(scaler.n_features(), 2);
    assert_approx_eq!(scaler.means()[0], 3.0, 1e-12);
    assert_approx_eq!(scaler.means()[1], 10.0, 1e-12);
    // sample std of [1, 3, 5]
    assert_approx_eq!(scaler.stds()[0], 2.0, 1e-12);
    // constant column: std floored to 1.0 instead of dividing by ~0
    assert_approx_eq!(scaler.stds()[1], 1.0, 1e-12);

    let scaled = scaler.transform(&[vec![3.0, 10.0]]).unwrap();
    assert_approx_eq!(scaled[0][0], 0.0, 1e-12);
    assert_approx_eq!(scaled[0][1], 0.0, 1e-12);
}

#[test]
fn test_scaler_rejects_bad_shapes() {
    assert!(matches!(
        StandardScaler::fit(&[]),
        Err(ForecastError::DataError(_))
    ));
    assert!(matches!(
        StandardScaler::fit(&[vec![1.0, 2.0], vec![1.0]]),
        Err(ForecastError::ColumnMismatch(_))
    ));

    let scaler = StandardScaler::fit(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert!(matches!(
        scaler.transform(&[vec![1.0]]),
        Err(ForecastError::ColumnMismatch(_))
    ));
}
