use assert_approx_eq::assert_approx_eq;
use pv_forecast::error::ForecastError;
use pv_forecast::regressors::RegressorKind;
use rstest::rstest;

fn linear_data(n: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let x: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i as f64 / 3.0).sin()]).collect();
    let y: Vec<f64> = x.iter().map(|row| 2.0 * row[0] + 1.0).collect();
    (x, y)
}

#[rstest]
#[case(RegressorKind::Linear)]
#[case(RegressorKind::Ridge)]
#[case(RegressorKind::Lasso)]
#[case(RegressorKind::DecisionTree)]
#[case(RegressorKind::RandomForest)]
#[case(RegressorKind::KNearest)]
fn test_registry_roundtrips_names(#[case] kind: RegressorKind) {
    assert_eq!(RegressorKind::from_name(kind.name()).unwrap(), kind);
}

#[test]
fn test_registry_is_case_insensitive_and_knows_aliases() {
    assert_eq!(
        RegressorKind::from_name("LINEAR").unwrap(),
        RegressorKind::Linear
    );
    assert_eq!(
        RegressorKind::from_name("knn").unwrap(),
        RegressorKind::KNearest
    );
    assert_eq!(
        RegressorKind::from_name("forest").unwrap(),
        RegressorKind::RandomForest
    );
}

#[test]
fn test_unknown_regressor_kind() {
    match RegressorKind::from_name("svr") {
        Err(ForecastError::UnknownRegressorKind(name)) => assert_eq!(name, "svr"),
        other => panic!("expected UnknownRegressorKind, got {:?}", other),
    }
}

#[test]
fn test_registry_covers_all_kinds() {
    assert_eq!(RegressorKind::ALL.len(), 6);
    for kind in RegressorKind::ALL {
        assert_eq!(RegressorKind::from_name(kind.name()).unwrap(), kind);
    }
}

#[test]
fn test_linear_regressor_fits_linear_target_exactly() {
    let (x, y) = linear_data(30);
    let fitted = RegressorKind::Linear.fit(&x, &y).unwrap();
    assert_eq!(fitted.kind(), RegressorKind::Linear);

    let predictions = fitted.predict(&x).unwrap();
    assert_eq!(predictions.len(), y.len());
    for (p, actual) in predictions.iter().zip(&y) {
        assert_approx_eq!(p, actual, 1e-6);
    }
}

#[test]
fn test_predict_one_matches_batch_prediction() {
    let (x, y) = linear_data(30);
    let fitted = RegressorKind::Linear.fit(&x, &y).unwrap();

    let batch = fitted.predict(&x).unwrap();
    let single = fitted.predict_one(&x[7]).unwrap();
    assert_eq!(single, batch[7]);
}

#[test]
fn test_fit_rejects_mismatched_lengths() {
    let (x, mut y) = linear_data(30);
    y.pop();
    assert!(matches!(
        RegressorKind::Linear.fit(&x, &y),
        Err(ForecastError::ColumnMismatch(_))
    ));
}

#[rstest]
#[case(RegressorKind::DecisionTree)]
#[case(RegressorKind::RandomForest)]
#[case(RegressorKind::KNearest)]
fn test_nonlinear_regressors_produce_finite_predictions(#[case] kind: RegressorKind) {
    let (x, y) = linear_data(40);
    let fitted = kind.fit(&x, &y).unwrap();

    let predictions = fitted.predict(&x).unwrap();
    assert_eq!(predictions.len(), y.len());
    for p in predictions {
        assert!(p.is_finite());
    }
}

#[test]
fn test_seeded_forest_is_reproducible_across_fits() {
    let (x, y) = linear_data(40);
    let first = RegressorKind::RandomForest.fit(&x, &y).unwrap();
    let second = RegressorKind::RandomForest.fit(&x, &y).unwrap();

    assert_eq!(
        first.predict(&x).unwrap(),
        second.predict(&x).unwrap()
    );
}
