//! Basic tests for the regression model and its metrics.

use house_prices::ml::models::{ModelEvaluator, SupervisedModel};
use house_prices::{
    mean_absolute_error, mean_squared_error, r2_score, root_mean_squared_error, Column,
    DataFrame, RandomForestRegressor, Series,
};

/// Synthetic regression set: y = 3*x1 + x2 with two numeric features
fn synthetic_frame(n: usize) -> DataFrame {
    let x1: Vec<f64> = (0..n).map(|i| (i % 13) as f64).collect();
    let x2: Vec<f64> = (0..n).map(|i| (i % 7) as f64).collect();
    let y: Vec<f64> = x1.iter().zip(&x2).map(|(a, b)| 3.0 * a + b).collect();

    let mut df = DataFrame::new();
    df.add_column(
        "x1".to_string(),
        Column::Float64(Series::from_vec(x1, Some("x1".to_string()))),
    )
    .unwrap();
    df.add_column(
        "x2".to_string(),
        Column::Float64(Series::from_vec(x2, Some("x2".to_string()))),
    )
    .unwrap();
    df.add_column(
        "y".to_string(),
        Column::Float64(Series::from_vec(y, Some("y".to_string()))),
    )
    .unwrap();
    df
}

#[test]
fn forest_fits_and_predicts_one_value_per_row() {
    let df = synthetic_frame(60);
    let mut model = RandomForestRegressor::new().n_estimators(15).random_seed(42);
    model.fit(&df, "y").unwrap();

    let predictions = model.predict(&df).unwrap();
    assert_eq!(predictions.len(), 60);
    assert!(predictions.iter().all(|p| p.is_finite()));
}

#[test]
fn forest_explains_the_training_signal() {
    let df = synthetic_frame(80);
    let mut model = RandomForestRegressor::new().n_estimators(25).random_seed(7);
    model.fit(&df, "y").unwrap();

    let metrics = model.evaluate(&df, "y").unwrap();
    let r2 = *metrics.get_metric("r2").unwrap();
    assert!(r2 > 0.9, "training-set r2 unexpectedly low: {}", r2);
}

#[test]
fn forest_cross_validation_returns_one_result_per_fold() {
    let df = synthetic_frame(40);
    let model = RandomForestRegressor::new().n_estimators(8).random_seed(3);

    let results = model.cross_validate(&df, "y", 5).unwrap();
    assert_eq!(results.len(), 5);
    for metrics in &results {
        assert!(metrics.get_metric("rmse").unwrap().is_finite());
    }
}

#[test]
fn forest_ignores_the_target_among_features() {
    let df = synthetic_frame(30);
    let mut model = RandomForestRegressor::new().n_estimators(5).random_seed(1);
    model.fit(&df, "y").unwrap();

    let names = model.feature_names().unwrap();
    assert!(!names.contains(&"y".to_string()));
    assert_eq!(names.len(), 2);
}

#[test]
fn metrics_known_answers() {
    let y_true = [2.0, 4.0, 6.0];
    let y_pred = [2.0, 5.0, 4.0];

    // errors: 0, -1, 2
    assert!((mean_squared_error(&y_true, &y_pred).unwrap() - 5.0 / 3.0).abs() < 1e-12);
    assert!(
        (root_mean_squared_error(&y_true, &y_pred).unwrap() - (5.0f64 / 3.0).sqrt()).abs()
            < 1e-12
    );
    assert!((mean_absolute_error(&y_true, &y_pred).unwrap() - 1.0).abs() < 1e-12);

    let r2 = r2_score(&y_true, &y_pred).unwrap();
    // ss_tot = 8, ss_res = 5
    assert!((r2 - (1.0 - 5.0 / 8.0)).abs() < 1e-12);
}
