//! Regression model evaluation metrics

use crate::core::error::{Error, Result};

fn check_inputs(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::InconsistentRowCount {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(Error::EmptyData(
            "cannot compute a metric on empty data".to_string(),
        ));
    }
    Ok(())
}

/// Calculate Mean Squared Error (MSE)
pub fn mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_inputs(y_true, y_pred)?;

    let sum_squared_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum();

    Ok(sum_squared_error / y_true.len() as f64)
}

/// Calculate Root Mean Squared Error (RMSE)
pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    Ok(mean_squared_error(y_true, y_pred)?.sqrt())
}

/// Calculate Mean Absolute Error (MAE)
pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_inputs(y_true, y_pred)?;

    let sum_absolute_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).abs())
        .sum();

    Ok(sum_absolute_error / y_true.len() as f64)
}

/// Calculate R² score (coefficient of determination)
///
/// 1 is a perfect fit; the score can be negative when the model is worse
/// than predicting the mean.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_inputs(y_true, y_pred)?;

    let y_mean = y_true.iter().sum::<f64>() / y_true.len() as f64;

    let ss_tot: f64 = y_true.iter().map(|&t| (t - y_mean) * (t - y_mean)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p) * (t - p))
        .sum();

    // A constant target has zero total variance; score by residuals alone
    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}
