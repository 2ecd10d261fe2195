//! RMSE and MAPE over a model's in-sample comparison set.

/// Root-mean-squared error. `None` with fewer than 2 comparison points —
/// a single point is not enough to say anything about accuracy.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() < 2 || actual.len() != predicted.len() {
        return None;
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    Some(mse.sqrt())
}

/// Mean absolute percentage error, as a percentage.
///
/// Undefined (and omitted) when any actual is zero, in addition to the
/// minimum-size rule shared with [`rmse`].
pub fn mape(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() < 2 || actual.len() != predicted.len() {
        return None;
    }
    if actual.iter().any(|&a| a == 0.0) {
        return None;
    }
    let mean_ape = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum::<f64>()
        / actual.len() as f64;
    Some(mean_ape * 100.0)
}
