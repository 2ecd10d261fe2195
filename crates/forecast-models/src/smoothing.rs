//! Holt's linear exponential smoothing.

use crate::ModelFit;

const ALPHA: f64 = 0.3;
const BETA: f64 = 0.1;

/// Smooth level and trend through the series, then project by holding the
/// final trend constant.
///
/// Caller guarantees `values.len() >= 2`. The in-sample comparison set is
/// the one-step-ahead predictions for points 1..n. A zero-variance series
/// short-circuits to a flat forecast.
pub(crate) fn fit(values: &[f64], horizon: usize) -> ModelFit {
    let n = values.len();

    if values.iter().all(|&v| v == values[0]) {
        return ModelFit {
            future: vec![values[0]; horizon],
            fitted: values[1..].to_vec(),
            actuals: values[1..].to_vec(),
        };
    }

    let mut level = values[0];
    let mut trend = values[1] - values[0];

    let mut fitted = Vec::with_capacity(n - 1);
    for &y in &values[1..] {
        // Prediction from the state before observing y.
        fitted.push(level + trend);

        let new_level = ALPHA * y + (1.0 - ALPHA) * (level + trend);
        trend = BETA * (new_level - level) + (1.0 - BETA) * trend;
        level = new_level;
    }

    let future: Vec<f64> = (1..=horizon)
        .map(|step| level + trend * step as f64)
        .collect();

    ModelFit {
        future,
        fitted,
        actuals: values[1..].to_vec(),
    }
}
