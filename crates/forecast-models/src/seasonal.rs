//! Seasonal-naive forecast with a drift adjustment.

use forecast_core::{ForecastError, Interval};

use crate::ModelFit;

/// Repeat the value from one seasonal cycle back, shifted by the average
/// season-over-season drift.
///
/// Needs one full season plus one point; shorter series are rejected so the
/// model is skipped rather than producing a degenerate repeat of itself.
pub(crate) fn fit(
    values: &[f64],
    interval: Interval,
    horizon: usize,
) -> Result<ModelFit, ForecastError> {
    let period = interval.seasonal_period();
    let n = values.len();
    if n < period + 1 {
        return Err(ForecastError::InsufficientData(format!(
            "seasonal_naive at {interval} granularity requires {} points, got {n}",
            period + 1
        )));
    }

    // Average change from one season to the next, per full cycle.
    let diffs: Vec<f64> = (period..n).map(|i| values[i] - values[i - period]).collect();
    let drift = diffs.iter().sum::<f64>() / diffs.len() as f64;

    let future: Vec<f64> = (1..=horizon)
        .map(|step| {
            let offset = (step - 1) % period;
            let cycles = ((step - 1) / period + 1) as f64;
            values[n - period + offset] + drift * cycles
        })
        .collect();

    // In-sample reconstruction: each point against its season-back value.
    let fitted: Vec<f64> = (period..n).map(|i| values[i - period] + drift).collect();
    let actuals = values[period..].to_vec();

    Ok(ModelFit {
        future,
        fitted,
        actuals,
    })
}
