//! Forecasting model family for industry metric series.
//!
//! Each model is a pure function from (series, interval, horizon) to a
//! [`ForecastResult`]; dispatch goes through the [`ForecastModel`] enum.
//! Confidence bands and accuracy scores are derived from each model's
//! in-sample fit by the `confidence` and `accuracy` modules.

use forecast_core::{ForecastError, ForecastResult, Interval, TimeSeriesPoint};
use rayon::prelude::*;

pub mod accuracy;
pub mod confidence;
mod linear;
mod seasonal;
mod smoothing;

/// Point forecast plus the in-sample comparison set a model was fit on.
/// `fitted[i]` is the model's reconstruction of `actuals[i]`.
pub(crate) struct ModelFit {
    pub future: Vec<f64>,
    pub fitted: Vec<f64>,
    pub actuals: Vec<f64>,
}

/// The forecasting models the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastModel {
    /// Least-squares line over (index, value), projected forward.
    LinearTrend,
    /// Holt's linear exponential smoothing with fixed decay factors.
    Smoothing,
    /// Repeats values from one seasonal cycle back, adjusted for drift.
    SeasonalNaive,
}

impl ForecastModel {
    pub fn name(&self) -> &'static str {
        match self {
            ForecastModel::LinearTrend => "linear_trend",
            ForecastModel::Smoothing => "smoothing",
            ForecastModel::SeasonalNaive => "seasonal_naive",
        }
    }

    /// All models, in the order responses report them.
    pub fn all() -> &'static [ForecastModel] {
        &[
            ForecastModel::LinearTrend,
            ForecastModel::Smoothing,
            ForecastModel::SeasonalNaive,
        ]
    }

    /// Fit this model and assemble its forecast, bounds and scores.
    ///
    /// Deterministic: identical input always produces identical output.
    /// Fewer than 2 points is `InsufficientData` for every model; the
    /// seasonal model additionally needs one full season plus one point.
    pub fn fit(
        &self,
        series: &[TimeSeriesPoint],
        interval: Interval,
        horizon: usize,
    ) -> Result<ForecastResult, ForecastError> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be at least 1 period".to_string(),
            ));
        }
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "{} requires at least 2 points, got {}",
                self.name(),
                series.len()
            )));
        }

        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let fit = match self {
            ForecastModel::LinearTrend => linear::fit(&values, horizon),
            ForecastModel::Smoothing => smoothing::fit(&values, horizon),
            ForecastModel::SeasonalNaive => seasonal::fit(&values, interval, horizon)?,
        };

        // Future grid: strictly after the last observation, spaced by the
        // interval (calendar-aware for months).
        let mut t = series[series.len() - 1].timestamp;
        let forecast: Vec<TimeSeriesPoint> = fit
            .future
            .iter()
            .map(|&value| {
                t = interval.advance(t);
                TimeSeriesPoint {
                    timestamp: t,
                    value,
                }
            })
            .collect();

        let residuals: Vec<f64> = fit
            .actuals
            .iter()
            .zip(fit.fitted.iter())
            .map(|(a, f)| a - f)
            .collect();

        let (upper_bound, lower_bound) = match confidence::bands(&fit.future, &residuals) {
            Some((upper, lower)) => (
                Some(with_timestamps(&forecast, upper)),
                Some(with_timestamps(&forecast, lower)),
            ),
            None => (None, None),
        };

        Ok(ForecastResult {
            model_name: self.name().to_string(),
            forecast,
            upper_bound,
            lower_bound,
            rmse: accuracy::rmse(&fit.actuals, &fit.fitted),
            mape: accuracy::mape(&fit.actuals, &fit.fitted),
        })
    }
}

fn with_timestamps(forecast: &[TimeSeriesPoint], values: Vec<f64>) -> Vec<TimeSeriesPoint> {
    forecast
        .iter()
        .zip(values)
        .map(|(p, value)| TimeSeriesPoint {
            timestamp: p.timestamp,
            value,
        })
        .collect()
}

/// Fit every requested model over the same series.
///
/// Models run in parallel; a model that fails is logged and excluded
/// rather than failing the whole request. Output order is restored to the
/// requested order afterwards, since completion order under rayon is not
/// deterministic. Errors with `NoModelsAvailable` only when nothing fit.
pub fn fit_all(
    models: &[ForecastModel],
    series: &[TimeSeriesPoint],
    interval: Interval,
    horizon: usize,
) -> Result<Vec<ForecastResult>, ForecastError> {
    let mut results: Vec<(usize, ForecastResult)> = models
        .par_iter()
        .enumerate()
        .filter_map(|(idx, model)| match model.fit(series, interval, horizon) {
            Ok(result) => Some((idx, result)),
            Err(e) => {
                tracing::warn!(
                    model = model.name(),
                    error = %e,
                    "model excluded from forecast response"
                );
                None
            }
        })
        .collect();

    if results.is_empty() {
        return Err(ForecastError::NoModelsAvailable);
    }

    results.sort_by_key(|(idx, _)| *idx);
    Ok(results.into_iter().map(|(_, result)| result).collect())
}
