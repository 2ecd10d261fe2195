//! Least-squares linear trend.

use crate::ModelFit;

/// Fit a line to (index, value) pairs and project it forward.
///
/// Caller guarantees `values.len() >= 2`. A zero-variance series
/// short-circuits to a flat forecast so the slope is exactly zero.
pub(crate) fn fit(values: &[f64], horizon: usize) -> ModelFit {
    let n = values.len();

    if values.iter().all(|&v| v == values[0]) {
        return ModelFit {
            future: vec![values[0]; horizon],
            fitted: values.to_vec(),
            actuals: values.to_vec(),
        };
    }

    // Centered form keeps the arithmetic well-conditioned for long series.
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let fitted: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();
    let future: Vec<f64> = (1..=horizon)
        .map(|step| intercept + slope * (n - 1 + step) as f64)
        .collect();

    ModelFit {
        future,
        fitted,
        actuals: values.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upward_slope_gives_monotonic_increasing_forecast() {
        let fit = fit(&[1.0, 3.0, 2.0, 5.0, 4.0, 7.0], 5);
        for pair in fit.future.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_downward_slope_gives_monotonic_decreasing_forecast() {
        let fit = fit(&[10.0, 9.0, 9.5, 7.0, 6.0], 4);
        for pair in fit.future.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn test_exactly_linear_data_is_reconstructed() {
        let fit = fit(&[10.0, 12.0, 14.0, 16.0, 18.0], 3);
        for (fitted, actual) in fit.fitted.iter().zip(&fit.actuals) {
            assert!((fitted - actual).abs() < 1e-9);
        }
        assert!((fit.future[0] - 20.0).abs() < 1e-9);
        assert!((fit.future[2] - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_is_exactly_flat() {
        let fit = fit(&[0.3, 0.3, 0.3], 4);
        assert_eq!(fit.future, vec![0.3, 0.3, 0.3, 0.3]);
    }
}
