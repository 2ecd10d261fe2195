//! Confidence bands from in-sample residual dispersion.

use statrs::statistics::Statistics;

/// Two-sided 95% z-score.
const Z_95: f64 = 1.96;

/// Derive upper/lower bounds around a point forecast.
///
/// Dispersion is the sample standard deviation of the in-sample residuals;
/// the band grows with `sqrt(step)` to reflect accumulating uncertainty, so
/// width is non-decreasing in horizon distance. Returns `None` with fewer
/// than 2 residuals rather than fabricating a zero-width band.
pub fn bands(forecast: &[f64], residuals: &[f64]) -> Option<(Vec<f64>, Vec<f64>)> {
    if residuals.len() < 2 {
        return None;
    }

    let dispersion = residuals.std_dev();
    let mut upper = Vec::with_capacity(forecast.len());
    let mut lower = Vec::with_capacity(forecast.len());
    for (i, &point) in forecast.iter().enumerate() {
        let half_width = Z_95 * dispersion * ((i + 1) as f64).sqrt();
        upper.push(point + half_width);
        lower.push(point - half_width);
    }
    Some((upper, lower))
}
