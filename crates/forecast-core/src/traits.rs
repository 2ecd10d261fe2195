use async_trait::async_trait;

use crate::{ForecastError, IndustrySummary, Interval, TimeSeriesPoint};

/// Trait for historical series backends.
///
/// The API layer depends on this rather than a concrete store so routes can
/// be exercised against an in-memory provider in tests.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Load at most `max_points` observations for `entity`, aggregated to
    /// `interval`, ordered oldest to newest.
    async fn load_series(
        &self,
        entity: &str,
        interval: Interval,
        max_points: usize,
    ) -> Result<Vec<TimeSeriesPoint>, ForecastError>;

    /// List the industries that have series data available.
    async fn list_industries(&self) -> Result<Vec<IndustrySummary>, ForecastError>;
}
