use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ForecastError;

/// One observation in a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Calendar granularity of series points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Day,
    Week,
    Month,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Day => "day",
            Interval::Week => "week",
            Interval::Month => "month",
        }
    }

    /// One step forward on the calendar. Month steps respect variable
    /// month lengths (Jan 31 -> Feb 28/29).
    pub fn advance(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Interval::Day => t + Duration::days(1),
            Interval::Week => t + Duration::days(7),
            Interval::Month => t + Months::new(1),
        }
    }

    /// Number of points in one full seasonal cycle at this granularity.
    pub fn seasonal_period(&self) -> usize {
        match self {
            Interval::Day => 7,
            Interval::Week => 52,
            Interval::Month => 12,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Interval::Day),
            "week" => Ok(Interval::Week),
            "month" => Ok(Interval::Month),
            other => Err(ForecastError::InvalidParameter(format!(
                "interval must be day, week or month (got '{other}')"
            ))),
        }
    }
}

/// Forecast output of a single model, immutable once assembled.
///
/// Bounds and accuracy scores are optional: absent means "not computed"
/// (too few residuals, or a zero actual for MAPE), never "computed as zero".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub model_name: String,
    pub forecast: Vec<TimeSeriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<Vec<TimeSeriesPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<Vec<TimeSeriesPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rmse: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mape: Option<f64>,
}

/// Single-model response for the industry forecast endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryForecastResponse {
    pub industry: String,
    pub historical_data: Vec<TimeSeriesPoint>,
    pub forecast: ForecastResult,
}

/// Multi-model response for the model comparison endpoint. `models`
/// preserves the order models were requested in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparisonData {
    pub historical_data: Vec<TimeSeriesPoint>,
    pub models: Vec<ForecastResult>,
}

/// Catalogue entry for an industry with series data available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustrySummary {
    pub id: String,
    pub name: String,
    pub point_count: i64,
}
