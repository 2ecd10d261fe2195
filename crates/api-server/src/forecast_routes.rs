//! Forecast API Routes
//!
//! Endpoints for industry metric forecasts: a single-model forecast per
//! industry, a multi-model comparison, and the industry catalogue.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use forecast_core::{
    ForecastError, IndustryForecastResponse, IndustrySummary, Interval, ModelComparisonData,
};
use forecast_models::{fit_all, ForecastModel};
use serde::Deserialize;

use crate::{ApiResponse, AppError, AppState};

/// History window for the single-model industry endpoint.
const INDUSTRY_HISTORY_POINTS: usize = 60;

const DEFAULT_PERIODS: i64 = 6;
const DEFAULT_DATA_POINTS: i64 = 30;

#[derive(Deserialize)]
pub struct IndustryForecastQuery {
    pub interval: Option<String>,
    pub periods: Option<i64>,
}

#[derive(Deserialize)]
pub struct ModelComparisonQuery {
    pub interval: Option<String>,
    pub periods: Option<i64>,
    #[serde(rename = "dataPoints")]
    pub data_points: Option<i64>,
    pub industry: Option<String>,
}

pub fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/api/forecast/industries", get(list_industries))
        .route("/api/forecast/industry/:id", get(industry_forecast))
        .route("/api/forecast/models", get(model_comparison))
}

// Parameter validation happens here, before any data is loaded or fit.

fn parse_interval(raw: Option<&str>) -> Result<Interval, ForecastError> {
    raw.unwrap_or("month").parse()
}

fn validate_periods(raw: Option<i64>) -> Result<usize, ForecastError> {
    let periods = raw.unwrap_or(DEFAULT_PERIODS);
    if !(1..=60).contains(&periods) {
        return Err(ForecastError::InvalidParameter(format!(
            "periods must be between 1 and 60 (got {periods})"
        )));
    }
    Ok(periods as usize)
}

fn validate_data_points(raw: Option<i64>) -> Result<usize, ForecastError> {
    let points = raw.unwrap_or(DEFAULT_DATA_POINTS);
    if !(2..=500).contains(&points) {
        return Err(ForecastError::InvalidParameter(format!(
            "dataPoints must be between 2 and 500 (got {points})"
        )));
    }
    Ok(points as usize)
}

async fn list_industries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<IndustrySummary>>>, AppError> {
    let industries = state.store.list_industries().await?;
    Ok(Json(ApiResponse::success(industries)))
}

async fn industry_forecast(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<IndustryForecastQuery>,
) -> Result<Json<ApiResponse<IndustryForecastResponse>>, AppError> {
    let interval = parse_interval(query.interval.as_deref())?;
    let periods = validate_periods(query.periods)?;

    let series = state
        .store
        .load_series(&id, interval, INDUSTRY_HISTORY_POINTS)
        .await?;

    // fit_all absorbs per-model failure; with one model requested, failure
    // surfaces as NoModelsAvailable and the vec is otherwise non-empty.
    let mut results = fit_all(&[ForecastModel::LinearTrend], &series, interval, periods)?;
    let forecast = results.remove(0);

    Ok(Json(ApiResponse::success(IndustryForecastResponse {
        industry: id,
        historical_data: series,
        forecast,
    })))
}

async fn model_comparison(
    State(state): State<AppState>,
    Query(query): Query<ModelComparisonQuery>,
) -> Result<Json<ApiResponse<ModelComparisonData>>, AppError> {
    let interval = parse_interval(query.interval.as_deref())?;
    let periods = validate_periods(query.periods)?;
    let data_points = validate_data_points(query.data_points)?;

    // Without an explicit industry, compare models on the first catalogued
    // one so the dashboard's parameterless call keeps working.
    let industry = match query.industry {
        Some(id) => id,
        None => state
            .store
            .list_industries()
            .await?
            .into_iter()
            .next()
            .map(|i| i.id)
            .ok_or_else(|| {
                ForecastError::NotFound("no industries with series data".to_string())
            })?,
    };

    let series = state.store.load_series(&industry, interval, data_points).await?;
    let models = fit_all(ForecastModel::all(), &series, interval, periods)?;

    Ok(Json(ApiResponse::success(ModelComparisonData {
        historical_data: series,
        models,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use forecast_core::{SeriesProvider, TimeSeriesPoint};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// In-memory provider serving one industry ("tech") with a short
    /// linear monthly series.
    struct StubProvider {
        series: Vec<TimeSeriesPoint>,
    }

    impl StubProvider {
        fn linear(len: usize) -> Self {
            let mut t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let series = (0..len)
                .map(|i| {
                    let point = TimeSeriesPoint {
                        timestamp: t,
                        value: 10.0 + 2.0 * i as f64,
                    };
                    t = Interval::Month.advance(t);
                    point
                })
                .collect();
            Self { series }
        }
    }

    #[async_trait]
    impl SeriesProvider for StubProvider {
        async fn load_series(
            &self,
            entity: &str,
            _interval: Interval,
            max_points: usize,
        ) -> Result<Vec<TimeSeriesPoint>, ForecastError> {
            if entity != "tech" {
                return Err(ForecastError::NotFound(format!(
                    "unknown industry '{entity}'"
                )));
            }
            let skip = self.series.len().saturating_sub(max_points);
            Ok(self.series[skip..].to_vec())
        }

        async fn list_industries(&self) -> Result<Vec<IndustrySummary>, ForecastError> {
            Ok(vec![IndustrySummary {
                id: "tech".to_string(),
                name: "Technology".to_string(),
                point_count: self.series.len() as i64,
            }])
        }
    }

    fn app(provider: StubProvider) -> axum::Router {
        router(AppState {
            store: Arc::new(provider),
        })
    }

    async fn get_json(
        app: axum::Router,
        uri: &str,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_industry_forecast_success_shape() {
        let (status, body) = get_json(
            app(StubProvider::linear(5)),
            "/api/forecast/industry/tech?interval=month&periods=3",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let data = &body["data"];
        assert_eq!(data["industry"], "tech");
        assert_eq!(data["historicalData"].as_array().unwrap().len(), 5);
        assert_eq!(data["forecast"]["modelName"], "linear_trend");
        assert_eq!(data["forecast"]["forecast"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_model_comparison_excludes_failed_models() {
        // 5 monthly points: seasonal-naive needs 13, so only two models fit.
        let (status, body) = get_json(
            app(StubProvider::linear(5)),
            "/api/forecast/models?interval=month&periods=2&dataPoints=5",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let models = body["data"]["models"].as_array().unwrap();
        let names: Vec<&str> = models
            .iter()
            .map(|m| m["modelName"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["linear_trend", "smoothing"]);
    }

    #[tokio::test]
    async fn test_invalid_interval_rejected_before_compute() {
        let (status, body) = get_json(
            app(StubProvider::linear(5)),
            "/api/forecast/industry/tech?interval=hour",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "invalid_parameter");
    }

    #[tokio::test]
    async fn test_out_of_range_periods_rejected() {
        let (status, body) = get_json(
            app(StubProvider::linear(5)),
            "/api/forecast/models?periods=0",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid_parameter");
    }

    #[tokio::test]
    async fn test_unknown_industry_is_404() {
        let (status, body) = get_json(
            app(StubProvider::linear(5)),
            "/api/forecast/industry/unobtainium",
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_single_point_series_yields_no_models_available() {
        let (status, body) = get_json(
            app(StubProvider::linear(1)),
            "/api/forecast/industry/tech?periods=6",
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "no_models_available");
    }

    #[tokio::test]
    async fn test_omitted_fields_absent_not_null() {
        // 2 points: smoothing's comparison set has 1 residual, so its
        // bounds and scores must be missing keys, not nulls.
        let (_, body) = get_json(
            app(StubProvider::linear(2)),
            "/api/forecast/models?periods=2&dataPoints=2",
        )
        .await;

        let models = body["data"]["models"].as_array().unwrap();
        let smoothing = models
            .iter()
            .find(|m| m["modelName"] == "smoothing")
            .unwrap();
        assert!(smoothing.get("rmse").is_none());
        assert!(smoothing.get("upperBound").is_none());
    }

    #[tokio::test]
    async fn test_forecast_dates_follow_last_historical() {
        let (_, body) = get_json(
            app(StubProvider::linear(5)),
            "/api/forecast/industry/tech?interval=month&periods=2",
        )
        .await;

        let data = &body["data"];
        let last_known = data["historicalData"].as_array().unwrap()[4]["timestamp"]
            .as_str()
            .unwrap()
            .to_string();
        let first_forecast = data["forecast"]["forecast"].as_array().unwrap()[0]["timestamp"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(first_forecast > last_known);
    }
}
