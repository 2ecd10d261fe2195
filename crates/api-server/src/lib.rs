//! HTTP surface of the forecast service.
//!
//! Routes live in per-concern modules returning `Router<AppState>`; this
//! module owns the shared state, the response envelope, the error mapping
//! and server startup.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use forecast_core::{ForecastError, SeriesProvider};
use serde::Serialize;
use series_store::SeriesStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod forecast_routes;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SeriesProvider>,
}

/// Uniform response envelope.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

/// Machine-readable error payload.
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Route-level error: an HTTP status, a wire code and the underlying cause.
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    source: anyhow::Error,
}

impl AppError {
    pub fn with_status(status: StatusCode, source: anyhow::Error) -> Self {
        Self {
            status,
            code: "internal",
            source,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(source: anyhow::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, source)
    }
}

impl From<ForecastError> for AppError {
    fn from(e: ForecastError) -> Self {
        let status = match &e {
            ForecastError::NotFound(_) => StatusCode::NOT_FOUND,
            ForecastError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ForecastError::InsufficientData(_) | ForecastError::NoModelsAvailable => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ForecastError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: e.code(),
            source: e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "request failed: {:#}", self.source);
        } else {
            tracing::warn!(status = %self.status, "request rejected: {:#}", self.source);
        }
        let body = Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ErrorBody {
                code: self.code.to_string(),
                message: self.source.to_string(),
            }),
        });
        (self.status, body).into_response()
    }
}

async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(forecast_routes::forecast_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://marketscope.db?mode=rwc".to_string());
    let pool = sqlx::SqlitePool::connect(&database_url).await?;
    let store = SeriesStore::new(pool);
    store.ensure_schema().await?;

    let state = AppState {
        store: Arc::new(store),
    };
    let app = router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("forecast API listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
