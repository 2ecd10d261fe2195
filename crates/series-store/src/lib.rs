//! SQLite-backed historical series loader.
//!
//! Reads raw industry metric observations, aggregates them to the requested
//! calendar interval and trims to the requested point count. Read-only: any
//! caching or write-back belongs to the ingestion side, not this crate.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use forecast_core::{ForecastError, IndustrySummary, Interval, SeriesProvider, TimeSeriesPoint};

#[derive(Clone)]
pub struct SeriesStore {
    pool: sqlx::SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MetricRow {
    recorded_at: DateTime<Utc>,
    value: f64,
}

#[derive(sqlx::FromRow)]
struct IndustryRow {
    id: String,
    name: String,
    point_count: i64,
}

impl SeriesStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the backing tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), ForecastError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS industries (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS industry_metrics (
                industry_id TEXT NOT NULL REFERENCES industries(id),
                recorded_at TEXT NOT NULL,
                value REAL NOT NULL,
                UNIQUE (industry_id, recorded_at)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> ForecastError {
    ForecastError::DatabaseError(e.to_string())
}

/// Calendar bucket a timestamp falls into at the given granularity.
fn bucket_key(t: DateTime<Utc>, interval: Interval) -> (i32, u32) {
    match interval {
        Interval::Day => (t.year(), t.ordinal()),
        Interval::Week => {
            let week = t.iso_week();
            (week.year(), week.week())
        }
        Interval::Month => (t.year(), t.month()),
    }
}

/// Collapse raw observations into one point per calendar bucket.
///
/// Values within a bucket are averaged; the bucket is stamped with its last
/// observed timestamp so the forecast grid continues from a real
/// observation time. Input must be ordered ascending; duplicate raw
/// timestamps collapse into their bucket rather than surviving as
/// duplicates in the output.
fn aggregate(points: &[TimeSeriesPoint], interval: Interval) -> Vec<TimeSeriesPoint> {
    let mut out: Vec<TimeSeriesPoint> = Vec::new();
    let mut bucket: Option<(i32, u32)> = None;
    let mut sum = 0.0;
    let mut count = 0u32;
    let mut last = DateTime::<Utc>::MIN_UTC;

    for point in points {
        let key = bucket_key(point.timestamp, interval);
        if bucket == Some(key) {
            sum += point.value;
            count += 1;
            last = point.timestamp;
        } else {
            if count > 0 {
                out.push(TimeSeriesPoint {
                    timestamp: last,
                    value: sum / count as f64,
                });
            }
            bucket = Some(key);
            sum = point.value;
            count = 1;
            last = point.timestamp;
        }
    }
    if count > 0 {
        out.push(TimeSeriesPoint {
            timestamp: last,
            value: sum / count as f64,
        });
    }
    out
}

#[async_trait]
impl SeriesProvider for SeriesStore {
    async fn load_series(
        &self,
        entity: &str,
        interval: Interval,
        max_points: usize,
    ) -> Result<Vec<TimeSeriesPoint>, ForecastError> {
        let known: Option<(String,)> = sqlx::query_as("SELECT id FROM industries WHERE id = ?")
            .bind(entity)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        if known.is_none() {
            return Err(ForecastError::NotFound(format!("unknown industry '{entity}'")));
        }

        let rows: Vec<MetricRow> = sqlx::query_as(
            "SELECT recorded_at, value FROM industry_metrics
             WHERE industry_id = ?
             ORDER BY recorded_at ASC",
        )
        .bind(entity)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        if rows.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "no observations recorded for industry '{entity}'"
            )));
        }

        let raw: Vec<TimeSeriesPoint> = rows
            .into_iter()
            .map(|r| TimeSeriesPoint {
                timestamp: r.recorded_at,
                value: r.value,
            })
            .collect();

        let mut series = aggregate(&raw, interval);
        if series.len() > max_points {
            series.drain(..series.len() - max_points);
        }
        tracing::debug!(
            industry = entity,
            interval = %interval,
            points = series.len(),
            "loaded historical series"
        );
        Ok(series)
    }

    async fn list_industries(&self) -> Result<Vec<IndustrySummary>, ForecastError> {
        let rows: Vec<IndustryRow> = sqlx::query_as(
            "SELECT i.id, i.name, COUNT(m.value) AS point_count
             FROM industries i
             LEFT JOIN industry_metrics m ON m.industry_id = i.id
             GROUP BY i.id, i.name
             ORDER BY i.name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|r| IndustrySummary {
                id: r.id,
                name: r.name,
                point_count: r.point_count,
            })
            .collect())
    }
}
