//! HTTP handlers for the REST API.
//!
//! Each handler extracts its input, delegates to the service layer and maps
//! the outcome onto a JSON response or an [`AppError`].

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::dto::{
    HealthResponse, IngestResponse, LatestReadings, RangeQuery, StationReadings, SummaryReport,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::Windowed;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const NO_DATA_MESSAGE: &str = "No data found for this range";
const NO_SUMMARY_MESSAGE: &str = "No data to summarize";

fn range_days(query: Result<Query<RangeQuery>, QueryRejection>) -> Result<u32, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(query.range_days())
}

/// GET /health
///
/// Reports whether the service is up and the store reachable, plus pool
/// counters when the store keeps a pool.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        pool: state.repository.pool_stats(),
    }))
}

/// GET /api/data/current
///
/// Latest reading per recognized station; stations that never reported map to `null`.
pub async fn get_current(State(state): State<AppState>) -> HandlerResult<LatestReadings> {
    let latest = services::resolve_latest(state.repository.as_ref(), &state.stations).await?;
    Ok(Json(latest))
}

/// GET /api/data/historical?range_days=N
pub async fn get_historical(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> HandlerResult<StationReadings> {
    let range_days = range_days(query)?;
    match services::fetch_windowed(state.repository.as_ref(), &state.stations, range_days).await? {
        Windowed::Data(grouped) => Ok(Json(grouped)),
        Windowed::Empty(window) => {
            tracing::info!(range_days, start = %window.start, "historical window is empty");
            Err(AppError::NoData(NO_DATA_MESSAGE.to_string()))
        }
    }
}

/// GET /api/data/summary?range_days=N
///
/// `{station: {dli, avg_rfr}}` for every recognized station.
pub async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> HandlerResult<SummaryReport> {
    let range_days = range_days(query)?;
    let summary = services::summarize_window(
        state.repository.as_ref(),
        &state.stations,
        &state.aggregator,
        range_days,
    )
    .await?;

    match summary {
        Windowed::Data(report) => Ok(Json(report)),
        Windowed::Empty(_) => Err(AppError::NoData(NO_SUMMARY_MESSAGE.to_string())),
    }
}

/// POST /api/data/ingest
///
/// Accepts any JSON object; the body must not be an array or a scalar.
pub async fn ingest(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<IngestResponse>), AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let payload = match body {
        Value::Object(map) => map,
        _ => {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ))
        }
    };

    let receipt =
        services::ingest_reading(state.repository.as_ref(), &payload, &state.ingest).await?;
    if !state.stations.contains(&receipt.station_id) {
        tracing::warn!(
            station = %receipt.station_id,
            "stored reading from a station outside the recognized set"
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            message: receipt.message(),
            station_id: receipt.station_id,
            reading_id: receipt.reading_id,
        }),
    ))
}
