//! Router-level tests: requests go through the full middleware stack.

#![cfg(feature = "http-server")]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use solartrace::db::{LocalRepository, PoolStats, ReadingRepository, RepositoryResult};
use solartrace::http::{create_router, AppState};
use solartrace::models::{NewReading, Reading, StationId};

fn app(repo: &Arc<LocalRepository>) -> Router {
    let repository: Arc<dyn ReadingRepository> = repo.clone();
    create_router(AppState::new(repository))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn insert(repo: &LocalRepository, station: &str, ppfd: f64) {
    let reading = NewReading::new(station).with_ppfd(ppfd);
    repo.insert_reading(&reading).await.unwrap();
}

#[tokio::test]
async fn test_health_reports_connected_store() {
    let repo = Arc::new(LocalRepository::new());
    let (status, body) = send(app(&repo), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body.get("pool").is_none());
}

/// In-memory store that reports fixed pool counters.
struct PooledStore {
    inner: LocalRepository,
    stats: PoolStats,
}

#[async_trait]
impl ReadingRepository for PooledStore {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }

    async fn insert_reading(&self, reading: &NewReading) -> RepositoryResult<Reading> {
        self.inner.insert_reading(reading).await
    }

    async fn fetch_readings_since(
        &self,
        station_id: &StationId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Reading>> {
        self.inner.fetch_readings_since(station_id, since).await
    }

    async fn fetch_latest_reading(
        &self,
        station_id: &StationId,
    ) -> RepositoryResult<Option<Reading>> {
        self.inner.fetch_latest_reading(station_id).await
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(self.stats.clone())
    }
}

#[tokio::test]
async fn test_health_reports_pool_stats() {
    let stats = PoolStats {
        connections_in_use: 2,
        idle_connections: 3,
        total_connections: 5,
        max_size: 10,
        total_queries: 42,
        failed_queries: 1,
        retried_operations: 4,
    };
    let repository: Arc<dyn ReadingRepository> = Arc::new(PooledStore {
        inner: LocalRepository::new(),
        stats: stats.clone(),
    });

    let (status, body) = send(create_router(AppState::new(repository)), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
    let reported: PoolStats = serde_json::from_value(body["pool"].clone()).unwrap();
    assert_eq!(reported, stats);
}

#[tokio::test]
async fn test_current_maps_silent_stations_to_null() {
    let repo = Arc::new(LocalRepository::new());
    insert(&repo, "Cama_1", 120.0).await;
    insert(&repo, "Cama_1", 180.0).await;

    let (status, body) = send(app(&repo), get("/api/data/current")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["Referencia"].is_null());
    assert!(body["Cama_2"].is_null());
    assert_eq!(body["Cama_1"]["sensor_id"], "Cama_1");
    assert_eq!(body["Cama_1"]["ppfd_total"], 180.0);
}

#[tokio::test]
async fn test_historical_empty_window_is_no_data() {
    let repo = Arc::new(LocalRepository::new());
    let (status, body) = send(app(&repo), get("/api/data/historical")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_DATA");
    assert_eq!(body["message"], "No data found for this range");
}

#[tokio::test]
async fn test_historical_groups_by_station() {
    let repo = Arc::new(LocalRepository::new());
    insert(&repo, "Referencia", 100.0).await;
    insert(&repo, "Referencia", 110.0).await;
    insert(&repo, "Cama_2", 90.0).await;

    let (status, body) =
        send(app(&repo), get("/api/data/historical?range_days=3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Referencia"].as_array().unwrap().len(), 2);
    assert_eq!(body["Cama_2"].as_array().unwrap().len(), 1);
    assert_eq!(body["Cama_1"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_summary_covers_every_station() {
    let repo = Arc::new(LocalRepository::new());
    insert(&repo, "Cama_1", 250.0).await;

    let (status, body) = send(app(&repo), get("/api/data/summary?range_days=1")).await;

    assert_eq!(status, StatusCode::OK);
    for station in ["Referencia", "Cama_1", "Cama_2"] {
        assert_eq!(body[station]["dli"], 0.0, "{}", station);
        assert_eq!(body[station]["avg_rfr"], 0.0, "{}", station);
    }
}

#[tokio::test]
async fn test_summary_without_readings_is_no_data() {
    let repo = Arc::new(LocalRepository::new());
    let (status, body) = send(app(&repo), get("/api/data/summary")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_DATA");
    assert_eq!(body["message"], "No data to summarize");
}

#[tokio::test]
async fn test_bad_range_days_is_bad_request() {
    let repo = Arc::new(LocalRepository::new());

    for uri in [
        "/api/data/historical?range_days=abc",
        "/api/data/summary?range_days=-2",
    ] {
        let (status, body) = send(app(&repo), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_ingest_stores_reading() {
    let repo = Arc::new(LocalRepository::new());
    let payload = json!({
        "sensor_id": "Cama_2",
        "ch_680": 5.0,
        "ch_730": 4.0,
        "ppfd_total": 310.5,
        "firmware": "1.4.2"
    });

    let (status, body) = send(
        app(&repo),
        post_json("/api/data/ingest", &payload.to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Data received from sensor Cama_2");
    assert_eq!(body["station_id"], "Cama_2");
    assert_eq!(body["reading_id"], 1);
    assert_eq!(repo.reading_count(), 1);

    let (_, current) = send(app(&repo), get("/api/data/current")).await;
    assert_eq!(current["Cama_2"]["ch_730"], 4.0);
    assert!(current["Cama_2"].get("firmware").is_none());
}

#[tokio::test]
async fn test_ingest_rejects_non_object_bodies() {
    let repo = Arc::new(LocalRepository::new());

    for body in ["[1, 2, 3]", "42", "\"Cama_1\"", "{not json"] {
        let (status, error) = send(app(&repo), post_json("/api/data/ingest", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(error["code"], "BAD_REQUEST");
    }
    assert_eq!(repo.reading_count(), 0);
}

#[tokio::test]
async fn test_ingest_without_station_is_validation_error() {
    let repo = Arc::new(LocalRepository::new());
    let (status, body) = send(
        app(&repo),
        post_json("/api/data/ingest", r#"{"ch_680": 12.0}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"], "validation");
    assert_eq!(repo.reading_count(), 0);
}

#[tokio::test]
async fn test_unreachable_store_is_service_unavailable() {
    let repo = Arc::new(LocalRepository::new());
    repo.set_healthy(false);

    for request in [
        get("/api/data/current"),
        get("/api/data/historical"),
        get("/api/data/summary"),
        post_json("/api/data/ingest", r#"{"sensor_id": "Cama_1"}"#),
    ] {
        let (status, body) = send(app(&repo), request).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "STORE_UNAVAILABLE");
        assert_eq!(body["details"], "connection");
    }

    let (status, body) = send(app(&repo), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["database"], "connected");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let repo = Arc::new(LocalRepository::new());
    let response = app(&repo).oneshot(get("/api/data/forecast")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_largest_range_days_is_served() {
    let repo = Arc::new(LocalRepository::new());
    let max = format!("range_days={}", u32::MAX);

    let (status, body) = send(app(&repo), get(&format!("/api/data/summary?{}", max))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_DATA");

    insert(&repo, "Cama_1", 300.0).await;
    for path in ["/api/data/summary", "/api/data/historical"] {
        let (status, body) = send(app(&repo), get(&format!("{}?{}", path, max))).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert!(body.get("Cama_1").is_some(), "{}", path);
    }
}
