//! Service layer: everything between the HTTP handlers and the reading store.
//!
//! - [`ingestion`]: payload normalization and the write path
//! - [`windowed_fetch`]: per-station grouping of a time window
//! - [`aggregator`]: DLI and R:FR arithmetic
//! - [`latest`]: most recent reading per station
//!
//! Services borrow a `&dyn ReadingRepository` for the duration of a call and
//! hold no state between calls.

pub mod aggregator;
pub mod ingestion;
pub mod latest;
pub mod windowed_fetch;

pub use aggregator::{integrate_dli, mean_rfr, round2, LightAggregator, RfrSampling};
pub use ingestion::{ingest_reading, normalize_payload, IngestOptions, IngestReceipt};
pub use latest::resolve_latest;
pub use windowed_fetch::{fetch_window, fetch_windowed, fetch_windowed_at};

use chrono::{DateTime, Local, TimeZone};

use crate::db::{ReadingRepository, RepositoryResult};
use crate::models::{StationSet, SummaryReport, Windowed};

/// Windowed fetch followed by aggregation, resolved against the local clock.
pub async fn summarize_window(
    repo: &dyn ReadingRepository,
    stations: &StationSet,
    aggregator: &LightAggregator,
    range_days: u32,
) -> RepositoryResult<Windowed<SummaryReport>> {
    summarize_window_at(repo, stations, aggregator, range_days, &Local::now()).await
}

/// Same as [`summarize_window`] with an explicit "now".
pub async fn summarize_window_at<Tz: TimeZone>(
    repo: &dyn ReadingRepository,
    stations: &StationSet,
    aggregator: &LightAggregator,
    range_days: u32,
    now: &DateTime<Tz>,
) -> RepositoryResult<Windowed<SummaryReport>> {
    let fetched = fetch_windowed_at(repo, stations, range_days, now).await?;
    Ok(fetched.map(|grouped| aggregator.summarize_all(&grouped)))
}

/// Check that the store is reachable.
pub async fn health_check(repo: &dyn ReadingRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
