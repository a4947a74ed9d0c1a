//! Data Transfer Objects for the HTTP API.
//!
//! Readings, summaries and the per-station maps already derive `Serialize`, so
//! they are returned as-is; only the envelopes live here.

use serde::{Deserialize, Serialize};

use crate::db::PoolStats;

pub use crate::models::{
    LatestReadings, Reading, ReadingId, StationId, StationReadings, StationSummary, SummaryReport,
    DEFAULT_RANGE_DAYS,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Store status: "connected", "disconnected" or "error: ..."
    pub database: String,
    /// Only reported by pooled stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

/// Query string of the windowed endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RangeQuery {
    /// `<= 1` means today; defaults to 1.
    pub range_days: Option<u32>,
}

impl RangeQuery {
    pub fn range_days(&self) -> u32 {
        self.range_days.unwrap_or(DEFAULT_RANGE_DAYS)
    }
}

/// Response for a stored reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub station_id: StationId,
    pub reading_id: ReadingId,
}
