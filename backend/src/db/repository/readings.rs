//! Reading store trait.
//!
//! The four operations every storage backend has to provide: liveness, an
//! append-only insert, a per-station range scan and a per-station "most recent
//! row" lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{NewReading, Reading, StationId};

/// Connection pool counters reported by pooled stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    /// Total queries executed, including failed ones
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Repository trait for spectral readings.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Check that the store is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` - The store answered
    /// * `Err(RepositoryError)` - The store could not be reached
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Append one reading.
    ///
    /// The store assigns both the row id and `created_at`. A reading without a
    /// station id is rejected with a validation error.
    ///
    /// # Arguments
    /// * `reading` - Canonical insertion record
    ///
    /// # Returns
    /// * `Ok(Reading)` - The stored row
    /// * `Err(RepositoryError)` - If the store refused or failed the write
    async fn insert_reading(&self, reading: &NewReading) -> RepositoryResult<Reading>;

    /// Fetch every reading of `station_id` with `created_at >= since`,
    /// ordered by ascending `created_at`.
    ///
    /// # Arguments
    /// * `station_id` - Station to scan
    /// * `since` - Inclusive lower bound
    ///
    /// # Returns
    /// * `Ok(Vec<Reading>)` - Possibly empty, ascending by timestamp
    /// * `Err(RepositoryError)` - If the query fails
    async fn fetch_readings_since(
        &self,
        station_id: &StationId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Reading>>;

    /// Fetch the reading of `station_id` with the greatest `created_at`.
    ///
    /// # Returns
    /// * `Ok(None)` - The station has never been written
    /// * `Ok(Some(Reading))` - The most recent row
    /// * `Err(RepositoryError)` - If the query fails
    async fn fetch_latest_reading(&self, station_id: &StationId)
        -> RepositoryResult<Option<Reading>>;

    /// Pool counters, for stores that keep a connection pool.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}
