//! In-memory local repository implementation.
//!
//! Readings live in a `HashMap` keyed by station, each station's rows kept in
//! ascending `created_at` order. Suitable for unit tests and local development:
//! fast, deterministic and isolated per instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{ErrorContext, ReadingRepository, RepositoryError, RepositoryResult};
use crate::models::{NewReading, Reading, ReadingId, StationId};

/// In-memory local repository.
///
/// # Example
/// ```
/// use solartrace::db::LocalRepository;
/// use solartrace::db::ReadingRepository;
/// use solartrace::models::NewReading;
///
/// # tokio_test_block(async {
/// let repo = LocalRepository::new();
/// repo.insert_reading(&NewReading::new("Cama_1").with_ppfd(420.0)).await.unwrap();
/// assert_eq!(repo.reading_count(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    readings: HashMap<StationId, Vec<Reading>>,
    next_reading_id: i64,
    last_created_at: Option<DateTime<Utc>>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            readings: HashMap::new(),
            next_reading_id: 1,
            last_created_at: None,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository is marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }

    fn store(&mut self, reading: &NewReading, created_at: DateTime<Utc>) -> RepositoryResult<Reading> {
        let station_id = match reading.station_id.as_ref() {
            Some(id) if !id.as_str().is_empty() => id.clone(),
            _ => {
                return Err(RepositoryError::validation_with_context(
                    "sensor_id must not be null",
                    ErrorContext::new("insert_reading").with_entity("reading"),
                ))
            }
        };

        let id = ReadingId::new(self.next_reading_id);
        self.next_reading_id += 1;

        let stored = reading.clone().into_reading(id, station_id.clone(), created_at);
        let rows = self.readings.entry(station_id).or_default();
        // Keep ascending order; rows with equal timestamps stay in insertion order.
        let position = rows.partition_point(|row| row.created_at <= created_at);
        rows.insert(position, stored.clone());

        Ok(stored)
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Insert a reading with an explicit timestamp.
    ///
    /// Helper for seeding historical data; the trait insert always stamps with
    /// the current time.
    pub fn insert_reading_at(
        &self,
        reading: &NewReading,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<Reading> {
        let mut data = self.data.write();
        data.ensure_healthy("insert_reading_at")?;
        data.store(reading, created_at)
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of readings stored across all stations.
    pub fn reading_count(&self) -> usize {
        self.data.read().readings.values().map(Vec::len).sum()
    }

    /// Get the number of stations that have at least one reading.
    pub fn station_count(&self) -> usize {
        self.data.read().readings.len()
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadingRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read();
        data.ensure_healthy("health_check")?;
        Ok(true)
    }

    async fn insert_reading(&self, reading: &NewReading) -> RepositoryResult<Reading> {
        let mut data = self.data.write();
        data.ensure_healthy("insert_reading")?;

        // Timestamps never go backwards, even if the wall clock does.
        let now = Utc::now();
        let created_at = match data.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        let stored = data.store(reading, created_at)?;
        data.last_created_at = Some(created_at);
        Ok(stored)
    }

    async fn fetch_readings_since(
        &self,
        station_id: &StationId,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Reading>> {
        let data = self.data.read();
        data.ensure_healthy("fetch_readings_since")?;

        Ok(data
            .readings
            .get(station_id)
            .map(|rows| {
                let start = rows.partition_point(|row| row.created_at < since);
                rows[start..].to_vec()
            })
            .unwrap_or_default())
    }

    async fn fetch_latest_reading(
        &self,
        station_id: &StationId,
    ) -> RepositoryResult<Option<Reading>> {
        let data = self.data.read();
        data.ensure_healthy("fetch_latest_reading")?;

        Ok(data
            .readings
            .get(station_id)
            .and_then(|rows| rows.last().cloned()))
    }
}
