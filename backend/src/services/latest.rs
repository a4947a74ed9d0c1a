//! Latest-reading resolver.

use futures::future::try_join_all;

use crate::db::{ReadingRepository, RepositoryResult};
use crate::models::{LatestReadings, StationSet};

/// Most recent reading of every station in `stations`.
///
/// A station that never reported maps to `None`. Any store failure fails the
/// whole call; there is no partial result.
pub async fn resolve_latest(
    repo: &dyn ReadingRepository,
    stations: &StationSet,
) -> RepositoryResult<LatestReadings> {
    let lookups = stations.iter().map(|station| async move {
        let latest = repo
            .fetch_latest_reading(station)
            .await
            .map_err(|e| e.with_entity("station", station))?;
        Ok::<_, crate::db::RepositoryError>((station.clone(), latest))
    });

    let latest: LatestReadings = try_join_all(lookups).await?.into_iter().collect();
    log::debug!(
        "Resolved latest readings: {}/{} stations reporting",
        latest.values().filter(|r| r.is_some()).count(),
        latest.len()
    );
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;
    use crate::models::{NewReading, SpectralBand, StationId};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_never_written_station_is_none() {
        let repo = LocalRepository::new();
        let now = Utc::now();
        repo.insert_reading_at(
            &NewReading::new("Referencia").with_band(SpectralBand::Clear, 1.0),
            now - Duration::minutes(10),
        )
        .unwrap();
        repo.insert_reading_at(
            &NewReading::new("Referencia").with_band(SpectralBand::Clear, 2.0),
            now - Duration::minutes(5),
        )
        .unwrap();
        repo.insert_reading(&NewReading::new("Cama_1")).await.unwrap();

        let latest = resolve_latest(&repo, &StationSet::default()).await.unwrap();
        assert_eq!(latest.len(), 3);

        let referencia = latest[&StationId::from("Referencia")].as_ref().unwrap();
        assert_eq!(referencia.channels.ch_clear, Some(2.0));
        assert!(latest[&StationId::from("Cama_1")].is_some());
        assert!(latest[&StationId::from("Cama_2")].is_none());
    }

    #[tokio::test]
    async fn test_store_failure_fails_whole_call() {
        let repo = LocalRepository::new();
        repo.insert_reading(&NewReading::new("Cama_1")).await.unwrap();
        repo.set_healthy(false);
        assert!(resolve_latest(&repo, &StationSet::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_station_set_resolves_to_empty_map() {
        let repo = LocalRepository::new();
        let latest = resolve_latest(&repo, &StationSet::new(Vec::<String>::new()))
            .await
            .unwrap();
        assert!(latest.is_empty());
    }
}
