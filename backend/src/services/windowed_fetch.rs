//! Windowed fetch: group each recognized station's readings in a time window.

use chrono::{DateTime, Local, TimeZone};
use futures::future::try_join_all;

use crate::db::{ReadingRepository, RepositoryResult};
use crate::models::{StationReadings, StationSet, TimeWindow, Windowed};

/// Fetch the readings of every station in `stations` for `range_days`,
/// resolved against the local clock.
pub async fn fetch_windowed(
    repo: &dyn ReadingRepository,
    stations: &StationSet,
    range_days: u32,
) -> RepositoryResult<Windowed<StationReadings>> {
    fetch_windowed_at(repo, stations, range_days, &Local::now()).await
}

/// Same as [`fetch_windowed`] with an explicit "now".
pub async fn fetch_windowed_at<Tz: TimeZone>(
    repo: &dyn ReadingRepository,
    stations: &StationSet,
    range_days: u32,
    now: &DateTime<Tz>,
) -> RepositoryResult<Windowed<StationReadings>> {
    let window = TimeWindow::for_range_days(range_days, now);
    fetch_window(repo, stations, window).await
}

/// Fetch every reading with `created_at >= window.start`, one query per
/// station, all queries in flight together.
///
/// Returns [`Windowed::Empty`] when no station has a single row; otherwise
/// every station appears in the map, possibly with an empty sequence.
pub async fn fetch_window(
    repo: &dyn ReadingRepository,
    stations: &StationSet,
    window: TimeWindow,
) -> RepositoryResult<Windowed<StationReadings>> {
    log::debug!(
        "Fetching readings since {} for {} stations",
        window.start,
        stations.len()
    );

    let queries = stations.iter().map(|station| async move {
        let rows = repo
            .fetch_readings_since(station, window.start)
            .await
            .map_err(|e| e.with_entity("station", station))?;
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|r| r.station_id == *station && window.contains(&r.created_at))
            .collect();
        Ok::<_, crate::db::RepositoryError>((station.clone(), rows))
    });

    let grouped: StationReadings = try_join_all(queries).await?.into_iter().collect();

    if grouped.values().all(Vec::is_empty) {
        log::debug!("No readings since {}", window.start);
        return Ok(Windowed::Empty(window));
    }

    Ok(Windowed::Data(grouped))
}
