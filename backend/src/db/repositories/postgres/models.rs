use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::sensor_readings;
use crate::models::{NewReading, Reading, ReadingId, SpectralChannels, StationId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sensor_readings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SensorReadingRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub sensor_id: String,
    pub ch_415: Option<f64>,
    pub ch_440: Option<f64>,
    pub ch_485: Option<f64>,
    pub ch_515: Option<f64>,
    pub ch_555: Option<f64>,
    pub ch_590: Option<f64>,
    pub ch_610: Option<f64>,
    pub ch_680: Option<f64>,
    pub ch_730: Option<f64>,
    pub ch_760: Option<f64>,
    pub ch_860: Option<f64>,
    pub ch_clear: Option<f64>,
    pub total_lux: Option<f64>,
    pub ppfd_total: Option<f64>,
}

impl From<SensorReadingRow> for Reading {
    fn from(row: SensorReadingRow) -> Self {
        Reading {
            id: ReadingId::new(row.id),
            created_at: row.created_at,
            station_id: StationId::new(row.sensor_id),
            channels: SpectralChannels {
                ch_415: row.ch_415,
                ch_440: row.ch_440,
                ch_485: row.ch_485,
                ch_515: row.ch_515,
                ch_555: row.ch_555,
                ch_590: row.ch_590,
                ch_610: row.ch_610,
                ch_680: row.ch_680,
                ch_730: row.ch_730,
                ch_760: row.ch_760,
                ch_860: row.ch_860,
                ch_clear: row.ch_clear,
            },
            total_lux: row.total_lux,
            ppfd_total: row.ppfd_total,
        }
    }
}

/// Insert row. `id` and `created_at` are left to the column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sensor_readings)]
pub struct NewSensorReadingRow {
    pub sensor_id: String,
    pub ch_415: Option<f64>,
    pub ch_440: Option<f64>,
    pub ch_485: Option<f64>,
    pub ch_515: Option<f64>,
    pub ch_555: Option<f64>,
    pub ch_590: Option<f64>,
    pub ch_610: Option<f64>,
    pub ch_680: Option<f64>,
    pub ch_730: Option<f64>,
    pub ch_760: Option<f64>,
    pub ch_860: Option<f64>,
    pub ch_clear: Option<f64>,
    pub total_lux: Option<f64>,
    pub ppfd_total: Option<f64>,
}

impl NewSensorReadingRow {
    pub fn new(sensor_id: &StationId, reading: &NewReading) -> Self {
        let channels = &reading.channels;
        Self {
            sensor_id: sensor_id.to_string(),
            ch_415: channels.ch_415,
            ch_440: channels.ch_440,
            ch_485: channels.ch_485,
            ch_515: channels.ch_515,
            ch_555: channels.ch_555,
            ch_590: channels.ch_590,
            ch_610: channels.ch_610,
            ch_680: channels.ch_680,
            ch_730: channels.ch_730,
            ch_760: channels.ch_760,
            ch_860: channels.ch_860,
            ch_clear: channels.ch_clear,
            total_lux: reading.total_lux,
            ppfd_total: reading.ppfd_total,
        }
    }
}
