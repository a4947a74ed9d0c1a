//! Ingestion: shape an inbound payload into a [`NewReading`] and append it.
//!
//! Normalization never fails. Every known field is read if present and
//! recorded as missing otherwise; nothing is coerced to zero and no range
//! checks are applied. The store is the validator of last resort (it rejects a
//! reading without a station id).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::{ReadingRepository, RepositoryResult};
use crate::models::{NewReading, Reading, ReadingId, SpectralBand, StationId};

const STATION_FIELD: &str = "sensor_id";
const TOTAL_LUX_FIELD: &str = "total_lux";
const PPFD_FIELD: &str = "ppfd_total";

/// Ingestion behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Fill a missing `total_lux` with `ch_515 + ch_610 + ch_680`.
    #[serde(default)]
    pub derive_total_lux: bool,
}

/// Acknowledgement of a stored reading.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReceipt {
    pub station_id: StationId,
    pub reading_id: ReadingId,
    pub reading: Reading,
}

impl IngestReceipt {
    pub fn message(&self) -> String {
        format!("Data received from sensor {}", self.station_id)
    }
}

fn numeric_field(payload: &Map<String, Value>, field: &str) -> Option<f64> {
    match payload.get(field)? {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                log::warn!("Ignoring non-numeric value {:?} for field {}", s, field);
                None
            }
        },
        other => {
            log::warn!("Ignoring {} value for numeric field {}", json_type(other), field);
            None
        }
    }
}

fn station_field(payload: &Map<String, Value>) -> Option<StationId> {
    match payload.get(STATION_FIELD)? {
        Value::String(s) if !s.trim().is_empty() => Some(StationId::new(s.trim())),
        Value::Number(n) => Some(StationId::new(n.to_string())),
        Value::Null | Value::String(_) => None,
        other => {
            log::warn!("Ignoring {} value for {}", json_type(other), STATION_FIELD);
            None
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build the canonical insertion record from an arbitrary JSON object.
///
/// Unknown keys are ignored.
pub fn normalize_payload(payload: &Map<String, Value>, options: &IngestOptions) -> NewReading {
    let mut reading = NewReading {
        station_id: station_field(payload),
        ..Default::default()
    };

    for band in SpectralBand::ALL {
        reading
            .channels
            .set(band, numeric_field(payload, band.field_name()));
    }
    reading.total_lux = numeric_field(payload, TOTAL_LUX_FIELD);
    reading.ppfd_total = numeric_field(payload, PPFD_FIELD);

    if options.derive_total_lux && reading.total_lux.is_none() {
        reading.total_lux = reading.channels.additive_total();
    }

    reading
}

/// Normalize `payload` and append it to the store.
///
/// Store failures come back unchanged, e.g. a validation error when the
/// payload had no station id.
pub async fn ingest_reading(
    repo: &dyn ReadingRepository,
    payload: &Map<String, Value>,
    options: &IngestOptions,
) -> RepositoryResult<IngestReceipt> {
    let reading = normalize_payload(payload, options);
    let stored = repo
        .insert_reading(&reading)
        .await
        .map_err(|e| e.with_operation("ingest_reading"))?;

    log::info!(
        "Stored reading {} from station {} ({} channels)",
        stored.id,
        stored.station_id,
        stored.channels.reported_count()
    );

    Ok(IngestReceipt {
        station_id: stored.station_id.clone(),
        reading_id: stored.id,
        reading: stored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LocalRepository, RepositoryError};
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn test_missing_fields_stay_missing() {
        let payload = object(json!({ "sensor_id": "Cama_1", "ch_680": 12.5 }));
        let reading = normalize_payload(&payload, &IngestOptions::default());

        assert_eq!(reading.station_id, Some(StationId::from("Cama_1")));
        assert_eq!(reading.channels.ch_680, Some(12.5));
        assert_eq!(reading.channels.ch_730, None);
        assert_eq!(reading.channels.reported_count(), 1);
        assert_eq!(reading.total_lux, None);
        assert_eq!(reading.ppfd_total, None);
    }

    #[test]
    fn test_no_range_validation() {
        let payload = object(json!({ "sensor_id": "Cama_2", "ch_415": -40.0, "ppfd_total": 1e9 }));
        let reading = normalize_payload(&payload, &IngestOptions::default());
        assert_eq!(reading.channels.ch_415, Some(-40.0));
        assert_eq!(reading.ppfd_total, Some(1e9));
    }

    #[test]
    fn test_lenient_numeric_parsing() {
        let payload = object(json!({
            "sensor_id": "Referencia",
            "ch_515": "101.5",
            "ch_610": "bright",
            "ch_680": true,
            "ch_730": null,
            "ch_clear": [1, 2],
        }));
        let reading = normalize_payload(&payload, &IngestOptions::default());
        assert_eq!(reading.channels.ch_515, Some(101.5));
        assert_eq!(reading.channels.ch_610, None);
        assert_eq!(reading.channels.ch_680, None);
        assert_eq!(reading.channels.ch_730, None);
        assert_eq!(reading.channels.ch_clear, None);
    }

    #[test]
    fn test_station_id_variants() {
        let opts = IngestOptions::default();
        let numeric = normalize_payload(&object(json!({ "sensor_id": 7 })), &opts);
        assert_eq!(numeric.station_id, Some(StationId::from("7")));

        let blank = normalize_payload(&object(json!({ "sensor_id": "  " })), &opts);
        assert_eq!(blank.station_id, None);

        let absent = normalize_payload(&object(json!({ "ch_680": 1.0 })), &opts);
        assert_eq!(absent.station_id, None);
    }

    #[test]
    fn test_derive_total_lux_is_opt_in() {
        let payload = object(json!({
            "sensor_id": "Cama_1",
            "ch_515": 100.0,
            "ch_610": 50.0,
            "ch_680": 25.0,
        }));

        let plain = normalize_payload(&payload, &IngestOptions::default());
        assert_eq!(plain.total_lux, None);

        let derived = normalize_payload(
            &payload,
            &IngestOptions {
                derive_total_lux: true,
            },
        );
        assert_eq!(derived.total_lux, Some(175.0));
    }

    #[test]
    fn test_reported_total_lux_wins_over_derived() {
        let payload = object(json!({
            "sensor_id": "Cama_1",
            "ch_515": 100.0,
            "ch_610": 50.0,
            "ch_680": 25.0,
            "total_lux": 900.0,
        }));
        let reading = normalize_payload(
            &payload,
            &IngestOptions {
                derive_total_lux: true,
            },
        );
        assert_eq!(reading.total_lux, Some(900.0));
    }

    #[tokio::test]
    async fn test_ingest_echoes_station() {
        let repo = LocalRepository::new();
        let payload = object(json!({ "sensor_id": "Cama_2", "ppfd_total": 320.0 }));
        let receipt = ingest_reading(&repo, &payload, &IngestOptions::default())
            .await
            .unwrap();

        assert_eq!(receipt.station_id, StationId::from("Cama_2"));
        assert_eq!(receipt.message(), "Data received from sensor Cama_2");
        assert_eq!(receipt.reading.ppfd_total, Some(320.0));
        assert_eq!(repo.reading_count(), 1);
    }

    #[tokio::test]
    async fn test_ingest_without_station_surfaces_store_error() {
        let repo = LocalRepository::new();
        let payload = object(json!({ "ch_680": 3.0 }));
        let err = ingest_reading(&repo, &payload, &IngestOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("ingest_reading"));
        assert_eq!(repo.reading_count(), 0);
    }
}
