use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::reading::Reading;
use super::station::StationId;

/// Windowed light metrics for one station. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    /// Daily Light Integral in mol·m⁻²·d⁻¹, rounded to 2 decimals.
    pub dli: f64,
    /// Mean red / far-red ratio, rounded to 2 decimals.
    pub avg_rfr: f64,
}

/// Readings of each recognized station, ascending by `created_at`.
pub type StationReadings = BTreeMap<StationId, Vec<Reading>>;

/// Summary of each recognized station.
pub type SummaryReport = BTreeMap<StationId, StationSummary>;

/// Most recent reading of each recognized station, `None` if it never reported.
pub type LatestReadings = BTreeMap<StationId, Option<Reading>>;
