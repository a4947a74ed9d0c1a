//! Numerical aggregation of one station's readings.
//!
//! Two metrics are produced per station:
//!
//! - **DLI** (daily light integral): trapezoidal integral of `ppfd_total`
//!   (µmol·m⁻²·s⁻¹) over time in seconds, divided by 10⁶ to give mol·m⁻².
//! - **R:FR**: mean of `ch_680 / ch_730` over the visited readings whose
//!   far-red channel is strictly positive.
//!
//! Both are rounded to two decimals. The functions here are pure and never fail:
//! missing or non-finite channel values count as zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{Reading, StationReadings, StationSummary, SummaryReport};

const MICROMOL_PER_MOL: f64 = 1_000_000.0;

/// Which readings contribute to the R:FR mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfrSampling {
    /// The first n−1 readings, i.e. the start of every integration interval.
    #[default]
    IntervalStarts,
    /// Every reading in the window.
    AllReadings,
}

impl FromStr for RfrSampling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "interval_starts" => Ok(Self::IntervalStarts),
            "all_readings" | "all" => Ok(Self::AllReadings),
            other => Err(format!("Unknown R:FR sampling mode: {}", other)),
        }
    }
}

impl fmt::Display for RfrSampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntervalStarts => write!(f, "interval_starts"),
            Self::AllReadings => write!(f, "all_readings"),
        }
    }
}

/// Round to two decimals; exact halves go to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Readings ordered by `(created_at, id)`, the order the stores return rows in.
fn ordered(readings: &[Reading]) -> Vec<&Reading> {
    let mut sorted: Vec<&Reading> = readings.iter().collect();
    sorted.sort_by_key(|r| (r.created_at, r.id));
    sorted
}

fn seconds_between(from: &Reading, to: &Reading) -> f64 {
    let delta = to.created_at - from.created_at;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}

fn integrate(sorted: &[&Reading]) -> f64 {
    sorted
        .windows(2)
        .map(|pair| {
            (pair[0].flux() + pair[1].flux()) / 2.0 * seconds_between(pair[0], pair[1])
        })
        .sum::<f64>()
        / MICROMOL_PER_MOL
}

fn rfr_mean(sorted: &[&Reading], sampling: RfrSampling) -> Option<f64> {
    let visited = match sampling {
        RfrSampling::IntervalStarts => &sorted[..sorted.len().saturating_sub(1)],
        RfrSampling::AllReadings => sorted,
    };

    let ratios: Vec<f64> = visited
        .iter()
        .filter(|r| r.far_red() > 0.0)
        .map(|r| r.red() / r.far_red())
        .collect();

    if ratios.is_empty() {
        None
    } else {
        Some(ratios.iter().sum::<f64>() / ratios.len() as f64)
    }
}

/// Unrounded DLI in mol·m⁻². Input order does not matter.
pub fn integrate_dli(readings: &[Reading]) -> f64 {
    integrate(&ordered(readings))
}

/// Unrounded R:FR mean, `None` when no visited reading has positive far-red.
pub fn mean_rfr(readings: &[Reading], sampling: RfrSampling) -> Option<f64> {
    rfr_mean(&ordered(readings), sampling)
}

/// Computes [`StationSummary`] values with a fixed R:FR sampling mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightAggregator {
    rfr_sampling: RfrSampling,
}

impl LightAggregator {
    pub fn new(rfr_sampling: RfrSampling) -> Self {
        Self { rfr_sampling }
    }

    pub fn rfr_sampling(&self) -> RfrSampling {
        self.rfr_sampling
    }

    /// Summarize one station's readings.
    pub fn summarize(&self, readings: &[Reading]) -> StationSummary {
        let sorted = ordered(readings);
        StationSummary {
            dli: round2(integrate(&sorted)),
            avg_rfr: round2(rfr_mean(&sorted, self.rfr_sampling).unwrap_or(0.0)),
        }
    }

    /// Summarize every station of a grouped fetch. Stations with no readings
    /// get a zero summary.
    pub fn summarize_all(&self, grouped: &StationReadings) -> SummaryReport {
        grouped
            .iter()
            .map(|(station, readings)| (station.clone(), self.summarize(readings)))
            .collect()
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod aggregator_tests;
