//! Public API surface.
//!
//! Consolidates the types callers exchange with the service layer. All of
//! them derive `Serialize`/`Deserialize` where they cross the HTTP boundary.

pub use crate::config::{AggregationSettings, ServerSettings, ServiceConfig, StationSettings};
pub use crate::db::{ReadingRepository, RepositoryError, RepositoryResult};
pub use crate::models::{
    LatestReadings, NewReading, Reading, ReadingId, SpectralBand, SpectralChannels, StationId,
    StationReadings, StationSet, StationSummary, SummaryReport, TimeWindow, WindowKind, Windowed,
    DEFAULT_RANGE_DAYS, DEFAULT_STATIONS,
};
pub use crate::services::{IngestOptions, IngestReceipt, LightAggregator, RfrSampling};

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
