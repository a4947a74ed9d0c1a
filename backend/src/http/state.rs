//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::db::ReadingRepository;
use crate::models::StationSet;
use crate::services::{IngestOptions, LightAggregator};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ReadingRepository>,
    /// Stations reported by the windowed and latest endpoints.
    pub stations: Arc<StationSet>,
    pub aggregator: LightAggregator,
    pub ingest: IngestOptions,
}

impl AppState {
    /// State with the default station set and options.
    pub fn new(repository: Arc<dyn ReadingRepository>) -> Self {
        Self {
            repository,
            stations: Arc::new(StationSet::default()),
            aggregator: LightAggregator::default(),
            ingest: IngestOptions::default(),
        }
    }

    pub fn from_config(repository: Arc<dyn ReadingRepository>, config: &ServiceConfig) -> Self {
        Self {
            repository,
            stations: Arc::new(config.stations.ids.clone()),
            aggregator: config.aggregator(),
            ingest: config.ingest,
        }
    }

    pub fn with_stations(mut self, stations: StationSet) -> Self {
        self.stations = Arc::new(stations);
        self
    }

    pub fn with_aggregator(mut self, aggregator: LightAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn with_ingest_options(mut self, ingest: IngestOptions) -> Self {
        self.ingest = ingest;
        self
    }
}
