//! Service configuration.
//!
//! Loaded from `solartrace.toml` (same search path as the repository
//! configuration) and then overridden by environment variables:
//!
//! | Variable                       | Setting                          |
//! |--------------------------------|----------------------------------|
//! | `REPOSITORY_TYPE`              | `[repository] type`              |
//! | `DATABASE_URL`                 | `[postgres] database_url`        |
//! | `PG_POOL_MAX`, `PG_POOL_MIN`, ... | `[postgres]` pool settings    |
//! | `SOLARTRACE_STATIONS`          | `[stations] ids` (comma separated) |
//! | `SOLARTRACE_RFR_SAMPLING`      | `[aggregation] rfr_sampling`     |
//! | `SOLARTRACE_DERIVE_TOTAL_LUX`  | `[ingest] derive_total_lux`      |
//! | `HOST` / `PORT`                | `[server] host` / `port`         |
//!
//! A missing file yields the built-in defaults; a malformed file or a bad
//! override value is a configuration error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::db::repo_config::find_default_config;
use crate::db::{RepositoryConfig, RepositoryError};
use crate::models::StationSet;
use crate::services::{IngestOptions, LightAggregator, RfrSampling};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSettings {
    #[serde(default)]
    pub ids: StationSet,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSettings {
    #[serde(default)]
    pub rfr_sampling: RfrSampling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Everything the service needs besides the store itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub storage: RepositoryConfig,
    #[serde(default)]
    pub stations: StationSettings,
    #[serde(default)]
    pub aggregation: AggregationSettings,
    #[serde(default)]
    pub ingest: IngestOptions,
    #[serde(default)]
    pub server: ServerSettings,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn override_number<T, G>(get: &G, key: &str, target: &mut T) -> Result<(), RepositoryError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        *target = raw.trim().parse().map_err(|_| {
            RepositoryError::configuration(format!("{} must be a number, got {:?}", key, raw))
        })?;
    }
    Ok(())
}

impl ServiceConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Default file (if any) plus environment overrides.
    pub fn load() -> Result<Self, RepositoryError> {
        let mut config = match find_default_config() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                log::info!("No configuration file found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), RepositoryError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), RepositoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(repo_type) = get("REPOSITORY_TYPE") {
            self.storage.repository.repo_type = repo_type;
        }
        if let Some(url) = get("DATABASE_URL").or_else(|| get("PG_DATABASE_URL")) {
            self.storage.postgres.database_url = url;
        }
        let pg = &mut self.storage.postgres;
        override_number(&get, "PG_POOL_MAX", &mut pg.max_connections)?;
        override_number(&get, "PG_POOL_MIN", &mut pg.min_connections)?;
        override_number(&get, "PG_CONN_TIMEOUT_SEC", &mut pg.connect_timeout)?;
        override_number(&get, "PG_IDLE_TIMEOUT_SEC", &mut pg.idle_timeout)?;
        override_number(&get, "PG_MAX_RETRIES", &mut pg.max_retries)?;
        override_number(&get, "PG_RETRY_DELAY_MS", &mut pg.retry_delay_ms)?;

        if let Some(list) = get("SOLARTRACE_STATIONS") {
            self.stations.ids = StationSet::parse_list(&list);
        }
        if let Some(mode) = get("SOLARTRACE_RFR_SAMPLING") {
            self.aggregation.rfr_sampling = mode
                .parse::<RfrSampling>()
                .map_err(RepositoryError::configuration)?;
        }
        if let Some(flag) = get("SOLARTRACE_DERIVE_TOTAL_LUX") {
            self.ingest.derive_total_lux = parse_bool(&flag).ok_or_else(|| {
                RepositoryError::configuration(format!(
                    "SOLARTRACE_DERIVE_TOTAL_LUX must be a boolean, got {:?}",
                    flag
                ))
            })?;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                RepositoryError::configuration(format!("PORT must be a port number, got {:?}", port))
            })?;
        }

        if self.stations.ids.is_empty() {
            return Err(RepositoryError::configuration(
                "At least one station id must be configured",
            ));
        }

        Ok(())
    }

    pub fn aggregator(&self) -> LightAggregator {
        LightAggregator::new(self.aggregation.rfr_sampling)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
