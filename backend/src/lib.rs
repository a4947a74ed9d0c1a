//! # SolarTrace backend
//!
//! Ingests periodic multi-channel light-spectrum readings from greenhouse
//! sensor stations and derives two horticultural lighting metrics over time
//! windows: the Daily Light Integral (DLI) and the Red:Far-Red ratio (R:FR).
//!
//! ## Architecture
//!
//! - [`models`]: readings, spectral bands, stations, time windows, summaries
//! - [`db`]: the reading store trait, its error type and its backends
//! - [`services`]: ingestion, windowed fetch, aggregation, latest-reading resolver
//! - [`config`]: `solartrace.toml` plus environment overrides
//! - [`api`]: flat re-export of the public types
//! - [`http`]: axum REST surface (feature `http-server`)

// RepositoryError carries an ErrorContext on every variant.
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
