//! Reading store implementations:
//! - `local`: in-memory store for tests and local development
//! - `postgres`: PostgreSQL store with Diesel and an r2d2 pool
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
