//! Storage-facing abstractions: the reading store trait and its error type.

mod error;
mod readings;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use readings::{PoolStats, ReadingRepository};
