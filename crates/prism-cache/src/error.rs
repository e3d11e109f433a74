//! # Cache Errors
//!
//! Failures surfaced by cache backends. The pipeline treats a cache failure
//! as a failure of the single event being processed, never of the shard.

use thiserror::Error;

/// Cache operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backing store rejected or failed the operation.
    #[error("Cache backend failure: {0}")]
    Backend(String),

    /// The backend is shutting down or unreachable.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}
