//! # Pipeline Errors
//!
//! Error taxonomy for the shard pipeline. Processing errors are per-event
//! and recoverable (the consumer logs and moves on); source errors surface
//! at subscription time and drive supervisor restarts.

use thiserror::Error;

use prism_cache::CacheError;
use prism_types::ShardId;

/// Failure while normalizing a single raw event.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A cache port returned an error.
    #[error("Cache operation failed: {0}")]
    Cache(#[from] CacheError),

    /// The payload did not decode into the shape its tag promises.
    #[error("Malformed {kind} payload: {source}")]
    Payload {
        /// Wire tag of the offending event.
        kind: String,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The payload decoded but lacked a field the handler cannot proceed
    /// without.
    #[error("{kind} payload missing required field '{field}'")]
    MissingField {
        /// Wire tag of the offending event.
        kind: &'static str,
        /// The absent field.
        field: &'static str,
    },
}

/// Failure to obtain a raw event feed for a shard.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source does not know the requested shard.
    #[error("Unknown shard: {0}")]
    UnknownShard(ShardId),

    /// The source is not currently able to deliver events.
    #[error("Event source unavailable: {0}")]
    Unavailable(String),
}

/// A shard queue's command channel is gone; the queue task has terminated.
#[derive(Debug, Error)]
#[error("Shard queue for shard {shard_id} is closed")]
pub struct QueueClosed {
    /// Shard whose queue went away.
    pub shard_id: ShardId,
}
