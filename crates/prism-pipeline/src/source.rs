//! # Raw Event Source Port
//!
//! The boundary between the pipeline and whatever delivers raw gateway
//! traffic: a websocket session layer in production, an in-memory loopback
//! in tests and demos.

use async_trait::async_trait;
use tokio::sync::mpsc;

use prism_types::{RawEvent, ShardId};

use crate::error::SourceError;

/// Per-shard feed of raw gateway events.
///
/// Each call hands out a fresh receiver of event batches for the shard; a
/// restarted consumer re-subscribes rather than reusing a stale feed. The
/// feed closing (receiver yields `None`) means the upstream session ended.
#[async_trait]
pub trait RawEventSource: Send + Sync {
    /// Open a feed of raw event batches for one shard.
    async fn subscribe(
        &self,
        shard_id: ShardId,
    ) -> Result<mpsc::Receiver<Vec<RawEvent>>, SourceError>;
}
