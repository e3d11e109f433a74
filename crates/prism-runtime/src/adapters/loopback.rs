//! # Loopback Source
//!
//! In-process [`RawEventSource`] adapter: callers inject raw event batches
//! per shard and the pipeline consumes them as if they came off a gateway
//! session. Used by the demo binary and the integration suite; a websocket
//! session layer implements the same port in a real deployment.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use prism_pipeline::{RawEventSource, SourceError};
use prism_types::{RawEvent, ShardId};

const SESSION_CAPACITY: usize = 256;

/// In-memory raw event source with one injectable session per shard.
#[derive(Default)]
pub struct LoopbackSource {
    sessions: Mutex<HashMap<ShardId, mpsc::Sender<Vec<RawEvent>>>>,
}

impl LoopbackSource {
    /// Empty source; sessions are opened lazily by `subscribe`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a batch of raw events into a shard's session.
    pub fn inject(&self, shard_id: ShardId, batch: Vec<RawEvent>) -> Result<(), SourceError> {
        let sender = self
            .sessions
            .lock()
            .get(&shard_id)
            .cloned()
            .ok_or(SourceError::UnknownShard(shard_id))?;
        sender
            .try_send(batch)
            .map_err(|e| SourceError::Unavailable(e.to_string()))
    }

    /// End a shard's session; its consumer sees the feed close.
    pub fn disconnect(&self, shard_id: ShardId) {
        if self.sessions.lock().remove(&shard_id).is_some() {
            debug!(shard_id, "Loopback session disconnected");
        }
    }

    /// Whether a shard currently has an open session.
    #[must_use]
    pub fn is_connected(&self, shard_id: ShardId) -> bool {
        self.sessions.lock().contains_key(&shard_id)
    }
}

#[async_trait]
impl RawEventSource for LoopbackSource {
    async fn subscribe(
        &self,
        shard_id: ShardId,
    ) -> Result<mpsc::Receiver<Vec<RawEvent>>, SourceError> {
        let (tx, rx) = mpsc::channel(SESSION_CAPACITY);
        self.sessions.lock().insert(shard_id, tx);
        debug!(shard_id, "Loopback session opened");
        Ok(rx)
    }
}
