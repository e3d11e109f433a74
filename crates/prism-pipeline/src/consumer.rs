//! # Shard Consumer
//!
//! The pull side of a shard pair: drains raw event batches from the source
//! feed, runs each event through the processor, and forwards the normalized
//! results into the shard's queue. One consumer per shard; events within a
//! shard stay strictly ordered because this loop is the only path through.

use std::sync::Arc;

use tracing::{info, warn};

use tokio::sync::mpsc;

use prism_types::{NormalizedEvent, RawEvent, ShardId};

use crate::error::SourceError;
use crate::processor::EventProcessor;
use crate::registry::ProducerRegistry;
use crate::source::RawEventSource;

/// A running subscription to one shard's raw feed.
pub struct ShardConsumer {
    shard_id: ShardId,
    processor: Arc<EventProcessor>,
    registry: Arc<ProducerRegistry>,
    feed: mpsc::Receiver<Vec<RawEvent>>,
}

impl ShardConsumer {
    /// Subscribe to the source's feed for a shard.
    pub async fn connect(
        shard_id: ShardId,
        source: &dyn RawEventSource,
        processor: Arc<EventProcessor>,
        registry: Arc<ProducerRegistry>,
    ) -> Result<Self, SourceError> {
        let feed = source.subscribe(shard_id).await?;
        Ok(Self {
            shard_id,
            processor,
            registry,
            feed,
        })
    }

    /// Drain the feed until the upstream session ends.
    ///
    /// Per-event failures are logged and skipped; a failing event never
    /// takes the consumer down.
    pub async fn run(mut self) {
        info!(shard_id = self.shard_id, "Shard consumer started");
        while let Some(batch) = self.feed.recv().await {
            for raw in batch {
                self.handle(raw).await;
            }
        }
        info!(shard_id = self.shard_id, "Raw event feed closed");
    }

    async fn handle(&self, raw: RawEvent) {
        let shard_id = raw.shard_id;
        let kind = raw.kind.clone();

        let events = match self.processor.process(raw).await {
            Ok(events) => events,
            Err(error) => {
                warn!(shard_id, kind = %kind, %error, "Event processing failed, skipping");
                return;
            }
        };
        if events.is_empty() {
            return;
        }

        let Some(queue) = self.registry.get(shard_id) else {
            warn!(shard_id, kind = %kind, "No queue registered for shard, dropping events");
            return;
        };
        for event in events {
            if let Err(error) = queue.enqueue(NormalizedEvent::new(shard_id, event)) {
                warn!(shard_id, %error, "Shard queue closed, dropping remaining events");
                return;
            }
        }
    }
}
