//! # Shard Supervisor
//!
//! One monitor task per shard. Each monitor owns its shard's queue/consumer
//! pair as a unit: if either half terminates, the survivor is torn down,
//! the queue deregistered, and the pair rebuilt after a restart delay. A
//! failing shard never disturbs its siblings; undelivered events buffered
//! in the dead queue are lost, the stream resumes with post-restart
//! traffic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use prism_types::ShardId;

use crate::consumer::ShardConsumer;
use crate::processor::EventProcessor;
use crate::queue::ShardQueue;
use crate::registry::ProducerRegistry;
use crate::source::RawEventSource;

const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(1);

/// Supervisor for a set of shard pairs.
pub struct ShardSupervisor {
    shards: Vec<ShardId>,
    source: Arc<dyn RawEventSource>,
    processor: Arc<EventProcessor>,
    registry: Arc<ProducerRegistry>,
    restart_delay: Duration,
}

impl ShardSupervisor {
    /// Build a supervisor over the given shards.
    #[must_use]
    pub fn new(
        shards: Vec<ShardId>,
        source: Arc<dyn RawEventSource>,
        processor: Arc<EventProcessor>,
        registry: Arc<ProducerRegistry>,
    ) -> Self {
        Self {
            shards,
            source,
            processor,
            registry,
            restart_delay: DEFAULT_RESTART_DELAY,
        }
    }

    /// Override the delay between a pair's teardown and its restart.
    #[must_use]
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// The registry through which live queues are resolved.
    #[must_use]
    pub fn registry(&self) -> Arc<ProducerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Spawn one monitor task per shard. Monitors run until `shutdown`
    /// flips to true or its sender is dropped.
    #[must_use]
    pub fn start(self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        info!(shards = self.shards.len(), "Starting shard supervisor");
        self.shards
            .iter()
            .map(|&shard_id| {
                tokio::spawn(supervise_shard(
                    shard_id,
                    Arc::clone(&self.source),
                    Arc::clone(&self.processor),
                    Arc::clone(&self.registry),
                    self.restart_delay,
                    shutdown.clone(),
                ))
            })
            .collect()
    }
}

async fn supervise_shard(
    shard_id: ShardId,
    source: Arc<dyn RawEventSource>,
    processor: Arc<EventProcessor>,
    registry: Arc<ProducerRegistry>,
    restart_delay: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let (queue, mut queue_task) = ShardQueue::spawn(shard_id);
        registry.register(queue);

        let consumer = match ShardConsumer::connect(
            shard_id,
            source.as_ref(),
            Arc::clone(&processor),
            Arc::clone(&registry),
        )
        .await
        {
            Ok(consumer) => consumer,
            Err(err) => {
                error!(shard_id, error = %err, "Source subscription failed");
                registry.deregister(shard_id);
                queue_task.abort();
                if pause_or_shutdown(restart_delay, &mut shutdown).await {
                    return;
                }
                continue;
            }
        };
        let mut consumer_task = tokio::spawn(consumer.run());

        tokio::select! {
            _ = &mut consumer_task => {
                warn!(shard_id, "Shard consumer terminated, restarting pair");
                queue_task.abort();
            }
            _ = &mut queue_task => {
                warn!(shard_id, "Shard queue terminated, restarting pair");
                consumer_task.abort();
            }
            _ = shutdown.changed() => {
                info!(shard_id, "Shutting down shard pair");
                consumer_task.abort();
                queue_task.abort();
                registry.deregister(shard_id);
                return;
            }
        }

        registry.deregister(shard_id);
        if pause_or_shutdown(restart_delay, &mut shutdown).await {
            info!(shard_id, "Shutdown during restart delay");
            return;
        }
    }
}

/// Wait out the restart delay; returns true if shutdown arrived first.
async fn pause_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        () = tokio::time::sleep(delay) => false,
        _ = shutdown.changed() => true,
    }
}
