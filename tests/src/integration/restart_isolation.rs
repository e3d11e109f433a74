//! # Restart Isolation
//!
//! Supervision scenarios: a failing shard pair restarts alone, resumes
//! with post-restart traffic, and never disturbs sibling shards.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use tokio::sync::{mpsc, watch};
    use tokio::time::timeout;

    use prism_cache::CacheProvider;
    use prism_pipeline::{
        EventProcessor, ProducerRegistry, RawEventSource, ShardSupervisor, SourceError,
    };
    use prism_runtime::adapters::LoopbackSource;
    use prism_types::{EventKind, RawEvent, ShardId};

    use crate::integration::wait_until;

    /// Source wrapper that counts subscriptions per shard.
    struct CountingSource {
        inner: LoopbackSource,
        counts: Mutex<HashMap<ShardId, usize>>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                inner: LoopbackSource::new(),
                counts: Mutex::new(HashMap::new()),
            }
        }

        fn subscribe_count(&self, shard_id: ShardId) -> usize {
            self.counts.lock().get(&shard_id).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl RawEventSource for CountingSource {
        async fn subscribe(
            &self,
            shard_id: ShardId,
        ) -> Result<mpsc::Receiver<Vec<RawEvent>>, SourceError> {
            *self.counts.lock().entry(shard_id).or_insert(0) += 1;
            self.inner.subscribe(shard_id).await
        }
    }

    fn build(
        shards: Vec<ShardId>,
        source: Arc<CountingSource>,
    ) -> (ShardSupervisor, Arc<ProducerRegistry>) {
        let registry = Arc::new(ProducerRegistry::new());
        let supervisor = ShardSupervisor::new(
            shards,
            source,
            Arc::new(EventProcessor::new(CacheProvider::in_memory())),
            Arc::clone(&registry),
        )
        .with_restart_delay(Duration::from_millis(10));
        (supervisor, registry)
    }

    #[tokio::test]
    async fn test_failed_shard_restarts_alone() {
        let source = Arc::new(CountingSource::new());
        let (supervisor, registry) = build(vec![0, 1, 2], Arc::clone(&source));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitors = supervisor.start(shutdown_rx);

        wait_until(|| registry.len() == 3).await;

        source.inner.disconnect(1);
        let watched = Arc::clone(&source);
        wait_until(move || watched.subscribe_count(1) >= 2).await;

        // Siblings saw exactly one subscription each.
        assert_eq!(source.subscribe_count(0), 1);
        assert_eq!(source.subscribe_count(2), 1);

        shutdown_tx.send(true).unwrap();
        for monitor in monitors {
            timeout(Duration::from_secs(1), monitor).await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_stream_resumes_with_post_restart_traffic() {
        let source = Arc::new(CountingSource::new());
        let (supervisor, registry) = build(vec![0], Arc::clone(&source));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitors = supervisor.start(shutdown_rx);

        wait_until(|| registry.len() == 1).await;

        // Events parked in the queue with no subscriber are lost with the
        // pair when it dies.
        source
            .inner
            .inject(
                0,
                vec![RawEvent::new("CHANNEL_CREATE", json!({"id": "1", "type": 0}), 0)],
            )
            .unwrap();
        source.inner.disconnect(0);

        let watched = Arc::clone(&source);
        wait_until(move || watched.subscribe_count(0) >= 2).await;
        wait_until(|| registry.get(0).is_some() && source.inner.is_connected(0)).await;

        let queue = registry.get(0).unwrap();
        let mut sub = queue.subscribe().await.unwrap();
        sub.request(5).unwrap();

        source
            .inner
            .inject(
                0,
                vec![RawEvent::new("CHANNEL_CREATE", json!({"id": "2", "type": 0}), 0)],
            )
            .unwrap();

        let event = timeout(Duration::from_secs(2), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.kind(), EventKind::ChannelCreate);
        // Only the post-restart event arrives.
        assert!(sub.try_recv().is_none());

        drop(sub);
        shutdown_tx.send(true).unwrap();
        for monitor in monitors {
            timeout(Duration::from_secs(1), monitor).await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_sibling_stream_uninterrupted_during_restart() {
        let source = Arc::new(CountingSource::new());
        let (supervisor, registry) = build(vec![0, 1], Arc::clone(&source));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitors = supervisor.start(shutdown_rx);

        wait_until(|| registry.len() == 2).await;

        let queue1 = registry.get(1).unwrap();
        let mut sub1 = queue1.subscribe().await.unwrap();
        sub1.request(10).unwrap();

        // Shard 0 dies while shard 1 keeps delivering.
        source.inner.disconnect(0);
        source
            .inner
            .inject(
                1,
                vec![RawEvent::new("CHANNEL_CREATE", json!({"id": "7", "type": 0}), 1)],
            )
            .unwrap();

        let event = timeout(Duration::from_secs(2), sub1.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.shard_id, 1);

        // Shard 1's subscription survived shard 0's whole restart cycle.
        let watched = Arc::clone(&source);
        wait_until(move || watched.subscribe_count(0) >= 2).await;
        source
            .inner
            .inject(
                1,
                vec![RawEvent::new("CHANNEL_CREATE", json!({"id": "8", "type": 0}), 1)],
            )
            .unwrap();
        let event = timeout(Duration::from_secs(2), sub1.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.shard_id, 1);

        drop(sub1);
        shutdown_tx.send(true).unwrap();
        for monitor in monitors {
            timeout(Duration::from_secs(1), monitor).await.unwrap().unwrap();
        }
    }
}
