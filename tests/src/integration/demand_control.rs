//! # Demand Control
//!
//! Pull-based release semantics of the shard queues: nothing moves without
//! demand, order survives arbitrary demand patterns, and slow subscribers
//! buffer without touching fast ones.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::Rng;
    use tokio::time::timeout;

    use prism_pipeline::{EventSubscription, ShardQueue};
    use prism_types::{Channel, ChannelId, GatewayEvent, NormalizedEvent};

    fn event(n: u64) -> NormalizedEvent {
        NormalizedEvent::new(
            0,
            GatewayEvent::ChannelCreate(Channel {
                id: ChannelId(n),
                ..Channel::default()
            }),
        )
    }

    fn channel_id(event: &NormalizedEvent) -> u64 {
        match &event.event {
            GatewayEvent::ChannelCreate(channel) => channel.id.0,
            other => panic!("unexpected event: {other:?}"),
        }
    }

    async fn recv_soon(sub: &mut EventSubscription) -> NormalizedEvent {
        timeout(Duration::from_secs(2), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("queue closed")
    }

    #[tokio::test]
    async fn test_three_events_demand_two() {
        let (queue, task) = ShardQueue::spawn(0);
        let mut sub = queue.subscribe().await.unwrap();

        for n in 1..=3 {
            queue.enqueue(event(n)).unwrap();
        }
        sub.request(2).unwrap();

        assert_eq!(channel_id(&recv_soon(&mut sub).await), 1);
        assert_eq!(channel_id(&recv_soon(&mut sub).await), 2);
        assert!(sub.try_recv().is_none());

        // The third event waits for more demand.
        sub.request(1).unwrap();
        assert_eq!(channel_id(&recv_soon(&mut sub).await), 3);

        task.abort();
    }

    #[tokio::test]
    async fn test_order_survives_random_demand_pattern() {
        let (queue, task) = ShardQueue::spawn(0);
        let mut sub = queue.subscribe().await.unwrap();
        let mut rng = rand::thread_rng();

        let total = 200u64;
        let mut enqueued = 0u64;
        let mut requested = 0u64;
        let mut received = 0u64;

        while received < total {
            if enqueued < total && rng.gen_bool(0.5) {
                enqueued += 1;
                queue.enqueue(event(enqueued)).unwrap();
            }
            if requested < total && rng.gen_bool(0.4) {
                let amount: u64 = rng.gen_range(1..=5);
                requested += amount;
                sub.request(amount as usize).unwrap();
            }
            while let Some(e) = sub.try_recv() {
                received += 1;
                assert_eq!(channel_id(&e), received, "release order broke");
            }
            tokio::task::yield_now().await;

            // Drive the tail: once everything is enqueued, ask for the rest.
            if enqueued == total && requested < total {
                sub.request((total - requested) as usize).unwrap();
                requested = total;
            }
        }

        assert_eq!(received, total);
        task.abort();
    }

    #[tokio::test]
    async fn test_slow_subscriber_never_stalls_fast_one() {
        let (queue, task) = ShardQueue::spawn(0);
        let mut fast = queue.subscribe().await.unwrap();
        let slow = queue.subscribe().await.unwrap();

        fast.request(100).unwrap();
        // slow never requests anything.
        for n in 1..=50 {
            queue.enqueue(event(n)).unwrap();
        }

        for n in 1..=50 {
            assert_eq!(channel_id(&recv_soon(&mut fast).await), n);
        }

        let stats = queue.stats().await.unwrap();
        let slow_slot = stats
            .subscribers
            .iter()
            .find(|s| s.id == slow.id())
            .unwrap();
        assert_eq!(slow_slot.backlog, 50);
        assert_eq!(slow_slot.demand, 0);

        task.abort();
    }

    #[tokio::test]
    async fn test_no_event_released_without_demand() {
        let (queue, task) = ShardQueue::spawn(0);
        let mut sub = queue.subscribe().await.unwrap();

        for n in 1..=10 {
            queue.enqueue(event(n)).unwrap();
        }
        // Stats round-trip as a barrier: every enqueue has been handled.
        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.subscribers[0].backlog, 10);
        assert!(sub.try_recv().is_none());

        task.abort();
    }

    #[tokio::test]
    async fn test_demand_credit_accumulates() {
        let (queue, task) = ShardQueue::spawn(0);
        let mut sub = queue.subscribe().await.unwrap();

        // Credit arrives before any event and is spent later.
        sub.request(3).unwrap();
        sub.request(2).unwrap();
        for n in 1..=5 {
            queue.enqueue(event(n)).unwrap();
        }

        for n in 1..=5 {
            assert_eq!(channel_id(&recv_soon(&mut sub).await), n);
        }

        task.abort();
    }
}
