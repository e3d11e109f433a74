//! # Pipeline Flow
//!
//! End-to-end scenarios: raw events injected at the source come out of the
//! shard queues normalized, in order, with the entity cache populated along
//! the way.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::timeout;

    use prism_pipeline::{EventSubscription, RawEventSource};
    use prism_runtime::adapters::LoopbackSource;
    use prism_runtime::container::GatewayConfig;
    use prism_runtime::GatewayRuntime;
    use prism_types::{ChannelId, EventKind, GatewayEvent, GuildId, MessageId, RawEvent, UserId};

    use crate::integration::wait_until;

    fn config(shards: u64) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.sharding.shard_count = shards;
        config.supervision.restart_delay_ms = 10;
        config
    }

    async fn start_runtime(shards: u64) -> (GatewayRuntime, Arc<LoopbackSource>) {
        let source = Arc::new(LoopbackSource::new());
        let runtime = GatewayRuntime::new(
            config(shards),
            Arc::clone(&source) as Arc<dyn RawEventSource>,
        );
        runtime.start().unwrap();
        let registry = runtime.registry();
        wait_until(move || registry.len() == shards as usize).await;
        (runtime, source)
    }

    async fn recv_soon(sub: &mut EventSubscription) -> prism_types::NormalizedEvent {
        timeout(Duration::from_secs(2), sub.recv())
            .await
            .expect("timed out waiting for event")
            .expect("queue closed")
    }

    #[tokio::test]
    async fn test_session_bootstrap_flow() {
        let (runtime, source) = start_runtime(1).await;
        let queue = runtime.registry().get(0).unwrap();
        let mut sub = queue.subscribe().await.unwrap();
        sub.request(10).unwrap();

        source
            .inject(
                0,
                vec![
                    RawEvent::new(
                        "READY",
                        json!({
                            "v": 10,
                            "user": {"id": "99", "username": "bot", "bot": true},
                            "session_id": "s1",
                            "guilds": [{"id": "100", "unavailable": true}],
                            "shard": [0, 1]
                        }),
                        0,
                    ),
                    RawEvent::new(
                        "GUILD_CREATE",
                        json!({
                            "id": "100",
                            "name": "den",
                            "channels": [{"id": "200", "type": 0, "name": "general"}],
                            "members": [{"user": {"id": "1", "username": "ada"}}],
                            "roles": [],
                            "emojis": []
                        }),
                        0,
                    ),
                    RawEvent::new(
                        "MESSAGE_CREATE",
                        json!({
                            "id": "300",
                            "channel_id": "200",
                            "author": {"id": "1", "username": "ada"},
                            "content": "hello"
                        }),
                        0,
                    ),
                ],
            )
            .unwrap();

        // READY first. The GUILD_CREATE is suppressed because READY already
        // seeded guild 100 as a stub, so the message comes straight after.
        assert_eq!(recv_soon(&mut sub).await.kind(), EventKind::Ready);
        let message = recv_soon(&mut sub).await;
        assert_eq!(message.kind(), EventKind::MessageCreate);

        // Cache state reflects the whole flow.
        let cache = &runtime.container().cache;
        assert_eq!(
            cache.users.current().await.unwrap().unwrap().id,
            UserId(99)
        );
        let guild = cache.guilds.get(GuildId(100)).await.unwrap().unwrap();
        assert_eq!(guild.name.as_deref(), Some("den"));
        assert!(cache.channels.get(ChannelId(200)).await.unwrap().is_some());
        assert!(cache.messages.get(MessageId(300)).await.unwrap().is_some());

        drop(sub);
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_update_events_carry_diffs_downstream() {
        let (runtime, source) = start_runtime(1).await;
        let queue = runtime.registry().get(0).unwrap();
        let mut sub = queue.subscribe().await.unwrap();
        sub.request(2).unwrap();

        source
            .inject(
                0,
                vec![
                    RawEvent::new("CHANNEL_CREATE", json!({"id": "42", "type": 0, "name": "a"}), 0),
                    RawEvent::new("CHANNEL_UPDATE", json!({"id": "42", "type": 0, "name": "b"}), 0),
                ],
            )
            .unwrap();

        assert_eq!(recv_soon(&mut sub).await.kind(), EventKind::ChannelCreate);
        match recv_soon(&mut sub).await.event {
            GatewayEvent::ChannelUpdate { old, new } => {
                assert_eq!(old.unwrap().name.as_deref(), Some("a"));
                assert_eq!(new.name.as_deref(), Some("b"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(sub);
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_shards_are_partitioned() {
        let (runtime, source) = start_runtime(2).await;
        let registry = runtime.registry();

        let mut sub0 = registry.get(0).unwrap().subscribe().await.unwrap();
        let mut sub1 = registry.get(1).unwrap().subscribe().await.unwrap();
        sub0.request(5).unwrap();
        sub1.request(5).unwrap();

        source
            .inject(
                0,
                vec![RawEvent::new("CHANNEL_CREATE", json!({"id": "1", "type": 0}), 0)],
            )
            .unwrap();
        source
            .inject(
                1,
                vec![RawEvent::new("CHANNEL_CREATE", json!({"id": "2", "type": 0}), 1)],
            )
            .unwrap();

        let on0 = recv_soon(&mut sub0).await;
        let on1 = recv_soon(&mut sub1).await;
        assert_eq!(on0.shard_id, 0);
        assert_eq!(on1.shard_id, 1);
        // No cross-talk between shard queues.
        assert!(sub0.try_recv().is_none());
        assert!(sub1.try_recv().is_none());

        drop(sub0);
        drop(sub1);
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_malformed_event_does_not_stall_the_stream() {
        let (runtime, source) = start_runtime(1).await;
        let queue = runtime.registry().get(0).unwrap();
        let mut sub = queue.subscribe().await.unwrap();
        sub.request(5).unwrap();

        source
            .inject(
                0,
                vec![
                    RawEvent::new("GUILD_CREATE", json!(17), 0),
                    RawEvent::new("CHANNEL_CREATE", json!({"id": "1", "type": 0}), 0),
                ],
            )
            .unwrap();

        // The malformed guild payload is logged and skipped.
        let event = recv_soon(&mut sub).await;
        assert_eq!(event.kind(), EventKind::ChannelCreate);

        drop(sub);
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_events_pass_through_in_order() {
        let (runtime, source) = start_runtime(1).await;
        let queue = runtime.registry().get(0).unwrap();
        let mut sub = queue.subscribe().await.unwrap();
        sub.request(3).unwrap();

        source
            .inject(
                0,
                vec![
                    RawEvent::new("CHANNEL_CREATE", json!({"id": "1", "type": 0}), 0),
                    RawEvent::new("SOME_FUTURE_EVENT", json!({"n": 1}), 0),
                    RawEvent::new("CHANNEL_CREATE", json!({"id": "2", "type": 0}), 0),
                ],
            )
            .unwrap();

        assert_eq!(recv_soon(&mut sub).await.kind(), EventKind::ChannelCreate);
        match recv_soon(&mut sub).await.event {
            GatewayEvent::Unknown { kind, .. } => assert_eq!(kind, "SOME_FUTURE_EVENT"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(recv_soon(&mut sub).await.kind(), EventKind::ChannelCreate);

        drop(sub);
        runtime.shutdown().await;
    }
}
