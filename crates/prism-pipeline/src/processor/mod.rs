//! # Event Processor
//!
//! Normalizes raw gateway events: decodes each payload by its tag, applies
//! the cache-consistency policy for that event kind, and returns the list
//! of events to publish. An empty list suppresses the event.
//!
//! Handlers fall into a small set of policy classes:
//!
//! - **create/insert**: decode the entity, cache it, emit it;
//! - **update-with-diff**: write through the cache and emit `(old, new)`,
//!   with `old` taken atomically from the write itself;
//! - **delete-with-fallback**: evict and emit the cached record, or a bare
//!   id reference when the cache held nothing;
//! - **lookup-augment**: no write; resolve referenced ids through the cache
//!   and emit resolved-or-id references;
//! - **bulk-replace**: swap an entire guild sub-collection in one write;
//! - **passthrough**: no cache interaction at all.

mod channel;
mod guild;
mod message;
mod user;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use prism_cache::CacheProvider;
use prism_types::{
    ChannelId, ChannelRef, EventKind, GatewayEvent, GuildId, GuildRef, RawEvent, UserId, UserRef,
};

use crate::error::ProcessError;

/// The per-event normalization engine. Stateless apart from the cache
/// handle; shared by every shard consumer.
pub struct EventProcessor {
    cache: CacheProvider,
}

impl EventProcessor {
    /// Build a processor over the given cache capability set.
    #[must_use]
    pub fn new(cache: CacheProvider) -> Self {
        Self { cache }
    }

    /// The cache this processor writes through.
    #[must_use]
    pub fn cache(&self) -> &CacheProvider {
        &self.cache
    }

    /// Normalize one raw event.
    ///
    /// Returns the events to publish, in order; an empty list means the
    /// event is suppressed. Errors cover payload decode failures and cache
    /// faults; both leave the raw event consumed.
    pub async fn process(&self, raw: RawEvent) -> Result<Vec<GatewayEvent>, ProcessError> {
        let cache = &self.cache;
        let RawEvent {
            kind,
            payload,
            shard_id,
        } = raw;

        let events = match &kind {
            EventKind::Ready => user::ready(cache, decode(&kind, payload)?).await?,
            EventKind::Resumed => vec![GatewayEvent::Resumed(payload)],

            EventKind::ChannelCreate => channel::create(cache, decode(&kind, payload)?).await?,
            EventKind::ChannelUpdate => channel::update(cache, decode(&kind, payload)?).await?,
            EventKind::ChannelDelete => channel::delete(cache, decode(&kind, payload)?).await?,
            EventKind::ChannelPinsUpdate => {
                channel::pins_update(cache, decode(&kind, payload)?).await?
            }

            EventKind::GuildCreate => guild::create(cache, decode(&kind, payload)?).await?,
            EventKind::GuildUpdate => guild::update(cache, decode(&kind, payload)?).await?,
            EventKind::GuildDelete => guild::delete(cache, decode(&kind, payload)?).await?,
            EventKind::GuildBanAdd => guild::ban_add(cache, decode(&kind, payload)?).await?,
            EventKind::GuildBanRemove => guild::ban_remove(cache, decode(&kind, payload)?).await?,
            EventKind::GuildEmojisUpdate => {
                guild::emojis_update(cache, decode(&kind, payload)?).await?
            }
            EventKind::GuildIntegrationsUpdate => {
                guild::integrations_update(cache, decode(&kind, payload)?).await?
            }
            EventKind::GuildMemberAdd => guild::member_add(cache, decode(&kind, payload)?).await?,
            EventKind::GuildMemberRemove => {
                guild::member_remove(cache, decode(&kind, payload)?).await?
            }
            EventKind::GuildMemberUpdate => {
                guild::member_update(cache, decode(&kind, payload)?).await?
            }
            EventKind::GuildMembersChunk => {
                guild::members_chunk(cache, decode(&kind, payload)?).await?
            }
            EventKind::GuildRoleCreate => guild::role_create(cache, decode(&kind, payload)?).await?,
            EventKind::GuildRoleUpdate => guild::role_update(cache, decode(&kind, payload)?).await?,
            EventKind::GuildRoleDelete => guild::role_delete(cache, decode(&kind, payload)?).await?,

            EventKind::MessageCreate => message::create(cache, decode(&kind, payload)?).await?,
            EventKind::MessageUpdate => message::update(cache, decode(&kind, payload)?).await?,
            EventKind::MessageDelete => message::delete(cache, decode(&kind, payload)?).await?,
            EventKind::MessageDeleteBulk => {
                message::delete_bulk(cache, decode(&kind, payload)?).await?
            }
            EventKind::MessageReactionAdd => {
                message::reaction_add(cache, decode(&kind, payload)?).await?
            }
            EventKind::MessageReactionRemove => {
                message::reaction_remove(cache, decode(&kind, payload)?).await?
            }
            EventKind::MessageReactionRemoveAll => {
                message::reaction_remove_all(cache, decode(&kind, payload)?).await?
            }

            EventKind::PresenceUpdate => user::presence_update(cache, decode(&kind, payload)?).await?,
            // Bulk presence replacement is user-account traffic; suppressed.
            EventKind::PresencesReplace => Vec::new(),
            EventKind::TypingStart => channel::typing_start(cache, decode(&kind, payload)?).await?,
            EventKind::UserUpdate => user::update(cache, decode(&kind, payload)?).await?,
            EventKind::VoiceStateUpdate => {
                user::voice_state_update(cache, decode(&kind, payload)?).await?
            }
            EventKind::VoiceServerUpdate => {
                vec![GatewayEvent::VoiceServerUpdate(decode(&kind, payload)?)]
            }
            EventKind::WebhooksUpdate => {
                channel::webhooks_update(cache, decode(&kind, payload)?).await?
            }

            EventKind::Unknown(tag) => {
                warn!(
                    kind = %tag,
                    shard_id,
                    payload = payload_shape(&payload),
                    "Unrecognized gateway event, passing payload through"
                );
                vec![GatewayEvent::Unknown {
                    kind: tag.clone(),
                    payload,
                }]
            }
        };

        Ok(events)
    }
}

/// Decode a payload into its per-kind shape, tagging errors with the tag.
fn decode<T: DeserializeOwned>(kind: &EventKind, payload: Value) -> Result<T, ProcessError> {
    serde_json::from_value(payload).map_err(|source| ProcessError::Payload {
        kind: kind.as_tag().to_string(),
        source,
    })
}

/// Coarse payload description for diagnostics; never logs payload contents.
const fn payload_shape(payload: &Value) -> &'static str {
    match payload {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolve a channel reference from cache, falling back to its id.
pub(crate) async fn resolve_channel(
    cache: &CacheProvider,
    id: ChannelId,
    guild_id: Option<GuildId>,
) -> Result<ChannelRef, ProcessError> {
    Ok(match cache.channels.get(id).await? {
        Some(channel) => ChannelRef::Cached(channel),
        None => ChannelRef::Id { id, guild_id },
    })
}

/// Resolve a user reference from cache, falling back to its id.
pub(crate) async fn resolve_user(
    cache: &CacheProvider,
    id: UserId,
) -> Result<UserRef, ProcessError> {
    Ok(match cache.users.get(id).await? {
        Some(user) => UserRef::Cached(user),
        None => UserRef::Id(id),
    })
}

/// Resolve a guild reference from cache, falling back to its id.
pub(crate) async fn resolve_guild(
    cache: &CacheProvider,
    id: GuildId,
) -> Result<GuildRef, ProcessError> {
    Ok(match cache.guilds.get(id).await? {
        Some(guild) => GuildRef::Cached(guild),
        None => GuildRef::Id(id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_types::{
        Channel, Guild, Member, MessageId, Role, RoleId, RoleRef, User,
    };
    use serde_json::json;

    fn processor() -> EventProcessor {
        EventProcessor::new(CacheProvider::in_memory())
    }

    fn raw(tag: &str, payload: Value) -> RawEvent {
        RawEvent::new(tag, payload, 0)
    }

    async fn one(processor: &EventProcessor, event: RawEvent) -> GatewayEvent {
        let mut events = processor.process(event).await.unwrap();
        assert_eq!(events.len(), 1, "expected exactly one event");
        events.remove(0)
    }

    #[tokio::test]
    async fn test_channel_update_emits_old_and_new() {
        let p = processor();

        let created = one(
            &p,
            raw("CHANNEL_CREATE", json!({"id": "42", "type": 0, "name": "a"})),
        )
        .await;
        assert!(matches!(created, GatewayEvent::ChannelCreate(_)));

        let updated = one(
            &p,
            raw("CHANNEL_UPDATE", json!({"id": "42", "type": 0, "name": "b"})),
        )
        .await;
        match updated {
            GatewayEvent::ChannelUpdate { old, new } => {
                assert_eq!(old.unwrap().name.as_deref(), Some("a"));
                assert_eq!(new.name.as_deref(), Some("b"));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let cached = p.cache().channels.get(ChannelId(42)).await.unwrap();
        assert_eq!(cached.unwrap().name.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_channel_delete_falls_back_to_id() {
        let p = processor();
        let deleted = one(&p, raw("CHANNEL_DELETE", json!({"id": "9", "type": 0}))).await;
        match deleted {
            GatewayEvent::ChannelDelete(r) => {
                assert!(!r.is_cached());
                assert_eq!(r.id(), ChannelId(9));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reaction_resolves_cached_and_falls_back() {
        let p = processor();
        p.cache()
            .channels
            .upsert(Channel {
                id: ChannelId(9),
                ..Channel::default()
            })
            .await
            .unwrap();

        // User 7 is not cached, channel 9 is.
        let event = one(
            &p,
            raw(
                "MESSAGE_REACTION_ADD",
                json!({
                    "user_id": "7",
                    "channel_id": "9",
                    "message_id": "11",
                    "emoji": {"id": null, "name": "x"}
                }),
            ),
        )
        .await;
        match event {
            GatewayEvent::MessageReactionAdd(reaction) => {
                assert_eq!(reaction.user, UserRef::Id(UserId(7)));
                assert!(reaction.channel.is_cached());
                assert_eq!(reaction.message_id, MessageId(11));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_guild_create_hydrates_and_suppresses_refresh() {
        let p = processor();
        let payload = json!({
            "id": "100",
            "name": "den",
            "channels": [{"id": "200", "type": 0, "name": "general"}],
            "members": [{"user": {"id": "1", "username": "ada"}}],
            "roles": [{"id": "300", "name": "admin"}],
            "emojis": []
        });

        let first = one(&p, raw("GUILD_CREATE", payload.clone())).await;
        assert!(matches!(first, GatewayEvent::GuildCreate(_)));

        // Nested collections landed in their own regions, tagged with the
        // guild id.
        let channel = p.cache().channels.get(ChannelId(200)).await.unwrap().unwrap();
        assert_eq!(channel.guild_id, Some(GuildId(100)));
        let member = p
            .cache()
            .members
            .get(GuildId(100), UserId(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(member.guild_id, Some(GuildId(100)));
        assert!(p
            .cache()
            .roles
            .get(GuildId(100), RoleId(300))
            .await
            .unwrap()
            .is_some());

        // Same guild again: silent refresh, nothing emitted.
        let again = p.process(raw("GUILD_CREATE", payload)).await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_guild_delete_unavailable_marks_outage() {
        let p = processor();
        p.cache()
            .guilds
            .upsert(Guild {
                id: GuildId(5),
                name: Some("den".to_string()),
                ..Guild::default()
            })
            .await
            .unwrap();

        let event = one(
            &p,
            raw("GUILD_DELETE", json!({"id": "5", "unavailable": true})),
        )
        .await;
        match event {
            GatewayEvent::GuildUnavailable { old, new } => {
                assert_eq!(old.unwrap().name.as_deref(), Some("den"));
                assert!(new.unavailable);
                assert_eq!(new.name.as_deref(), Some("den"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        // Record kept, flagged unavailable.
        let cached = p.cache().guilds.get(GuildId(5)).await.unwrap().unwrap();
        assert!(cached.unavailable);
    }

    #[tokio::test]
    async fn test_guild_delete_removal_evicts() {
        let p = processor();
        p.cache()
            .guilds
            .upsert(Guild {
                id: GuildId(5),
                ..Guild::default()
            })
            .await
            .unwrap();

        let event = one(&p, raw("GUILD_DELETE", json!({"id": "5"}))).await;
        match event {
            GatewayEvent::GuildDelete(GuildRef::Cached(guild)) => {
                assert_eq!(guild.id, GuildId(5));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(p.cache().guilds.get(GuildId(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_member_remove_carries_evicted_record() {
        let p = processor();
        p.cache()
            .members
            .upsert(
                GuildId(1),
                Member {
                    user: User {
                        id: UserId(2),
                        ..User::default()
                    },
                    nick: Some("nick".to_string()),
                    ..Member::default()
                },
            )
            .await
            .unwrap();

        let event = one(
            &p,
            raw(
                "GUILD_MEMBER_REMOVE",
                json!({"guild_id": "1", "user": {"id": "2", "username": "bea"}}),
            ),
        )
        .await;
        match event {
            GatewayEvent::GuildMemberRemove {
                guild_id,
                user,
                member,
            } => {
                assert_eq!(guild_id, GuildId(1));
                assert_eq!(user.id, UserId(2));
                assert_eq!(member.unwrap().nick.as_deref(), Some("nick"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_role_delete_fallback_carries_id_pair() {
        let p = processor();
        let event = one(
            &p,
            raw("GUILD_ROLE_DELETE", json!({"guild_id": "1", "role_id": "3"})),
        )
        .await;
        match event {
            GatewayEvent::GuildRoleDelete { guild_id, role } => {
                assert_eq!(guild_id, GuildId(1));
                assert_eq!(
                    role,
                    RoleRef::Id {
                        guild_id: GuildId(1),
                        role_id: RoleId(3)
                    }
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_emojis_update_reports_replaced_set() {
        let p = processor();
        p.cache()
            .emojis
            .replace_all(
                GuildId(1),
                vec![prism_types::Emoji {
                    name: Some("old".to_string()),
                    ..prism_types::Emoji::default()
                }],
            )
            .await
            .unwrap();

        let event = one(
            &p,
            raw(
                "GUILD_EMOJIS_UPDATE",
                json!({"guild_id": "1", "emojis": [{"id": "8", "name": "new"}]}),
            ),
        )
        .await;
        match event {
            GatewayEvent::GuildEmojisUpdate { guild_id, old, new } => {
                assert_eq!(guild_id, GuildId(1));
                assert_eq!(old.len(), 1);
                assert_eq!(old[0].name.as_deref(), Some("old"));
                assert_eq!(new[0].name.as_deref(), Some("new"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_members_chunk_replaces_guild_set() {
        let p = processor();
        let event = one(
            &p,
            raw(
                "GUILD_MEMBERS_CHUNK",
                json!({
                    "guild_id": "1",
                    "members": [
                        {"user": {"id": "1"}},
                        {"user": {"id": "2"}}
                    ],
                    "chunk_index": 0,
                    "chunk_count": 1
                }),
            ),
        )
        .await;
        match event {
            GatewayEvent::GuildMembersChunk { guild_id, members } => {
                assert_eq!(guild_id, GuildId(1));
                assert_eq!(members.len(), 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(p
            .cache()
            .members
            .get(GuildId(1), UserId(2))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_ready_records_identity_and_guild_stubs() {
        let p = processor();
        let event = one(
            &p,
            raw(
                "READY",
                json!({
                    "v": 10,
                    "user": {"id": "99", "username": "bot", "bot": true},
                    "session_id": "s",
                    "guilds": [{"id": "100", "unavailable": true}],
                    "shard": [0, 2]
                }),
            ),
        )
        .await;
        assert!(matches!(event, GatewayEvent::Ready(_)));

        let current = p.cache().users.current().await.unwrap().unwrap();
        assert_eq!(current.id, UserId(99));
        let stub = p.cache().guilds.get(GuildId(100)).await.unwrap().unwrap();
        assert!(stub.unavailable);
    }

    #[tokio::test]
    async fn test_message_create_populates_author_and_mentions() {
        let p = processor();
        let event = one(
            &p,
            raw(
                "MESSAGE_CREATE",
                json!({
                    "id": "11",
                    "channel_id": "9",
                    "author": {"id": "7", "username": "ada"},
                    "content": "hi",
                    "mentions": [{"id": "8", "username": "bea"}]
                }),
            ),
        )
        .await;
        assert!(matches!(event, GatewayEvent::MessageCreate(_)));

        assert!(p.cache().messages.get(MessageId(11)).await.unwrap().is_some());
        assert!(p.cache().users.get(UserId(7)).await.unwrap().is_some());
        assert!(p.cache().users.get(UserId(8)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_message_cache_disabled_still_emits() {
        let p = EventProcessor::new(CacheProvider::in_memory_without_messages());
        let event = one(
            &p,
            raw(
                "MESSAGE_CREATE",
                json!({
                    "id": "11",
                    "channel_id": "9",
                    "author": {"id": "7"},
                    "content": "hi"
                }),
            ),
        )
        .await;
        assert!(matches!(event, GatewayEvent::MessageCreate(_)));
        assert!(p.cache().messages.get(MessageId(11)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_presence_update_emits_diff() {
        let p = processor();
        let payload = json!({
            "user": {"id": "7"},
            "guild_id": "1",
            "status": "online",
            "activities": []
        });
        let first = one(&p, raw("PRESENCE_UPDATE", payload)).await;
        match first {
            GatewayEvent::PresenceUpdate { old, new } => {
                assert!(old.is_none());
                assert_eq!(new.status, "online");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let second = one(
            &p,
            raw(
                "PRESENCE_UPDATE",
                json!({
                    "user": {"id": "7"},
                    "guild_id": "1",
                    "status": "idle",
                    "activities": []
                }),
            ),
        )
        .await;
        match second {
            GatewayEvent::PresenceUpdate { old, new } => {
                assert_eq!(old.unwrap().status, "online");
                assert_eq!(new.status, "idle");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_presences_replace_is_suppressed() {
        let p = processor();
        let events = p
            .process(raw("PRESENCES_REPLACE", json!([])))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_kind_passes_payload_through() {
        let p = processor();
        let payload = json!({"anything": true});
        let event = one(&p, raw("SOME_FUTURE_EVENT", payload.clone())).await;
        match event {
            GatewayEvent::Unknown { kind, payload: got } => {
                assert_eq!(kind, "SOME_FUTURE_EVENT");
                assert_eq!(got, payload);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_error() {
        let p = processor();
        let error = p
            .process(raw("CHANNEL_CREATE", json!("not an object")))
            .await
            .unwrap_err();
        match error {
            ProcessError::Payload { kind, .. } => assert_eq!(kind, "CHANNEL_CREATE"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resumed_passes_through() {
        let p = processor();
        let event = one(&p, raw("RESUMED", json!({"_trace": []}))).await;
        assert!(matches!(event, GatewayEvent::Resumed(_)));
    }

    #[tokio::test]
    async fn test_typing_start_resolves_references() {
        let p = processor();
        p.cache()
            .users
            .upsert(User {
                id: UserId(7),
                username: Some("ada".to_string()),
                ..User::default()
            })
            .await
            .unwrap();

        let event = one(
            &p,
            raw(
                "TYPING_START",
                json!({"channel_id": "9", "user_id": "7", "timestamp": 123}),
            ),
        )
        .await;
        match event {
            GatewayEvent::TypingStart {
                channel,
                user,
                timestamp,
            } => {
                assert!(!channel.is_cached());
                assert!(user.is_cached());
                assert_eq!(timestamp, 123);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_role_update_keyed_per_guild() {
        let p = processor();
        let first = one(
            &p,
            raw(
                "GUILD_ROLE_CREATE",
                json!({"guild_id": "1", "role": {"id": "3", "name": "mods"}}),
            ),
        )
        .await;
        assert!(matches!(first, GatewayEvent::GuildRoleCreate { .. }));

        let second = one(
            &p,
            raw(
                "GUILD_ROLE_UPDATE",
                json!({"guild_id": "1", "role": {"id": "3", "name": "admins"}}),
            ),
        )
        .await;
        match second {
            GatewayEvent::GuildRoleUpdate { old, new, .. } => {
                assert_eq!(old.unwrap().name, "mods");
                assert_eq!(new.name, "admins");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        let cached: Option<Role> = p.cache().roles.get(GuildId(1), RoleId(3)).await.unwrap();
        assert_eq!(cached.unwrap().name, "admins");
    }

    #[tokio::test]
    async fn test_user_update_refreshes_identity() {
        let p = processor();
        p.cache()
            .users
            .set_current(User {
                id: UserId(99),
                username: Some("old-name".to_string()),
                ..User::default()
            })
            .await
            .unwrap();

        let event = one(
            &p,
            raw("USER_UPDATE", json!({"id": "99", "username": "new-name"})),
        )
        .await;
        match event {
            GatewayEvent::UserUpdate { old, new } => {
                assert_eq!(old.unwrap().username.as_deref(), Some("old-name"));
                assert_eq!(new.username.as_deref(), Some("new-name"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        let current = p.cache().users.current().await.unwrap().unwrap();
        assert_eq!(current.username.as_deref(), Some("new-name"));
    }
}
