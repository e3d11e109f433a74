//! # In-Memory Cache Adapters
//!
//! HashMap-backed implementations of the cache ports. One `parking_lot`
//! write lock spans each read-modify-write, so `upsert`/`delete` return the
//! prior value atomically as the ports require.
//!
//! Suitable for single-node operation and tests; persistent deployments
//! would implement the same ports over external storage.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use prism_types::{
    Channel, ChannelId, Emoji, Guild, GuildId, Member, Message, MessageId, Presence, Role, RoleId,
    User, UserId, VoiceState,
};

use crate::error::CacheError;
use crate::ports::{
    ChannelCache, EmojiCache, GuildCache, MemberCache, MessageCache, PresenceCache, RoleCache,
    UserCache, VoiceStateCache,
};

/// In-memory guild cache.
#[derive(Default)]
pub struct InMemoryGuildCache {
    inner: RwLock<HashMap<GuildId, Guild>>,
}

#[async_trait]
impl GuildCache for InMemoryGuildCache {
    async fn get(&self, id: GuildId) -> Result<Option<Guild>, CacheError> {
        Ok(self.inner.read().get(&id).cloned())
    }

    async fn upsert(&self, guild: Guild) -> Result<Option<Guild>, CacheError> {
        Ok(self.inner.write().insert(guild.id, guild))
    }

    async fn delete(&self, id: GuildId) -> Result<Option<Guild>, CacheError> {
        Ok(self.inner.write().remove(&id))
    }
}

/// In-memory channel cache.
#[derive(Default)]
pub struct InMemoryChannelCache {
    inner: RwLock<HashMap<ChannelId, Channel>>,
}

#[async_trait]
impl ChannelCache for InMemoryChannelCache {
    async fn get(&self, id: ChannelId) -> Result<Option<Channel>, CacheError> {
        Ok(self.inner.read().get(&id).cloned())
    }

    async fn upsert(&self, channel: Channel) -> Result<Option<Channel>, CacheError> {
        Ok(self.inner.write().insert(channel.id, channel))
    }

    async fn delete(&self, id: ChannelId) -> Result<Option<Channel>, CacheError> {
        Ok(self.inner.write().remove(&id))
    }
}

/// In-memory user cache with the current-identity slot.
#[derive(Default)]
pub struct InMemoryUserCache {
    inner: RwLock<HashMap<UserId, User>>,
    current: RwLock<Option<User>>,
}

#[async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self, id: UserId) -> Result<Option<User>, CacheError> {
        Ok(self.inner.read().get(&id).cloned())
    }

    async fn upsert(&self, user: User) -> Result<Option<User>, CacheError> {
        Ok(self.inner.write().insert(user.id, user))
    }

    async fn delete(&self, id: UserId) -> Result<Option<User>, CacheError> {
        Ok(self.inner.write().remove(&id))
    }

    async fn set_current(&self, user: User) -> Result<(), CacheError> {
        self.inner.write().insert(user.id, user.clone());
        *self.current.write() = Some(user);
        Ok(())
    }

    async fn current(&self) -> Result<Option<User>, CacheError> {
        Ok(self.current.read().clone())
    }
}

/// In-memory member cache keyed by `(guild_id, user_id)`.
#[derive(Default)]
pub struct InMemoryMemberCache {
    inner: RwLock<HashMap<(GuildId, UserId), Member>>,
}

#[async_trait]
impl MemberCache for InMemoryMemberCache {
    async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, CacheError> {
        Ok(self.inner.read().get(&(guild_id, user_id)).cloned())
    }

    async fn upsert(
        &self,
        guild_id: GuildId,
        member: Member,
    ) -> Result<Option<Member>, CacheError> {
        let key = (guild_id, member.user.id);
        Ok(self.inner.write().insert(key, member))
    }

    async fn delete(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, CacheError> {
        Ok(self.inner.write().remove(&(guild_id, user_id)))
    }

    async fn replace_all(
        &self,
        guild_id: GuildId,
        members: Vec<Member>,
    ) -> Result<Vec<Member>, CacheError> {
        let mut map = self.inner.write();
        let old: Vec<Member> = {
            let evicted: Vec<(GuildId, UserId)> = map
                .keys()
                .filter(|(gid, _)| *gid == guild_id)
                .copied()
                .collect();
            evicted
                .into_iter()
                .filter_map(|key| map.remove(&key))
                .collect()
        };
        let inserted = members.len();
        for member in members {
            map.insert((guild_id, member.user.id), member);
        }
        tracing::debug!(%guild_id, evicted = old.len(), inserted, "Member set replaced");
        Ok(old)
    }
}

/// In-memory role cache keyed by `(guild_id, role_id)`.
#[derive(Default)]
pub struct InMemoryRoleCache {
    inner: RwLock<HashMap<(GuildId, RoleId), Role>>,
}

#[async_trait]
impl RoleCache for InMemoryRoleCache {
    async fn get(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<Role>, CacheError> {
        Ok(self.inner.read().get(&(guild_id, role_id)).cloned())
    }

    async fn upsert(&self, guild_id: GuildId, role: Role) -> Result<Option<Role>, CacheError> {
        let key = (guild_id, role.id);
        Ok(self.inner.write().insert(key, role))
    }

    async fn delete(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
    ) -> Result<Option<Role>, CacheError> {
        Ok(self.inner.write().remove(&(guild_id, role_id)))
    }

    async fn replace_all(
        &self,
        guild_id: GuildId,
        roles: Vec<Role>,
    ) -> Result<Vec<Role>, CacheError> {
        let mut map = self.inner.write();
        let evicted: Vec<(GuildId, RoleId)> = map
            .keys()
            .filter(|(gid, _)| *gid == guild_id)
            .copied()
            .collect();
        let old = evicted
            .into_iter()
            .filter_map(|key| map.remove(&key))
            .collect();
        for role in roles {
            map.insert((guild_id, role.id), role);
        }
        Ok(old)
    }
}

/// In-memory emoji cache holding one set per guild.
#[derive(Default)]
pub struct InMemoryEmojiCache {
    inner: RwLock<HashMap<GuildId, Vec<Emoji>>>,
}

#[async_trait]
impl EmojiCache for InMemoryEmojiCache {
    async fn list(&self, guild_id: GuildId) -> Result<Vec<Emoji>, CacheError> {
        Ok(self.inner.read().get(&guild_id).cloned().unwrap_or_default())
    }

    async fn replace_all(
        &self,
        guild_id: GuildId,
        emojis: Vec<Emoji>,
    ) -> Result<Vec<Emoji>, CacheError> {
        Ok(self
            .inner
            .write()
            .insert(guild_id, emojis)
            .unwrap_or_default())
    }
}

/// In-memory presence cache keyed by `(guild_id, user_id)`.
#[derive(Default)]
pub struct InMemoryPresenceCache {
    inner: RwLock<HashMap<(GuildId, UserId), Presence>>,
}

#[async_trait]
impl PresenceCache for InMemoryPresenceCache {
    async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Presence>, CacheError> {
        Ok(self.inner.read().get(&(guild_id, user_id)).cloned())
    }

    async fn upsert(
        &self,
        guild_id: GuildId,
        presence: Presence,
    ) -> Result<Option<Presence>, CacheError> {
        let key = (guild_id, presence.user_id());
        Ok(self.inner.write().insert(key, presence))
    }

    async fn delete(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Presence>, CacheError> {
        Ok(self.inner.write().remove(&(guild_id, user_id)))
    }
}

/// In-memory voice state cache keyed by `(guild_id, user_id)`.
#[derive(Default)]
pub struct InMemoryVoiceStateCache {
    inner: RwLock<HashMap<(GuildId, UserId), VoiceState>>,
}

#[async_trait]
impl VoiceStateCache for InMemoryVoiceStateCache {
    async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<VoiceState>, CacheError> {
        Ok(self.inner.read().get(&(guild_id, user_id)).cloned())
    }

    async fn upsert(
        &self,
        guild_id: GuildId,
        state: VoiceState,
    ) -> Result<Option<VoiceState>, CacheError> {
        let key = (guild_id, state.user_id);
        Ok(self.inner.write().insert(key, state))
    }

    async fn delete(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<VoiceState>, CacheError> {
        Ok(self.inner.write().remove(&(guild_id, user_id)))
    }
}

/// In-memory message cache.
#[derive(Default)]
pub struct InMemoryMessageCache {
    inner: RwLock<HashMap<MessageId, Message>>,
}

#[async_trait]
impl MessageCache for InMemoryMessageCache {
    async fn get(&self, id: MessageId) -> Result<Option<Message>, CacheError> {
        Ok(self.inner.read().get(&id).cloned())
    }

    async fn upsert(&self, message: Message) -> Result<Option<Message>, CacheError> {
        Ok(self.inner.write().insert(message.id, message))
    }

    async fn delete(&self, id: MessageId) -> Result<Option<Message>, CacheError> {
        Ok(self.inner.write().remove(&id))
    }
}

/// A message cache that stores nothing.
///
/// Used when operators disable message caching; deletions then resolve to
/// fallback refs and edits emit `(None, new)` pairs.
#[derive(Default)]
pub struct NoopMessageCache;

#[async_trait]
impl MessageCache for NoopMessageCache {
    async fn get(&self, _id: MessageId) -> Result<Option<Message>, CacheError> {
        Ok(None)
    }

    async fn upsert(&self, _message: Message) -> Result<Option<Message>, CacheError> {
        Ok(None)
    }

    async fn delete(&self, _id: MessageId) -> Result<Option<Message>, CacheError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(id: u64, name: &str) -> Channel {
        Channel {
            id: ChannelId(id),
            name: Some(name.to_string()),
            ..Channel::default()
        }
    }

    #[tokio::test]
    async fn test_upsert_returns_prior_record() {
        let cache = InMemoryChannelCache::default();
        assert_eq!(cache.upsert(channel(42, "a")).await.unwrap(), None);

        let old = cache.upsert(channel(42, "b")).await.unwrap().unwrap();
        assert_eq!(old.name.as_deref(), Some("a"));

        let now = cache.get(ChannelId(42)).await.unwrap().unwrap();
        assert_eq!(now.name.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_delete_returns_evicted_record() {
        let cache = InMemoryGuildCache::default();
        let guild = Guild {
            id: GuildId(1),
            name: Some("den".to_string()),
            ..Guild::default()
        };
        cache.upsert(guild).await.unwrap();

        let evicted = cache.delete(GuildId(1)).await.unwrap().unwrap();
        assert_eq!(evicted.name.as_deref(), Some("den"));
        assert_eq!(cache.delete(GuildId(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_member_keyed_per_guild() {
        let cache = InMemoryMemberCache::default();
        let member = Member {
            user: User {
                id: UserId(7),
                ..User::default()
            },
            ..Member::default()
        };
        cache.upsert(GuildId(1), member.clone()).await.unwrap();
        cache.upsert(GuildId(2), member).await.unwrap();

        assert!(cache.get(GuildId(1), UserId(7)).await.unwrap().is_some());
        cache.delete(GuildId(1), UserId(7)).await.unwrap();
        assert!(cache.get(GuildId(1), UserId(7)).await.unwrap().is_none());
        assert!(cache.get(GuildId(2), UserId(7)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_member_replace_all_scoped_to_guild() {
        let cache = InMemoryMemberCache::default();
        let member = |uid: u64| Member {
            user: User {
                id: UserId(uid),
                ..User::default()
            },
            ..Member::default()
        };
        cache.upsert(GuildId(1), member(1)).await.unwrap();
        cache.upsert(GuildId(1), member(2)).await.unwrap();
        cache.upsert(GuildId(9), member(3)).await.unwrap();

        let old = cache
            .replace_all(GuildId(1), vec![member(4)])
            .await
            .unwrap();
        assert_eq!(old.len(), 2);
        assert!(cache.get(GuildId(1), UserId(4)).await.unwrap().is_some());
        assert!(cache.get(GuildId(1), UserId(1)).await.unwrap().is_none());
        // Other guilds untouched
        assert!(cache.get(GuildId(9), UserId(3)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_emoji_replace_returns_old_set() {
        let cache = InMemoryEmojiCache::default();
        let emoji = |name: &str| Emoji {
            name: Some(name.to_string()),
            ..Emoji::default()
        };
        cache
            .replace_all(GuildId(1), vec![emoji("a"), emoji("b")])
            .await
            .unwrap();

        let old = cache.replace_all(GuildId(1), vec![emoji("c")]).await.unwrap();
        assert_eq!(old.len(), 2);
        assert_eq!(cache.list(GuildId(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_current_user_identity() {
        let cache = InMemoryUserCache::default();
        assert_eq!(cache.current().await.unwrap(), None);

        let me = User {
            id: UserId(1),
            username: Some("bot".to_string()),
            bot: true,
            ..User::default()
        };
        cache.set_current(me.clone()).await.unwrap();
        assert_eq!(cache.current().await.unwrap(), Some(me));
        // Identity is also visible through the plain user lookup
        assert!(cache.get(UserId(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_noop_message_cache_stores_nothing() {
        let cache = NoopMessageCache;
        let message = Message {
            id: MessageId(5),
            channel_id: ChannelId(1),
            ..Message::default()
        };
        assert_eq!(cache.upsert(message).await.unwrap(), None);
        assert_eq!(cache.get(MessageId(5)).await.unwrap(), None);
    }
}
