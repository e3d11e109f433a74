//! # Cache Provider
//!
//! The aggregate handle the pipeline carries: one capability per entity
//! kind, each behind `Arc<dyn ...>` so backends can be mixed and swapped at
//! wiring time (and replaced with doubles in tests).

use std::sync::Arc;

use crate::adapters::{
    InMemoryChannelCache, InMemoryEmojiCache, InMemoryGuildCache, InMemoryMemberCache,
    InMemoryMessageCache, InMemoryPresenceCache, InMemoryRoleCache, InMemoryUserCache,
    InMemoryVoiceStateCache, NoopMessageCache,
};
use crate::ports::{
    ChannelCache, EmojiCache, GuildCache, MemberCache, MessageCache, PresenceCache, RoleCache,
    UserCache, VoiceStateCache,
};

/// The full capability set handed to the event processor.
///
/// Shared across all shard pairs; backends must tolerate concurrent access,
/// which the bundled in-memory adapters do via per-region locks.
#[derive(Clone)]
pub struct CacheProvider {
    /// Guild records.
    pub guilds: Arc<dyn GuildCache>,
    /// Channel records.
    pub channels: Arc<dyn ChannelCache>,
    /// User records and the current identity.
    pub users: Arc<dyn UserCache>,
    /// Member records, per guild.
    pub members: Arc<dyn MemberCache>,
    /// Role records, per guild.
    pub roles: Arc<dyn RoleCache>,
    /// Emoji sets, per guild.
    pub emojis: Arc<dyn EmojiCache>,
    /// Presence records, per guild.
    pub presences: Arc<dyn PresenceCache>,
    /// Voice state records, per guild.
    pub voice_states: Arc<dyn VoiceStateCache>,
    /// Message records.
    pub messages: Arc<dyn MessageCache>,
}

impl CacheProvider {
    /// All-in-memory configuration, message caching included.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            guilds: Arc::new(InMemoryGuildCache::default()),
            channels: Arc::new(InMemoryChannelCache::default()),
            users: Arc::new(InMemoryUserCache::default()),
            members: Arc::new(InMemoryMemberCache::default()),
            roles: Arc::new(InMemoryRoleCache::default()),
            emojis: Arc::new(InMemoryEmojiCache::default()),
            presences: Arc::new(InMemoryPresenceCache::default()),
            voice_states: Arc::new(InMemoryVoiceStateCache::default()),
            messages: Arc::new(InMemoryMessageCache::default()),
        }
    }

    /// In-memory configuration with message caching disabled.
    #[must_use]
    pub fn in_memory_without_messages() -> Self {
        Self {
            messages: Arc::new(NoopMessageCache),
            ..Self::in_memory()
        }
    }
}
