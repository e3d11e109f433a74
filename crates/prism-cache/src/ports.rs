//! # Cache Ports
//!
//! The capability set the pipeline requires from an entity cache: one trait
//! per entity kind, each exposing get/upsert/delete (plus bulk replacement
//! for guild sub-collections). Backends may be any storage; the pipeline
//! depends only on these traits.
//!
//! ## Atomicity Contract
//!
//! `upsert` and `delete` return the value previously held under the key,
//! atomically with respect to the write. Update-class event handlers rely on
//! this to emit exact `(old, new)` diff pairs without a separate fetch that
//! could race with concurrent shards.

use async_trait::async_trait;

use prism_types::{
    Channel, ChannelId, Emoji, Guild, GuildId, Member, Message, MessageId, Presence, Role, RoleId,
    User, UserId, VoiceState,
};

use crate::error::CacheError;

/// Guild records, keyed by guild id.
#[async_trait]
pub trait GuildCache: Send + Sync {
    /// Fetch a guild by id.
    async fn get(&self, id: GuildId) -> Result<Option<Guild>, CacheError>;

    /// Insert or replace a guild, returning the prior record.
    async fn upsert(&self, guild: Guild) -> Result<Option<Guild>, CacheError>;

    /// Remove a guild, returning the evicted record.
    async fn delete(&self, id: GuildId) -> Result<Option<Guild>, CacheError>;
}

/// Channel records, keyed by channel id.
#[async_trait]
pub trait ChannelCache: Send + Sync {
    /// Fetch a channel by id.
    async fn get(&self, id: ChannelId) -> Result<Option<Channel>, CacheError>;

    /// Insert or replace a channel, returning the prior record.
    async fn upsert(&self, channel: Channel) -> Result<Option<Channel>, CacheError>;

    /// Remove a channel, returning the evicted record.
    async fn delete(&self, id: ChannelId) -> Result<Option<Channel>, CacheError>;
}

/// User records, keyed by user id, plus the connected account's identity.
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Fetch a user by id.
    async fn get(&self, id: UserId) -> Result<Option<User>, CacheError>;

    /// Insert or replace a user, returning the prior record.
    async fn upsert(&self, user: User) -> Result<Option<User>, CacheError>;

    /// Remove a user, returning the evicted record.
    async fn delete(&self, id: UserId) -> Result<Option<User>, CacheError>;

    /// Record the connected account's user record (from READY).
    async fn set_current(&self, user: User) -> Result<(), CacheError>;

    /// The connected account's user record, if known.
    async fn current(&self) -> Result<Option<User>, CacheError>;
}

/// Member records, keyed by `(guild_id, user_id)` as a sub-collection of
/// their guild.
#[async_trait]
pub trait MemberCache: Send + Sync {
    /// Fetch a member.
    async fn get(&self, guild_id: GuildId, user_id: UserId)
        -> Result<Option<Member>, CacheError>;

    /// Insert or replace a member, returning the prior record.
    async fn upsert(&self, guild_id: GuildId, member: Member)
        -> Result<Option<Member>, CacheError>;

    /// Remove a member, returning the evicted record.
    async fn delete(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Member>, CacheError>;

    /// Replace a guild's entire member set in one write, returning the set
    /// previously held.
    async fn replace_all(
        &self,
        guild_id: GuildId,
        members: Vec<Member>,
    ) -> Result<Vec<Member>, CacheError>;
}

/// Role records, keyed by `(guild_id, role_id)` as a sub-collection of
/// their guild.
#[async_trait]
pub trait RoleCache: Send + Sync {
    /// Fetch a role.
    async fn get(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<Role>, CacheError>;

    /// Insert or replace a role, returning the prior record.
    async fn upsert(&self, guild_id: GuildId, role: Role) -> Result<Option<Role>, CacheError>;

    /// Remove a role, returning the evicted record.
    async fn delete(&self, guild_id: GuildId, role_id: RoleId)
        -> Result<Option<Role>, CacheError>;

    /// Replace a guild's entire role set in one write, returning the set
    /// previously held.
    async fn replace_all(
        &self,
        guild_id: GuildId,
        roles: Vec<Role>,
    ) -> Result<Vec<Role>, CacheError>;
}

/// Emoji sets, kept per guild and replaced wholesale.
#[async_trait]
pub trait EmojiCache: Send + Sync {
    /// The guild's current emoji set.
    async fn list(&self, guild_id: GuildId) -> Result<Vec<Emoji>, CacheError>;

    /// Replace the guild's emoji set in one write, returning the set
    /// previously held.
    async fn replace_all(
        &self,
        guild_id: GuildId,
        emojis: Vec<Emoji>,
    ) -> Result<Vec<Emoji>, CacheError>;
}

/// Presence records, keyed by `(guild_id, user_id)`.
#[async_trait]
pub trait PresenceCache: Send + Sync {
    /// Fetch a presence.
    async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Presence>, CacheError>;

    /// Insert or replace a presence, returning the prior record.
    async fn upsert(
        &self,
        guild_id: GuildId,
        presence: Presence,
    ) -> Result<Option<Presence>, CacheError>;

    /// Remove a presence, returning the evicted record.
    async fn delete(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<Presence>, CacheError>;
}

/// Voice state records, keyed by `(guild_id, user_id)`.
#[async_trait]
pub trait VoiceStateCache: Send + Sync {
    /// Fetch a voice state.
    async fn get(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<VoiceState>, CacheError>;

    /// Insert or replace a voice state, returning the prior record.
    async fn upsert(
        &self,
        guild_id: GuildId,
        state: VoiceState,
    ) -> Result<Option<VoiceState>, CacheError>;

    /// Remove a voice state, returning the evicted record.
    async fn delete(
        &self,
        guild_id: GuildId,
        user_id: UserId,
    ) -> Result<Option<VoiceState>, CacheError>;
}

/// Message records, keyed by message id.
#[async_trait]
pub trait MessageCache: Send + Sync {
    /// Fetch a message by id.
    async fn get(&self, id: MessageId) -> Result<Option<Message>, CacheError>;

    /// Insert or replace a message, returning the prior record.
    async fn upsert(&self, message: Message) -> Result<Option<Message>, CacheError>;

    /// Remove a message, returning the evicted record.
    async fn delete(&self, id: MessageId) -> Result<Option<Message>, CacheError>;
}
