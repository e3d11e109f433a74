//! # Raw and Normalized Events
//!
//! `RawEvent` is what the upstream per-shard source delivers; `GatewayEvent`
//! is the normalized union the processor emits, with one variant per
//! dispatch shape: plain entities, old/new diff pairs, resolved-or-fallback
//! references, bulk lists, and typed passthroughs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Channel, Emoji, Guild, Member, Message, Presence, Role, User, VoiceState};
use crate::ids::{ChannelId, GuildId, MessageId, RoleId, ShardId, UserId};
use crate::kind::EventKind;
use crate::payloads::{Ready, VoiceServerUpdate};

/// A raw event as delivered by the upstream source: typed tag, opaque
/// payload, shard of origin. Consumed exactly once per shard consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Event tag.
    pub kind: EventKind,
    /// Opaque structured payload; decoded per kind by the processor.
    pub payload: Value,
    /// Shard the event arrived on.
    pub shard_id: ShardId,
}

impl RawEvent {
    /// Build a raw event from a wire tag and payload.
    #[must_use]
    pub fn new(tag: &str, payload: Value, shard_id: ShardId) -> Self {
        Self {
            kind: EventKind::from_tag(tag),
            payload,
            shard_id,
        }
    }
}

/// A channel resolved from cache, or its bare id when uncached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChannelRef {
    /// The full cached record.
    Cached(Channel),
    /// Fallback: the id, paired with the guild id when the payload knew it.
    Id {
        /// Channel id.
        id: ChannelId,
        /// Guild scope from the payload, if any.
        guild_id: Option<GuildId>,
    },
}

impl ChannelRef {
    /// The channel id regardless of resolution.
    #[must_use]
    pub fn id(&self) -> ChannelId {
        match self {
            Self::Cached(channel) => channel.id,
            Self::Id { id, .. } => *id,
        }
    }

    /// Whether the cache held the full record.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// A user resolved from cache, or its bare id when uncached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserRef {
    /// The full cached record.
    Cached(User),
    /// Fallback: the bare id.
    Id(UserId),
}

impl UserRef {
    /// The user id regardless of resolution.
    #[must_use]
    pub fn id(&self) -> UserId {
        match self {
            Self::Cached(user) => user.id,
            Self::Id(id) => *id,
        }
    }

    /// Whether the cache held the full record.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// A guild resolved from cache, or its bare id when uncached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GuildRef {
    /// The full cached record.
    Cached(Guild),
    /// Fallback: the bare id.
    Id(GuildId),
}

impl GuildRef {
    /// The guild id regardless of resolution.
    #[must_use]
    pub fn id(&self) -> GuildId {
        match self {
            Self::Cached(guild) => guild.id,
            Self::Id(id) => *id,
        }
    }

    /// Whether the cache held the full record.
    #[must_use]
    pub const fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// A role resolved from cache, or its id pair when uncached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoleRef {
    /// The full cached record.
    Cached(Role),
    /// Fallback: the role id with its parent guild id.
    Id {
        /// Guild scope.
        guild_id: GuildId,
        /// Role id.
        role_id: RoleId,
    },
}

/// A reaction event with its referenced entities resolved where cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// The reacting user, resolved or bare id.
    pub user: UserRef,
    /// The channel holding the message, resolved or bare id.
    pub channel: ChannelRef,
    /// The message reacted to.
    pub message_id: MessageId,
    /// The emoji used.
    pub emoji: Emoji,
}

/// A normalized gateway event: the processor's output union.
///
/// Update-class variants carry the pre-update value read atomically before
/// the cache write; `old` is `None` when the cache held no prior record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GatewayEvent {
    /// Handshake state for a shard session.
    Ready(Ready),
    /// Session resumption, payload passed through unchanged.
    Resumed(Value),

    /// A channel was created and cached.
    ChannelCreate(Channel),
    /// A channel changed; old side read before the write.
    ChannelUpdate {
        /// Prior cached record, if any.
        old: Option<Channel>,
        /// The record now cached.
        new: Channel,
    },
    /// A channel was removed; resolved from cache when possible.
    ChannelDelete(ChannelRef),
    /// A channel's pinned messages changed.
    ChannelPinsUpdate {
        /// The affected channel.
        channel: ChannelRef,
        /// Timestamp of the most recent pin.
        last_pin_timestamp: Option<String>,
    },

    /// A guild became available or was joined.
    GuildCreate(Guild),
    /// A guild changed.
    GuildUpdate {
        /// Prior cached record, if any.
        old: Option<Guild>,
        /// The record now cached.
        new: Guild,
    },
    /// A guild was removed.
    GuildDelete(GuildRef),
    /// A guild entered an outage window; kept in cache, marked unavailable.
    GuildUnavailable {
        /// Prior cached record, if any.
        old: Option<Guild>,
        /// The unavailable record now cached.
        new: Guild,
    },
    /// A user was banned.
    GuildBanAdd {
        /// The guild, resolved or bare id.
        guild: GuildRef,
        /// The banned user, from the payload.
        user: User,
    },
    /// A ban was lifted.
    GuildBanRemove {
        /// The guild, resolved or bare id.
        guild: GuildRef,
        /// The unbanned user, from the payload.
        user: User,
    },
    /// A guild's emoji set was replaced.
    GuildEmojisUpdate {
        /// Guild scope.
        guild_id: GuildId,
        /// Emoji set before the replacement.
        old: Vec<Emoji>,
        /// Emoji set now cached.
        new: Vec<Emoji>,
    },
    /// A guild's integrations changed.
    GuildIntegrationsUpdate {
        /// The guild, resolved or bare id.
        guild: GuildRef,
    },
    /// A member joined.
    GuildMemberAdd {
        /// Guild scope.
        guild_id: GuildId,
        /// The new member, now cached.
        member: Member,
    },
    /// A member left or was removed.
    GuildMemberRemove {
        /// Guild scope.
        guild_id: GuildId,
        /// The departing user, from the payload.
        user: User,
        /// The evicted cache record, when one existed.
        member: Option<Member>,
    },
    /// A member's guild profile changed.
    GuildMemberUpdate {
        /// Guild scope.
        guild_id: GuildId,
        /// Prior cached record, if any.
        old: Option<Member>,
        /// The record now cached.
        new: Member,
    },
    /// One page of a requested member listing; cache set replaced.
    GuildMembersChunk {
        /// Guild scope.
        guild_id: GuildId,
        /// Members now cached for the guild.
        members: Vec<Member>,
    },
    /// A role was created and cached.
    GuildRoleCreate {
        /// Guild scope.
        guild_id: GuildId,
        /// The new role.
        role: Role,
    },
    /// A role changed.
    GuildRoleUpdate {
        /// Guild scope.
        guild_id: GuildId,
        /// Prior cached record, if any.
        old: Option<Role>,
        /// The record now cached.
        new: Role,
    },
    /// A role was removed; resolved from cache when possible.
    GuildRoleDelete {
        /// Guild scope.
        guild_id: GuildId,
        /// The removed role, resolved or id pair.
        role: RoleRef,
    },

    /// A message was posted and cached.
    MessageCreate(Message),
    /// A message was edited.
    MessageUpdate {
        /// Prior cached record, if any.
        old: Option<Message>,
        /// The record now cached.
        new: Message,
    },
    /// A message was deleted.
    MessageDelete {
        /// The channel it was deleted from, resolved or bare id.
        channel: ChannelRef,
        /// Id of the deleted message.
        message_id: MessageId,
    },
    /// Several messages were deleted at once.
    MessageDeleteBulk {
        /// The channel they were deleted from, resolved or bare id.
        channel: ChannelRef,
        /// Ids of the deleted messages.
        message_ids: Vec<MessageId>,
    },
    /// A reaction was added.
    MessageReactionAdd(Reaction),
    /// A reaction was removed.
    MessageReactionRemove(Reaction),
    /// All reactions were cleared from a message.
    MessageReactionRemoveAll {
        /// The channel holding the message.
        channel: ChannelRef,
        /// The affected message.
        message_id: MessageId,
    },

    /// A user's presence changed.
    PresenceUpdate {
        /// Prior cached record, if any.
        old: Option<Presence>,
        /// The record now cached.
        new: Presence,
    },
    /// A user started typing.
    TypingStart {
        /// The channel being typed in.
        channel: ChannelRef,
        /// The typing user.
        user: UserRef,
        /// Unix timestamp of the typing burst.
        timestamp: u64,
    },
    /// The connected account's user record changed.
    UserUpdate {
        /// Prior cached record, if any.
        old: Option<User>,
        /// The record now cached.
        new: User,
    },
    /// A voice connection state changed.
    VoiceStateUpdate {
        /// Prior cached record, if any.
        old: Option<VoiceState>,
        /// The record now cached.
        new: VoiceState,
    },
    /// Voice server assignment, passed through typed.
    VoiceServerUpdate(VoiceServerUpdate),
    /// A channel's webhooks changed.
    WebhooksUpdate {
        /// The guild, resolved or bare id.
        guild: GuildRef,
        /// The channel, resolved or bare id.
        channel: ChannelRef,
    },

    /// An unrecognized tag; payload passed through unchanged.
    Unknown {
        /// The original wire tag.
        kind: String,
        /// The untouched payload.
        payload: Value,
    },
}

impl GatewayEvent {
    /// The event kind this normalized event corresponds to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::Resumed(_) => EventKind::Resumed,
            Self::ChannelCreate(_) => EventKind::ChannelCreate,
            Self::ChannelUpdate { .. } => EventKind::ChannelUpdate,
            Self::ChannelDelete(_) => EventKind::ChannelDelete,
            Self::ChannelPinsUpdate { .. } => EventKind::ChannelPinsUpdate,
            Self::GuildCreate(_) => EventKind::GuildCreate,
            Self::GuildUpdate { .. } => EventKind::GuildUpdate,
            Self::GuildDelete(_) | Self::GuildUnavailable { .. } => EventKind::GuildDelete,
            Self::GuildBanAdd { .. } => EventKind::GuildBanAdd,
            Self::GuildBanRemove { .. } => EventKind::GuildBanRemove,
            Self::GuildEmojisUpdate { .. } => EventKind::GuildEmojisUpdate,
            Self::GuildIntegrationsUpdate { .. } => EventKind::GuildIntegrationsUpdate,
            Self::GuildMemberAdd { .. } => EventKind::GuildMemberAdd,
            Self::GuildMemberRemove { .. } => EventKind::GuildMemberRemove,
            Self::GuildMemberUpdate { .. } => EventKind::GuildMemberUpdate,
            Self::GuildMembersChunk { .. } => EventKind::GuildMembersChunk,
            Self::GuildRoleCreate { .. } => EventKind::GuildRoleCreate,
            Self::GuildRoleUpdate { .. } => EventKind::GuildRoleUpdate,
            Self::GuildRoleDelete { .. } => EventKind::GuildRoleDelete,
            Self::MessageCreate(_) => EventKind::MessageCreate,
            Self::MessageUpdate { .. } => EventKind::MessageUpdate,
            Self::MessageDelete { .. } => EventKind::MessageDelete,
            Self::MessageDeleteBulk { .. } => EventKind::MessageDeleteBulk,
            Self::MessageReactionAdd(_) => EventKind::MessageReactionAdd,
            Self::MessageReactionRemove(_) => EventKind::MessageReactionRemove,
            Self::MessageReactionRemoveAll { .. } => EventKind::MessageReactionRemoveAll,
            Self::PresenceUpdate { .. } => EventKind::PresenceUpdate,
            Self::TypingStart { .. } => EventKind::TypingStart,
            Self::UserUpdate { .. } => EventKind::UserUpdate,
            Self::VoiceStateUpdate { .. } => EventKind::VoiceStateUpdate,
            Self::VoiceServerUpdate(_) => EventKind::VoiceServerUpdate,
            Self::WebhooksUpdate { .. } => EventKind::WebhooksUpdate,
            Self::Unknown { kind, .. } => EventKind::Unknown(kind.clone()),
        }
    }
}

/// A normalized event tagged with its shard of origin: the currency of the
/// republishing queues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Shard the originating raw event arrived on.
    pub shard_id: ShardId,
    /// The normalized event.
    pub event: GatewayEvent,
}

impl NormalizedEvent {
    /// Wrap a gateway event with its shard of origin.
    #[must_use]
    pub const fn new(shard_id: ShardId, event: GatewayEvent) -> Self {
        Self { shard_id, event }
    }

    /// The event kind.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}
