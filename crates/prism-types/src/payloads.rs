//! # Wire Payload Shapes
//!
//! Deserialization targets for raw event payloads that are not themselves
//! cached entities: hydration envelopes, deletion notices, and the
//! lookup-augment payloads that reference entities by id.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::entities::{Channel, Emoji, Guild, Member, Presence, Role, User};
use crate::ids::{ChannelId, GuildId, MessageId, RoleId, UserId};

/// The handshake payload delivered once per shard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ready {
    /// Gateway protocol version.
    #[serde(rename = "v", default)]
    pub version: u8,
    /// The connected account; recorded as the cache's current identity.
    pub user: User,
    /// Session id used for resumption.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Guilds the account belongs to, delivered as unavailable stubs that
    /// are filled in by later GUILD_CREATE events.
    #[serde(default)]
    pub guilds: Vec<UnavailableGuild>,
    /// `[shard_id, shard_count]` pair, when sharding is active.
    #[serde(default)]
    pub shard: Option<(u64, u64)>,
}

/// A guild known only by id and availability, as seen in READY and
/// GUILD_DELETE payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableGuild {
    /// Guild id.
    pub id: GuildId,
    /// True when the guild is in an outage window rather than removed.
    #[serde(default)]
    pub unavailable: bool,
}

/// GUILD_CREATE / GUILD_UPDATE hydration envelope: the guild record plus the
/// nested collections that are fanned out into their own cache regions.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildPayload {
    /// The guild record itself.
    #[serde(flatten)]
    pub guild: Guild,
    /// Channels carried inline; tagged with the guild id during hydration.
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Members carried inline; tagged with the guild id during hydration.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Presences carried inline.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub presences: Vec<Presence>,
    /// The guild's emoji set.
    #[serde(default)]
    pub emojis: Vec<Emoji>,
    /// The guild's role set.
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// GUILD_MEMBER_UPDATE patch: a partial member carrying the fields the
/// gateway re-sends on change.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberUpdate {
    /// Guild scope.
    pub guild_id: GuildId,
    /// The member's user record.
    pub user: User,
    /// New nickname, if any.
    #[serde(default)]
    pub nick: Option<String>,
    /// Current role set.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub roles: Vec<RoleId>,
    /// Join timestamp, when re-sent.
    #[serde(default)]
    pub joined_at: Option<String>,
}

/// GUILD_MEMBER_REMOVE notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRemove {
    /// Guild scope.
    pub guild_id: GuildId,
    /// The departing user.
    pub user: User,
}

/// GUILD_MEMBERS_CHUNK: one page of a requested member listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembersChunk {
    /// Guild scope.
    pub guild_id: GuildId,
    /// Members in this chunk.
    #[serde(default)]
    pub members: Vec<Member>,
    /// Zero-based chunk index.
    #[serde(default)]
    pub chunk_index: u32,
    /// Total chunk count for the request.
    #[serde(default)]
    pub chunk_count: u32,
}

/// GUILD_ROLE_CREATE / GUILD_ROLE_UPDATE envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePayload {
    /// Guild scope.
    pub guild_id: GuildId,
    /// The role record.
    pub role: Role,
}

/// GUILD_ROLE_DELETE notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDelete {
    /// Guild scope.
    pub guild_id: GuildId,
    /// Id of the removed role.
    pub role_id: RoleId,
}

/// GUILD_EMOJIS_UPDATE: full replacement of a guild's emoji set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojisUpdate {
    /// Guild scope.
    pub guild_id: GuildId,
    /// The new emoji set.
    #[serde(default)]
    pub emojis: Vec<Emoji>,
}

/// GUILD_BAN_ADD / GUILD_BAN_REMOVE payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BanPayload {
    /// Guild scope.
    pub guild_id: GuildId,
    /// The banned or unbanned user.
    pub user: User,
}

/// GUILD_INTEGRATIONS_UPDATE notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationsUpdate {
    /// Guild scope.
    pub guild_id: GuildId,
}

/// CHANNEL_PINS_UPDATE notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinsUpdate {
    /// The channel whose pins changed.
    pub channel_id: ChannelId,
    /// Guild scope, if any.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// ISO 8601 timestamp of the most recent pin.
    #[serde(default)]
    pub last_pin_timestamp: Option<String>,
}

/// WEBHOOKS_UPDATE notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhooksUpdatePayload {
    /// Guild scope.
    pub guild_id: GuildId,
    /// The channel whose webhooks changed.
    pub channel_id: ChannelId,
}

/// TYPING_START notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingStartPayload {
    /// The channel being typed in.
    pub channel_id: ChannelId,
    /// Guild scope, if any.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// The typing user.
    pub user_id: UserId,
    /// Unix timestamp of the typing burst.
    #[serde(default)]
    pub timestamp: u64,
}

/// MESSAGE_DELETE notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeletePayload {
    /// Id of the deleted message.
    pub id: MessageId,
    /// The channel it was deleted from.
    pub channel_id: ChannelId,
    /// Guild scope, if any.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
}

/// MESSAGE_DELETE_BULK notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeleteBulkPayload {
    /// Ids of the deleted messages.
    #[serde(default)]
    pub ids: Vec<MessageId>,
    /// The channel they were deleted from.
    pub channel_id: ChannelId,
    /// Guild scope, if any.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
}

/// MESSAGE_REACTION_ADD / MESSAGE_REACTION_REMOVE payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionPayload {
    /// The reacting user.
    pub user_id: UserId,
    /// The channel holding the message.
    pub channel_id: ChannelId,
    /// The message reacted to.
    pub message_id: MessageId,
    /// Guild scope, if any.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// The emoji used.
    pub emoji: Emoji,
}

/// MESSAGE_REACTION_REMOVE_ALL notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRemoveAllPayload {
    /// The channel holding the message.
    pub channel_id: ChannelId,
    /// The message whose reactions were cleared.
    pub message_id: MessageId,
    /// Guild scope, if any.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
}

/// VOICE_SERVER_UPDATE payload, passed through typed but uncached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceServerUpdate {
    /// Voice connection token.
    #[serde(default)]
    pub token: String,
    /// Guild scope.
    pub guild_id: GuildId,
    /// Voice server host, when assigned.
    #[serde(default)]
    pub endpoint: Option<String>,
}
