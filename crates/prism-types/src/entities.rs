//! # Cached Domain Entities
//!
//! The structured records materialized by the entity cache and carried inside
//! normalized events.
//!
//! ## Clusters
//!
//! - **Guild**: `Guild`, `Role`, `Emoji`, `Member`
//! - **Channel**: `Channel`
//! - **User & Presence**: `User`, `Presence`, `Activity`, `VoiceState`
//! - **Message**: `Message`
//!
//! All records deserialize leniently: unknown wire fields are ignored and
//! nullable arrays default to empty, so schema additions upstream never
//! break the pipeline.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::ids::{ChannelId, EmojiId, GuildId, MessageId, RoleId, UserId};

// =============================================================================
// CLUSTER A: GUILD
// =============================================================================

/// A guild: the top-level community entity that channels, members, roles,
/// emojis, and presences hang off.
///
/// Nested collections delivered on GUILD_CREATE live in their own cache
/// regions, not on this record; see `GuildPayload` for the hydration shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Guild {
    /// Unique guild id.
    pub id: GuildId,
    /// Guild name. Absent on unavailable stubs.
    #[serde(default)]
    pub name: Option<String>,
    /// Icon hash, if set.
    #[serde(default)]
    pub icon: Option<String>,
    /// Id of the owning user.
    #[serde(default)]
    pub owner_id: Option<UserId>,
    /// Total member count as reported by the gateway.
    #[serde(default)]
    pub member_count: Option<u64>,
    /// True while the guild is in an outage window.
    #[serde(default)]
    pub unavailable: bool,
}

impl Guild {
    /// Build an unavailable stub for a guild known only by id.
    #[must_use]
    pub fn unavailable_stub(id: GuildId) -> Self {
        Self {
            id,
            unavailable: true,
            ..Self::default()
        }
    }
}

/// A role within a guild. Cached per `(guild_id, role_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Role {
    /// Unique role id.
    pub id: RoleId,
    /// Role name.
    #[serde(default)]
    pub name: String,
    /// RGB color value.
    #[serde(default)]
    pub color: u32,
    /// Sort position within the guild's role list.
    #[serde(default)]
    pub position: i64,
    /// Whether the role is pinned in the member list.
    #[serde(default)]
    pub hoist: bool,
    /// Whether an integration manages this role.
    #[serde(default)]
    pub managed: bool,
    /// Whether the role is mentionable.
    #[serde(default)]
    pub mentionable: bool,
}

/// A custom emoji, or a unicode emoji when `id` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Emoji {
    /// Emoji id; `None` for unicode emoji.
    #[serde(default)]
    pub id: Option<EmojiId>,
    /// Emoji name, or the unicode character itself.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the emoji is animated.
    #[serde(default)]
    pub animated: bool,
    /// Roles allowed to use this emoji.
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

/// A guild member. Cached per `(guild_id, user_id)`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Member {
    /// The underlying user account.
    pub user: User,
    /// Guild this membership belongs to. Tagged during hydration when the
    /// wire payload omits it.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Per-guild nickname.
    #[serde(default)]
    pub nick: Option<String>,
    /// Roles assigned to the member.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub roles: Vec<RoleId>,
    /// ISO 8601 join timestamp.
    #[serde(default)]
    pub joined_at: Option<String>,
    /// Server-deafened flag.
    #[serde(default)]
    pub deaf: bool,
    /// Server-muted flag.
    #[serde(default)]
    pub mute: bool,
}

// =============================================================================
// CLUSTER B: CHANNEL
// =============================================================================

/// A channel. Guild channels carry a `guild_id`; direct-message channels
/// do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Channel {
    /// Unique channel id.
    pub id: ChannelId,
    /// Numeric channel type tag as delivered on the wire.
    #[serde(rename = "type", default)]
    pub kind: u8,
    /// Owning guild, if any. Tagged during guild hydration when omitted.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Channel name.
    #[serde(default)]
    pub name: Option<String>,
    /// Channel topic.
    #[serde(default)]
    pub topic: Option<String>,
    /// Sort position.
    #[serde(default)]
    pub position: Option<i64>,
    /// Parent category channel.
    #[serde(default)]
    pub parent_id: Option<ChannelId>,
    /// Id of the most recent message, if known.
    #[serde(default)]
    pub last_message_id: Option<MessageId>,
}

// =============================================================================
// CLUSTER C: USER & PRESENCE
// =============================================================================

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct User {
    /// Unique user id.
    pub id: UserId,
    /// Account name. Absent on partial user objects.
    #[serde(default)]
    pub username: Option<String>,
    /// Legacy discriminator, if the gateway still sends one.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Avatar hash, if set.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

/// The user slice of a presence payload; only the id is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartialUser {
    /// Unique user id.
    pub id: UserId,
}

/// An activity entry inside a presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Activity {
    /// Activity name.
    #[serde(default)]
    pub name: String,
    /// Numeric activity type tag.
    #[serde(rename = "type", default)]
    pub kind: u8,
}

/// A user's presence within a guild. Cached per `(guild_id, user_id)`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Presence {
    /// The user this presence belongs to.
    pub user: PartialUser,
    /// Guild scope; presence updates are per guild.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Status string: `online`, `idle`, `dnd`, `offline`.
    #[serde(default)]
    pub status: String,
    /// Current activities.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Presence {
    /// Id of the user this presence belongs to.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user.id
    }
}

/// A user's voice connection state. Cached per `(guild_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VoiceState {
    /// Guild scope, if the state is within a guild.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Connected voice channel; `None` means disconnected.
    #[serde(default)]
    pub channel_id: Option<ChannelId>,
    /// The user this state belongs to.
    pub user_id: UserId,
    /// Voice session id.
    #[serde(default)]
    pub session_id: String,
    /// Server-deafened flag.
    #[serde(default)]
    pub deaf: bool,
    /// Server-muted flag.
    #[serde(default)]
    pub mute: bool,
    /// Self-deafened flag.
    #[serde(default)]
    pub self_deaf: bool,
    /// Self-muted flag.
    #[serde(default)]
    pub self_mute: bool,
}

// =============================================================================
// CLUSTER D: MESSAGE
// =============================================================================

/// A message posted to a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Message {
    /// Unique message id.
    pub id: MessageId,
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Owning guild, when posted in a guild channel.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Message author.
    #[serde(default)]
    pub author: User,
    /// Message text content.
    #[serde(default)]
    pub content: String,
    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// ISO 8601 last-edit timestamp.
    #[serde(default)]
    pub edited_timestamp: Option<String>,
    /// Users mentioned in the message.
    #[serde(default)]
    pub mentions: Vec<User>,
    /// Whether the message is pinned.
    #[serde(default)]
    pub pinned: bool,
}
