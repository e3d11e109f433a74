//! # Event Kinds
//!
//! The closed enumeration of raw event tags the pipeline understands, plus
//! an `Unknown` catch-all so new upstream tags degrade to passthrough
//! instead of crashing the pipeline.

use std::fmt;

/// The tag of a raw gateway event.
///
/// Wire tags are SCREAMING_SNAKE_CASE strings; `from_tag` never fails, it
/// folds unrecognized tags into [`EventKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Handshake completed; carries session state and the guild list.
    Ready,
    /// Session resumed after reconnect.
    Resumed,
    /// A channel was created.
    ChannelCreate,
    /// A channel was updated.
    ChannelUpdate,
    /// A channel was deleted.
    ChannelDelete,
    /// A channel's pinned messages changed.
    ChannelPinsUpdate,
    /// A guild became available or was joined.
    GuildCreate,
    /// A guild was updated.
    GuildUpdate,
    /// A guild was removed or became unavailable.
    GuildDelete,
    /// A user was banned from a guild.
    GuildBanAdd,
    /// A user's ban was lifted.
    GuildBanRemove,
    /// A guild's emoji set was replaced.
    GuildEmojisUpdate,
    /// A guild's integrations changed.
    GuildIntegrationsUpdate,
    /// A member joined a guild.
    GuildMemberAdd,
    /// A member left or was removed from a guild.
    GuildMemberRemove,
    /// A member's guild profile changed.
    GuildMemberUpdate,
    /// One page of a requested member listing.
    GuildMembersChunk,
    /// A role was created.
    GuildRoleCreate,
    /// A role was updated.
    GuildRoleUpdate,
    /// A role was deleted.
    GuildRoleDelete,
    /// A message was posted.
    MessageCreate,
    /// A message was edited.
    MessageUpdate,
    /// A message was deleted.
    MessageDelete,
    /// Several messages were deleted at once.
    MessageDeleteBulk,
    /// A reaction was added to a message.
    MessageReactionAdd,
    /// A reaction was removed from a message.
    MessageReactionRemove,
    /// All reactions were cleared from a message.
    MessageReactionRemoveAll,
    /// A user's presence changed.
    PresenceUpdate,
    /// Full presence list replacement; suppressed by the processor.
    PresencesReplace,
    /// A user started typing.
    TypingStart,
    /// The connected account's user record changed.
    UserUpdate,
    /// A user's voice connection state changed.
    VoiceStateUpdate,
    /// Voice server assignment for a guild.
    VoiceServerUpdate,
    /// A channel's webhooks changed.
    WebhooksUpdate,
    /// A tag this pipeline does not recognize; payload passes through.
    Unknown(String),
}

impl EventKind {
    /// Parse a wire tag. Unrecognized tags fold into `Unknown`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "READY" => Self::Ready,
            "RESUMED" => Self::Resumed,
            "CHANNEL_CREATE" => Self::ChannelCreate,
            "CHANNEL_UPDATE" => Self::ChannelUpdate,
            "CHANNEL_DELETE" => Self::ChannelDelete,
            "CHANNEL_PINS_UPDATE" => Self::ChannelPinsUpdate,
            "GUILD_CREATE" => Self::GuildCreate,
            "GUILD_UPDATE" => Self::GuildUpdate,
            "GUILD_DELETE" => Self::GuildDelete,
            "GUILD_BAN_ADD" => Self::GuildBanAdd,
            "GUILD_BAN_REMOVE" => Self::GuildBanRemove,
            "GUILD_EMOJIS_UPDATE" => Self::GuildEmojisUpdate,
            "GUILD_INTEGRATIONS_UPDATE" => Self::GuildIntegrationsUpdate,
            "GUILD_MEMBER_ADD" => Self::GuildMemberAdd,
            "GUILD_MEMBER_REMOVE" => Self::GuildMemberRemove,
            "GUILD_MEMBER_UPDATE" => Self::GuildMemberUpdate,
            "GUILD_MEMBERS_CHUNK" => Self::GuildMembersChunk,
            "GUILD_ROLE_CREATE" => Self::GuildRoleCreate,
            "GUILD_ROLE_UPDATE" => Self::GuildRoleUpdate,
            "GUILD_ROLE_DELETE" => Self::GuildRoleDelete,
            "MESSAGE_CREATE" => Self::MessageCreate,
            "MESSAGE_UPDATE" => Self::MessageUpdate,
            "MESSAGE_DELETE" => Self::MessageDelete,
            "MESSAGE_DELETE_BULK" => Self::MessageDeleteBulk,
            "MESSAGE_REACTION_ADD" => Self::MessageReactionAdd,
            "MESSAGE_REACTION_REMOVE" => Self::MessageReactionRemove,
            "MESSAGE_REACTION_REMOVE_ALL" => Self::MessageReactionRemoveAll,
            "PRESENCE_UPDATE" => Self::PresenceUpdate,
            "PRESENCES_REPLACE" => Self::PresencesReplace,
            "TYPING_START" => Self::TypingStart,
            "USER_UPDATE" => Self::UserUpdate,
            "VOICE_STATE_UPDATE" => Self::VoiceStateUpdate,
            "VOICE_SERVER_UPDATE" => Self::VoiceServerUpdate,
            "WEBHOOKS_UPDATE" => Self::WebhooksUpdate,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire tag for this kind.
    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            Self::Ready => "READY",
            Self::Resumed => "RESUMED",
            Self::ChannelCreate => "CHANNEL_CREATE",
            Self::ChannelUpdate => "CHANNEL_UPDATE",
            Self::ChannelDelete => "CHANNEL_DELETE",
            Self::ChannelPinsUpdate => "CHANNEL_PINS_UPDATE",
            Self::GuildCreate => "GUILD_CREATE",
            Self::GuildUpdate => "GUILD_UPDATE",
            Self::GuildDelete => "GUILD_DELETE",
            Self::GuildBanAdd => "GUILD_BAN_ADD",
            Self::GuildBanRemove => "GUILD_BAN_REMOVE",
            Self::GuildEmojisUpdate => "GUILD_EMOJIS_UPDATE",
            Self::GuildIntegrationsUpdate => "GUILD_INTEGRATIONS_UPDATE",
            Self::GuildMemberAdd => "GUILD_MEMBER_ADD",
            Self::GuildMemberRemove => "GUILD_MEMBER_REMOVE",
            Self::GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
            Self::GuildMembersChunk => "GUILD_MEMBERS_CHUNK",
            Self::GuildRoleCreate => "GUILD_ROLE_CREATE",
            Self::GuildRoleUpdate => "GUILD_ROLE_UPDATE",
            Self::GuildRoleDelete => "GUILD_ROLE_DELETE",
            Self::MessageCreate => "MESSAGE_CREATE",
            Self::MessageUpdate => "MESSAGE_UPDATE",
            Self::MessageDelete => "MESSAGE_DELETE",
            Self::MessageDeleteBulk => "MESSAGE_DELETE_BULK",
            Self::MessageReactionAdd => "MESSAGE_REACTION_ADD",
            Self::MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
            Self::MessageReactionRemoveAll => "MESSAGE_REACTION_REMOVE_ALL",
            Self::PresenceUpdate => "PRESENCE_UPDATE",
            Self::PresencesReplace => "PRESENCES_REPLACE",
            Self::TypingStart => "TYPING_START",
            Self::UserUpdate => "USER_UPDATE",
            Self::VoiceStateUpdate => "VOICE_STATE_UPDATE",
            Self::VoiceServerUpdate => "VOICE_SERVER_UPDATE",
            Self::WebhooksUpdate => "WEBHOOKS_UPDATE",
            Self::Unknown(tag) => tag,
        }
    }

    /// Whether this kind is in the recognized set.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

// On the wire a kind is just its tag string.
impl serde::Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_tag())
    }
}

impl<'de> serde::Deserialize<'de> for EventKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = <String as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}
