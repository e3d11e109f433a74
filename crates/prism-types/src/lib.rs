//! # Prism Types
//!
//! Shared domain types for the Prism gateway pipeline: entity ids, cached
//! entity records, wire payload shapes, event kinds, and the raw/normalized
//! event types that flow between pipeline stages.
//!
//! ## Type Flow
//!
//! ```text
//! RawEvent { kind, payload, shard_id }
//!     │  decode payload per kind
//!     ▼
//! entities / payloads  ──cache reads & writes──▶  GatewayEvent
//!     │
//!     ▼
//! NormalizedEvent { shard_id, event }   (republished downstream)
//! ```

pub mod entities;
pub mod event;
pub mod ids;
pub mod kind;
pub mod payloads;

// Re-export the working set
pub use entities::{
    Activity, Channel, Emoji, Guild, Member, Message, PartialUser, Presence, Role, User,
    VoiceState,
};
pub use event::{
    ChannelRef, GatewayEvent, GuildRef, NormalizedEvent, RawEvent, Reaction, RoleRef, UserRef,
};
pub use ids::{
    ChannelId, EmojiId, GuildId, IdParseError, MessageId, RoleId, ShardId, UserId,
};
pub use kind::EventKind;
pub use payloads::{
    BanPayload, EmojisUpdate, GuildPayload, IntegrationsUpdate, MemberRemove, MemberUpdate,
    MembersChunk, MessageDeleteBulkPayload, MessageDeletePayload, PinsUpdate, ReactionPayload,
    ReactionRemoveAllPayload, Ready, RoleDelete, RolePayload, TypingStartPayload,
    UnavailableGuild, VoiceServerUpdate, WebhooksUpdatePayload,
};
