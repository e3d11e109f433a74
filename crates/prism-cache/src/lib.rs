//! # Prism Cache
//!
//! The entity cache abstraction for the Prism pipeline: per-entity-kind
//! capability traits, an aggregating [`CacheProvider`] handle, and
//! in-memory adapters.
//!
//! The pipeline's event processor is the only writer; it reads and mutates
//! entities exclusively through these ports. Physical storage, indexing,
//! and eviction are backend concerns.

pub mod adapters;
pub mod error;
pub mod ports;
pub mod provider;

pub use error::CacheError;
pub use ports::{
    ChannelCache, EmojiCache, GuildCache, MemberCache, MessageCache, PresenceCache, RoleCache,
    UserCache, VoiceStateCache,
};
pub use provider::CacheProvider;
