//! Cache port adapters.

pub mod memory;

pub use memory::{
    InMemoryChannelCache, InMemoryEmojiCache, InMemoryGuildCache, InMemoryMemberCache,
    InMemoryMessageCache, InMemoryPresenceCache, InMemoryRoleCache, InMemoryUserCache,
    InMemoryVoiceStateCache, NoopMessageCache,
};
