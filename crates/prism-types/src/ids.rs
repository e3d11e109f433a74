//! # Entity Identifiers
//!
//! Snowflake id newtypes for every cached entity kind, plus the shard
//! identifier type.
//!
//! The upstream gateway serializes snowflakes as decimal strings, but some
//! sources emit plain integers; deserialization accepts both forms.
//! Serialization always emits the string form.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Shard identifier: one partition of the upstream event stream.
///
/// Events within a shard are ordered; across shards they are not.
pub type ShardId = u64;

/// Error parsing a snowflake id from its string form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid snowflake id: {0:?}")]
pub struct IdParseError(pub String);

struct SnowflakeVisitor;

impl Visitor<'_> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake id as a string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::custom("negative snowflake id"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.parse::<u64>()
            .map_err(|_| E::custom(format!("invalid snowflake id {v:?}")))
    }
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value of the id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                Self(v)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>()
                    .map(Self)
                    .map_err(|_| IdParseError(s.to_string()))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(SnowflakeVisitor).map(Self)
            }
        }
    };
}

snowflake_id! {
    /// Identifier of a guild (top-level community entity).
    GuildId
}

snowflake_id! {
    /// Identifier of a channel within a guild or a direct-message channel.
    ChannelId
}

snowflake_id! {
    /// Identifier of a user account.
    UserId
}

snowflake_id! {
    /// Identifier of a role within a guild.
    RoleId
}

snowflake_id! {
    /// Identifier of a custom emoji. Unicode emoji carry no id.
    EmojiId
}

snowflake_id! {
    /// Identifier of a message within a channel.
    MessageId
}
