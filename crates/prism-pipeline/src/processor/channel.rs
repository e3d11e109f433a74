//! Channel-cluster handlers: channel lifecycle, pins, webhooks, and typing.

use prism_cache::CacheProvider;
use prism_types::{
    Channel, ChannelRef, GatewayEvent, PinsUpdate, TypingStartPayload, WebhooksUpdatePayload,
};

use crate::error::ProcessError;
use crate::processor::{resolve_channel, resolve_guild, resolve_user};

/// CHANNEL_CREATE: cache the channel, emit it.
pub(super) async fn create(
    cache: &CacheProvider,
    channel: Channel,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    cache.channels.upsert(channel.clone()).await?;
    Ok(vec![GatewayEvent::ChannelCreate(channel)])
}

/// CHANNEL_UPDATE: write through, emit the diff.
pub(super) async fn update(
    cache: &CacheProvider,
    channel: Channel,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let old = cache.channels.upsert(channel.clone()).await?;
    Ok(vec![GatewayEvent::ChannelUpdate { old, new: channel }])
}

/// CHANNEL_DELETE: evict, emit the cached record or the bare id.
pub(super) async fn delete(
    cache: &CacheProvider,
    channel: Channel,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let evicted = cache.channels.delete(channel.id).await?;
    let resolved = match evicted {
        Some(cached) => ChannelRef::Cached(cached),
        None => ChannelRef::Id {
            id: channel.id,
            guild_id: channel.guild_id,
        },
    };
    Ok(vec![GatewayEvent::ChannelDelete(resolved)])
}

/// CHANNEL_PINS_UPDATE: lookup-augment, no cache write.
pub(super) async fn pins_update(
    cache: &CacheProvider,
    payload: PinsUpdate,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let channel = resolve_channel(cache, payload.channel_id, payload.guild_id).await?;
    Ok(vec![GatewayEvent::ChannelPinsUpdate {
        channel,
        last_pin_timestamp: payload.last_pin_timestamp,
    }])
}

/// WEBHOOKS_UPDATE: lookup-augment both the guild and the channel.
pub(super) async fn webhooks_update(
    cache: &CacheProvider,
    payload: WebhooksUpdatePayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild = resolve_guild(cache, payload.guild_id).await?;
    let channel = resolve_channel(cache, payload.channel_id, Some(payload.guild_id)).await?;
    Ok(vec![GatewayEvent::WebhooksUpdate { guild, channel }])
}

/// TYPING_START: lookup-augment the channel and the typing user.
pub(super) async fn typing_start(
    cache: &CacheProvider,
    payload: TypingStartPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let channel = resolve_channel(cache, payload.channel_id, payload.guild_id).await?;
    let user = resolve_user(cache, payload.user_id).await?;
    Ok(vec![GatewayEvent::TypingStart {
        channel,
        user,
        timestamp: payload.timestamp,
    }])
}
