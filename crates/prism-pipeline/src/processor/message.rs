//! Message-cluster handlers: message lifecycle and reactions.

use tracing::debug;

use prism_cache::CacheProvider;
use prism_types::{
    GatewayEvent, Message, MessageDeleteBulkPayload, MessageDeletePayload, Reaction,
    ReactionPayload, ReactionRemoveAllPayload,
};

use crate::error::ProcessError;
use crate::processor::{resolve_channel, resolve_user};

/// MESSAGE_CREATE: cache the message, opportunistically cache the author
/// and mentioned users, emit it. User population is best effort; a failing
/// user write never blocks the message.
pub(super) async fn create(
    cache: &CacheProvider,
    message: Message,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    cache.messages.upsert(message.clone()).await?;

    if let Err(error) = cache.users.upsert(message.author.clone()).await {
        debug!(%error, message_id = %message.id, "Author cache population failed");
    }
    for user in &message.mentions {
        if let Err(error) = cache.users.upsert(user.clone()).await {
            debug!(%error, user_id = %user.id, "Mention cache population failed");
        }
    }

    Ok(vec![GatewayEvent::MessageCreate(message)])
}

/// MESSAGE_UPDATE: write through, emit the diff. With message caching
/// disabled the old side is always `None`.
pub(super) async fn update(
    cache: &CacheProvider,
    message: Message,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let old = cache.messages.upsert(message.clone()).await?;
    Ok(vec![GatewayEvent::MessageUpdate { old, new: message }])
}

/// MESSAGE_DELETE: evict the message, resolve the channel it lived in.
pub(super) async fn delete(
    cache: &CacheProvider,
    payload: MessageDeletePayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    cache.messages.delete(payload.id).await?;
    let channel = resolve_channel(cache, payload.channel_id, payload.guild_id).await?;
    Ok(vec![GatewayEvent::MessageDelete {
        channel,
        message_id: payload.id,
    }])
}

/// MESSAGE_DELETE_BULK: evict every listed message, resolve the channel.
pub(super) async fn delete_bulk(
    cache: &CacheProvider,
    payload: MessageDeleteBulkPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    for id in &payload.ids {
        cache.messages.delete(*id).await?;
    }
    let channel = resolve_channel(cache, payload.channel_id, payload.guild_id).await?;
    Ok(vec![GatewayEvent::MessageDeleteBulk {
        channel,
        message_ids: payload.ids,
    }])
}

/// MESSAGE_REACTION_ADD: lookup-augment the user and channel.
pub(super) async fn reaction_add(
    cache: &CacheProvider,
    payload: ReactionPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let reaction = resolve_reaction(cache, payload).await?;
    Ok(vec![GatewayEvent::MessageReactionAdd(reaction)])
}

/// MESSAGE_REACTION_REMOVE: lookup-augment the user and channel.
pub(super) async fn reaction_remove(
    cache: &CacheProvider,
    payload: ReactionPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let reaction = resolve_reaction(cache, payload).await?;
    Ok(vec![GatewayEvent::MessageReactionRemove(reaction)])
}

async fn resolve_reaction(
    cache: &CacheProvider,
    payload: ReactionPayload,
) -> Result<Reaction, ProcessError> {
    let user = resolve_user(cache, payload.user_id).await?;
    let channel = resolve_channel(cache, payload.channel_id, payload.guild_id).await?;
    Ok(Reaction {
        user,
        channel,
        message_id: payload.message_id,
        emoji: payload.emoji,
    })
}

/// MESSAGE_REACTION_REMOVE_ALL: lookup-augment the channel.
pub(super) async fn reaction_remove_all(
    cache: &CacheProvider,
    payload: ReactionRemoveAllPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let channel = resolve_channel(cache, payload.channel_id, payload.guild_id).await?;
    Ok(vec![GatewayEvent::MessageReactionRemoveAll {
        channel,
        message_id: payload.message_id,
    }])
}
