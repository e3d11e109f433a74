//! User-cluster handlers: session handshake, identity, presence, and voice.

use prism_cache::CacheProvider;
use prism_types::{GatewayEvent, Guild, Presence, Ready, User, VoiceState};

use crate::error::ProcessError;

/// READY: record the connected identity, seed unavailable guild stubs for
/// every announced membership, emit the handshake state. The stubs are
/// filled in by the GUILD_CREATE stream that follows.
pub(super) async fn ready(
    cache: &CacheProvider,
    payload: Ready,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    cache.users.set_current(payload.user.clone()).await?;
    for stub in &payload.guilds {
        let mut guild = Guild::unavailable_stub(stub.id);
        guild.unavailable = stub.unavailable;
        cache.guilds.upsert(guild).await?;
    }
    Ok(vec![GatewayEvent::Ready(payload)])
}

/// USER_UPDATE: the connected account changed. Write through, refresh the
/// current-identity slot, emit the diff.
pub(super) async fn update(
    cache: &CacheProvider,
    user: User,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let old = cache.users.upsert(user.clone()).await?;
    cache.users.set_current(user.clone()).await?;
    Ok(vec![GatewayEvent::UserUpdate { old, new: user }])
}

/// PRESENCE_UPDATE: write through per `(guild, user)`, emit the diff.
pub(super) async fn presence_update(
    cache: &CacheProvider,
    presence: Presence,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild_id = presence.guild_id.ok_or(ProcessError::MissingField {
        kind: "PRESENCE_UPDATE",
        field: "guild_id",
    })?;
    let old = cache.presences.upsert(guild_id, presence.clone()).await?;
    Ok(vec![GatewayEvent::PresenceUpdate { old, new: presence }])
}

/// VOICE_STATE_UPDATE: write through per `(guild, user)`, emit the diff.
/// A state with no channel is a disconnect but is still cached; downstream
/// reads distinguish by the absent channel id.
pub(super) async fn voice_state_update(
    cache: &CacheProvider,
    state: VoiceState,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild_id = state.guild_id.ok_or(ProcessError::MissingField {
        kind: "VOICE_STATE_UPDATE",
        field: "guild_id",
    })?;
    let old = cache.voice_states.upsert(guild_id, state.clone()).await?;
    Ok(vec![GatewayEvent::VoiceStateUpdate { old, new: state }])
}
