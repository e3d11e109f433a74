//! Guild-cluster handlers: guild lifecycle, bans, emojis, integrations,
//! members, and roles.

use tracing::debug;

use prism_cache::CacheProvider;
use prism_types::{
    BanPayload, EmojisUpdate, GatewayEvent, Guild, GuildPayload, GuildRef, IntegrationsUpdate,
    Member, MemberRemove, MemberUpdate, MembersChunk, RoleDelete, RolePayload, RoleRef,
    UnavailableGuild,
};

use crate::error::ProcessError;
use crate::processor::resolve_guild;

/// GUILD_CREATE: hydrate nested collections, cache the guild, emit it.
/// A guild already cached is a refresh (READY pre-announces memberships),
/// so the notification is suppressed.
pub(super) async fn create(
    cache: &CacheProvider,
    payload: GuildPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild = hydrate(cache, payload).await?;
    let guild_id = guild.id;
    let old = cache.guilds.upsert(guild.clone()).await?;
    if old.is_some() {
        debug!(%guild_id, "Guild already cached, refreshed silently");
        return Ok(Vec::new());
    }
    Ok(vec![GatewayEvent::GuildCreate(guild)])
}

/// GUILD_UPDATE: hydrate carried collections, write through, emit the diff.
pub(super) async fn update(
    cache: &CacheProvider,
    payload: GuildPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild = hydrate(cache, payload).await?;
    let old = cache.guilds.upsert(guild.clone()).await?;
    Ok(vec![GatewayEvent::GuildUpdate { old, new: guild }])
}

/// Fan a guild payload's nested collections out into their cache regions,
/// tagging each record with the guild id the wire shape omits.
async fn hydrate(cache: &CacheProvider, payload: GuildPayload) -> Result<Guild, ProcessError> {
    let guild_id = payload.guild.id;

    for mut channel in payload.channels {
        channel.guild_id.get_or_insert(guild_id);
        cache.channels.upsert(channel).await?;
    }
    for mut member in payload.members {
        member.guild_id.get_or_insert(guild_id);
        cache.members.upsert(guild_id, member).await?;
    }
    for presence in payload.presences {
        cache.presences.upsert(guild_id, presence).await?;
    }
    // Absent collections deserialize empty; leave the cached sets alone
    // rather than wiping them.
    if !payload.roles.is_empty() {
        cache.roles.replace_all(guild_id, payload.roles).await?;
    }
    if !payload.emojis.is_empty() {
        cache.emojis.replace_all(guild_id, payload.emojis).await?;
    }

    Ok(payload.guild)
}

/// GUILD_DELETE: an outage marks the cached record unavailable and keeps
/// it; a real removal evicts it.
pub(super) async fn delete(
    cache: &CacheProvider,
    payload: UnavailableGuild,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    if payload.unavailable {
        let prior = cache.guilds.get(payload.id).await?;
        let mut marked = prior.unwrap_or_else(|| Guild::unavailable_stub(payload.id));
        marked.unavailable = true;
        let old = cache.guilds.upsert(marked.clone()).await?;
        return Ok(vec![GatewayEvent::GuildUnavailable { old, new: marked }]);
    }

    let evicted = cache.guilds.delete(payload.id).await?;
    let guild = match evicted {
        Some(guild) => GuildRef::Cached(guild),
        None => GuildRef::Id(payload.id),
    };
    Ok(vec![GatewayEvent::GuildDelete(guild)])
}

/// GUILD_BAN_ADD: lookup-augment, no cache write.
pub(super) async fn ban_add(
    cache: &CacheProvider,
    payload: BanPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild = resolve_guild(cache, payload.guild_id).await?;
    Ok(vec![GatewayEvent::GuildBanAdd {
        guild,
        user: payload.user,
    }])
}

/// GUILD_BAN_REMOVE: lookup-augment, no cache write.
pub(super) async fn ban_remove(
    cache: &CacheProvider,
    payload: BanPayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild = resolve_guild(cache, payload.guild_id).await?;
    Ok(vec![GatewayEvent::GuildBanRemove {
        guild,
        user: payload.user,
    }])
}

/// GUILD_EMOJIS_UPDATE: replace the set, emit old and new sides.
pub(super) async fn emojis_update(
    cache: &CacheProvider,
    payload: EmojisUpdate,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let old = cache
        .emojis
        .replace_all(payload.guild_id, payload.emojis.clone())
        .await?;
    Ok(vec![GatewayEvent::GuildEmojisUpdate {
        guild_id: payload.guild_id,
        old,
        new: payload.emojis,
    }])
}

/// GUILD_INTEGRATIONS_UPDATE: lookup-augment, no cache write.
pub(super) async fn integrations_update(
    cache: &CacheProvider,
    payload: IntegrationsUpdate,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild = resolve_guild(cache, payload.guild_id).await?;
    Ok(vec![GatewayEvent::GuildIntegrationsUpdate { guild }])
}

/// GUILD_MEMBER_ADD: cache the member under its guild, emit it.
pub(super) async fn member_add(
    cache: &CacheProvider,
    member: Member,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild_id = member.guild_id.ok_or(ProcessError::MissingField {
        kind: "GUILD_MEMBER_ADD",
        field: "guild_id",
    })?;
    cache.members.upsert(guild_id, member.clone()).await?;
    Ok(vec![GatewayEvent::GuildMemberAdd { guild_id, member }])
}

/// GUILD_MEMBER_REMOVE: evict and carry the cached record alongside the
/// payload's user, which is always present.
pub(super) async fn member_remove(
    cache: &CacheProvider,
    payload: MemberRemove,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let member = cache
        .members
        .delete(payload.guild_id, payload.user.id)
        .await?;
    Ok(vec![GatewayEvent::GuildMemberRemove {
        guild_id: payload.guild_id,
        user: payload.user,
        member,
    }])
}

/// GUILD_MEMBER_UPDATE: merge the patch over the cached record and emit
/// the diff. Flags the patch omits keep their cached values.
pub(super) async fn member_update(
    cache: &CacheProvider,
    payload: MemberUpdate,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild_id = payload.guild_id;
    let cached = cache.members.get(guild_id, payload.user.id).await?;

    let mut merged = cached.unwrap_or_default();
    merged.guild_id = Some(guild_id);
    merged.user = payload.user;
    merged.nick = payload.nick;
    merged.roles = payload.roles;
    if payload.joined_at.is_some() {
        merged.joined_at = payload.joined_at;
    }

    let old = cache.members.upsert(guild_id, merged.clone()).await?;
    Ok(vec![GatewayEvent::GuildMemberUpdate {
        guild_id,
        old,
        new: merged,
    }])
}

/// GUILD_MEMBERS_CHUNK: replace the guild's member set with the chunk.
pub(super) async fn members_chunk(
    cache: &CacheProvider,
    payload: MembersChunk,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let guild_id = payload.guild_id;
    let members: Vec<Member> = payload
        .members
        .into_iter()
        .map(|mut member| {
            member.guild_id.get_or_insert(guild_id);
            member
        })
        .collect();
    cache.members.replace_all(guild_id, members.clone()).await?;
    Ok(vec![GatewayEvent::GuildMembersChunk { guild_id, members }])
}

/// GUILD_ROLE_CREATE: cache the role under its guild, emit it.
pub(super) async fn role_create(
    cache: &CacheProvider,
    payload: RolePayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    cache
        .roles
        .upsert(payload.guild_id, payload.role.clone())
        .await?;
    Ok(vec![GatewayEvent::GuildRoleCreate {
        guild_id: payload.guild_id,
        role: payload.role,
    }])
}

/// GUILD_ROLE_UPDATE: write through, emit the diff.
pub(super) async fn role_update(
    cache: &CacheProvider,
    payload: RolePayload,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let old = cache
        .roles
        .upsert(payload.guild_id, payload.role.clone())
        .await?;
    Ok(vec![GatewayEvent::GuildRoleUpdate {
        guild_id: payload.guild_id,
        old,
        new: payload.role,
    }])
}

/// GUILD_ROLE_DELETE: evict, emit the cached record or the id pair.
pub(super) async fn role_delete(
    cache: &CacheProvider,
    payload: RoleDelete,
) -> Result<Vec<GatewayEvent>, ProcessError> {
    let evicted = cache
        .roles
        .delete(payload.guild_id, payload.role_id)
        .await?;
    let role = match evicted {
        Some(role) => RoleRef::Cached(role),
        None => RoleRef::Id {
            guild_id: payload.guild_id,
            role_id: payload.role_id,
        },
    };
    Ok(vec![GatewayEvent::GuildRoleDelete {
        guild_id: payload.guild_id,
        role,
    }])
}
