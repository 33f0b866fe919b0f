//! Member CRUD actions. Organisers manage every basher; a basher may only
//! edit their own profile.

use anyhow::{Context, Result};
use tracing::info;

use crate::common::{
    optional_text, require_text, Actor, Capability, ClanId, MemberId, ValidationError,
};
use crate::domains::clans::models::Clan;
use crate::domains::members::data::{CreateMemberInput, UpdateMemberInput, UpdateProfileInput};
use crate::domains::members::models::{CreateMember, Member, MemberRole, ProfileUpdate};
use crate::kernel::ServerDeps;

pub async fn create_member(
    actor: Actor,
    input: CreateMemberInput,
    deps: &ServerDeps,
) -> Result<Member> {
    actor.can(Capability::ManageMembers).check()?;

    let github_username = require_text("githubUsername", &input.github_username)?;
    let name = require_text("name", &input.name)?;
    ensure_username_free(&github_username, None, deps).await?;

    let clan_id = match input.clan_id.as_deref() {
        Some(raw) => Some(existing_clan(raw, deps).await?),
        None => None,
    };

    let member = Member::create(
        CreateMember::builder()
            .github_username(github_username)
            .name(name)
            .avatar_url(optional_text(input.avatar_url))
            .bio(optional_text(input.bio))
            .title(optional_text(input.title))
            .role(input.role.unwrap_or(MemberRole::Basher))
            .clan_id(clan_id)
            .leetcode_username(optional_text(input.leetcode_username))
            .duolingo_username(optional_text(input.duolingo_username))
            .discord_username(optional_text(input.discord_username))
            .build(),
        &deps.db_pool,
    )
    .await?;

    info!(member_id = %member.id, github = %member.github_username, "Member created");
    Ok(member)
}

/// Edits the caller's own profile unless `member_id` names someone else,
/// which only organisers may do.
pub async fn update_profile(
    actor: Actor,
    member_id: Option<&str>,
    input: UpdateProfileInput,
    deps: &ServerDeps,
) -> Result<Member> {
    let member_id = match member_id {
        Some(raw) => MemberId::parse(raw).context("Invalid member id")?,
        None => actor.id(),
    };
    actor.owns(member_id)?;

    let current = Member::find_by_id_optional(member_id, &deps.db_pool)
        .await?
        .context("Member not found")?;

    let update = ProfileUpdate {
        name: match input.name {
            Some(name) => require_text("name", &name)?,
            None => current.name,
        },
        avatar_url: merge(input.avatar_url, current.avatar_url),
        bio: merge(input.bio, current.bio),
        title: merge(input.title, current.title),
        leetcode_username: merge(input.leetcode_username, current.leetcode_username),
        duolingo_username: merge(input.duolingo_username, current.duolingo_username),
        discord_username: merge(input.discord_username, current.discord_username),
    };

    let member = Member::update_profile(member_id, update, &deps.db_pool).await?;
    info!(member_id = %member_id, "Profile updated");
    Ok(member)
}

pub async fn update_member(
    actor: Actor,
    member_id: &str,
    input: UpdateMemberInput,
    deps: &ServerDeps,
) -> Result<Member> {
    actor.can(Capability::ManageMembers).check()?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;

    let mut member = Member::find_by_id_optional(member_id, &deps.db_pool)
        .await?
        .context("Member not found")?;

    if let Some(username) = input.github_username {
        let username = require_text("githubUsername", &username)?;
        ensure_username_free(&username, Some(member_id), deps).await?;
        member = Member::update_github_username(member_id, &username, &deps.db_pool).await?;
    }

    if let Some(role) = input.role {
        member = Member::update_role(member_id, role, &deps.db_pool).await?;
    }

    info!(member_id = %member_id, role = ?member.role, "Member updated");
    Ok(member)
}

pub async fn delete_member(actor: Actor, member_id: &str, deps: &ServerDeps) -> Result<bool> {
    actor.can(Capability::ManageMembers).check()?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;

    let deleted = Member::delete(member_id, &deps.db_pool).await?;
    info!(member_id = %member_id, deleted, "Member deleted");
    Ok(deleted)
}

async fn ensure_username_free(
    username: &str,
    except: Option<MemberId>,
    deps: &ServerDeps,
) -> Result<()> {
    match Member::find_by_github_username(username, &deps.db_pool).await? {
        Some(existing) if Some(existing.id) != except => {
            Err(ValidationError::Duplicate(format!("GitHub username {}", username)).into())
        }
        _ => Ok(()),
    }
}

pub(crate) async fn existing_clan(raw: &str, deps: &ServerDeps) -> Result<ClanId> {
    let clan_id = ClanId::parse(raw).context("Invalid clan id")?;
    Clan::find_by_id_optional(clan_id, &deps.db_pool)
        .await?
        .context("Clan not found")?;
    Ok(clan_id)
}

/// `None` keeps the current value, a blank string clears it.
fn merge(input: Option<String>, current: Option<String>) -> Option<String> {
    match input {
        Some(value) => optional_text(Some(value)),
        None => current,
    }
}
