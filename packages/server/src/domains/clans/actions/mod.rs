//! Clan actions: organisers create clans and move bashers between them.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::common::{optional_text, require_text, Actor, Capability, ClanId, MemberId, ValidationError};
use crate::domains::clans::data::ClanInput;
use crate::domains::clans::models::Clan;
use crate::domains::members::actions::existing_clan;
use crate::domains::members::Member;
use crate::domains::notifications::actions::notify_member;
use crate::domains::notifications::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

pub async fn get_clans(deps: &ServerDeps) -> Result<Vec<Clan>> {
    Clan::find_all(&deps.db_pool).await
}

pub async fn get_clan(clan_id: &str, deps: &ServerDeps) -> Result<Option<Clan>> {
    let id = ClanId::parse(clan_id).context("Invalid clan id")?;
    Clan::find_by_id_optional(id, &deps.db_pool).await
}

pub async fn create_clan(actor: Actor, input: ClanInput, deps: &ServerDeps) -> Result<Clan> {
    actor.can(Capability::ManageClans).check()?;

    let name = require_text("name", &input.name)?;
    if Clan::find_by_name(&name, &deps.db_pool).await?.is_some() {
        return Err(ValidationError::Duplicate(format!("Clan name {}", name)).into());
    }

    let clan = Clan::create(
        &name,
        optional_text(input.description),
        optional_text(input.logo_url),
        optional_text(input.banner_url),
        &deps.db_pool,
    )
    .await?;

    info!(clan_id = %clan.id, name = %clan.name, "Clan created");
    Ok(clan)
}

pub async fn update_clan(
    actor: Actor,
    clan_id: &str,
    input: ClanInput,
    deps: &ServerDeps,
) -> Result<Clan> {
    actor.can(Capability::ManageClans).check()?;
    let clan_id = existing_clan(clan_id, deps).await?;

    let name = require_text("name", &input.name)?;
    if let Some(other) = Clan::find_by_name(&name, &deps.db_pool).await? {
        if other.id != clan_id {
            return Err(ValidationError::Duplicate(format!("Clan name {}", name)).into());
        }
    }

    let clan = Clan::update(
        clan_id,
        &name,
        optional_text(input.description),
        optional_text(input.logo_url),
        optional_text(input.banner_url),
        &deps.db_pool,
    )
    .await?;

    info!(clan_id = %clan.id, "Clan updated");
    Ok(clan)
}

pub async fn delete_clan(actor: Actor, clan_id: &str, deps: &ServerDeps) -> Result<bool> {
    actor.can(Capability::ManageClans).check()?;
    let clan_id = ClanId::parse(clan_id).context("Invalid clan id")?;

    let deleted = Clan::delete(clan_id, &deps.db_pool).await?;
    info!(clan_id = %clan_id, deleted, "Clan deleted");
    Ok(deleted)
}

/// Move a basher into a clan, or out of any clan when `clan_id` is `None`.
pub async fn assign_clan(
    actor: Actor,
    member_id: &str,
    clan_id: Option<String>,
    deps: &ServerDeps,
) -> Result<Member> {
    actor.can(Capability::ManageClans).check()?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;

    let clan = match clan_id.as_deref() {
        Some(raw) => {
            let id = ClanId::parse(raw).context("Invalid clan id")?;
            Some(
                Clan::find_by_id_optional(id, &deps.db_pool)
                    .await?
                    .context("Clan not found")?,
            )
        }
        None => None,
    };

    let member = Member::set_clan(member_id, clan.as_ref().map(|c| c.id), &deps.db_pool)
        .await
        .context("Member not found")?;

    info!(
        member_id = %member_id,
        clan_id = ?clan.as_ref().map(|c| c.id),
        "Clan assignment changed"
    );

    if let Some(clan) = clan {
        let content = NotificationContent::new(
            NotificationKind::Clan,
            format!("You joined {}", clan.name),
            "Every Bash Point you earn now counts for your clan too.",
        )
        .with_link(format!("/clans/{}", clan.id));

        if let Err(e) = notify_member(member_id, content, deps).await {
            warn!(member_id = %member_id, error = %e, "Failed to send clan notification");
        }
    }

    Ok(member)
}
