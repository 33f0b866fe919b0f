//! Achievement actions. Unlocking is idempotent: only the first award of an
//! achievement grants its bonus points and sends a notification.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::common::{
    optional_text, require_text, Actor, AchievementId, Capability, MemberId, ValidationError,
};
use crate::domains::achievements::data::{AchievementInput, AwardAchievementResult, AchievementData};
use crate::domains::achievements::models::{
    Achievement, AchievementWithCount, MemberAchievement, UnlockedAchievement,
};
use crate::domains::members::actions::{announce_promotion, record_points};
use crate::domains::members::Member;
use crate::domains::notifications::actions::notify_member;
use crate::domains::notifications::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

pub async fn get_achievements(deps: &ServerDeps) -> Result<Vec<AchievementWithCount>> {
    Achievement::find_all_with_counts(&deps.db_pool).await
}

pub async fn get_member_achievements(
    member_id: &str,
    deps: &ServerDeps,
) -> Result<Vec<UnlockedAchievement>> {
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;
    MemberAchievement::find_for_member(member_id, &deps.db_pool).await
}

pub async fn create_achievement(
    actor: Actor,
    input: AchievementInput,
    deps: &ServerDeps,
) -> Result<Achievement> {
    actor.can(Capability::ManageAchievements).check()?;

    let name = require_text("name", &input.name)?;
    let description = require_text("description", &input.description)?;
    let points = input.points.unwrap_or(0);
    if points < 0 {
        return Err(ValidationError::InvalidPoints(points.to_string()).into());
    }
    if Achievement::find_by_name(&name, &deps.db_pool).await?.is_some() {
        return Err(ValidationError::Duplicate(format!("Achievement {}", name)).into());
    }

    let achievement =
        Achievement::create(&name, &description, optional_text(input.icon), points, &deps.db_pool)
            .await?;
    info!(achievement_id = %achievement.id, name = %achievement.name, "Achievement created");
    Ok(achievement)
}

/// Unlocks are removed with the achievement; points already granted stay.
pub async fn delete_achievement(actor: Actor, achievement_id: &str, deps: &ServerDeps) -> Result<bool> {
    actor.can(Capability::ManageAchievements).check()?;
    let id = AchievementId::parse(achievement_id).context("Invalid achievement id")?;

    let deleted = Achievement::delete(id, &deps.db_pool).await?;
    info!(achievement_id = %id, deleted, "Achievement deleted");
    Ok(deleted)
}

pub async fn award_achievement(
    actor: Actor,
    member_id: &str,
    achievement_id: &str,
    deps: &ServerDeps,
) -> Result<AwardAchievementResult> {
    actor.can(Capability::ManageAchievements).check()?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;
    let achievement_id = AchievementId::parse(achievement_id).context("Invalid achievement id")?;

    let member = Member::find_by_id_optional(member_id, &deps.db_pool)
        .await?
        .context("Member not found")?;
    let achievement = Achievement::find_by_id_optional(achievement_id, &deps.db_pool)
        .await?
        .context("Achievement not found")?;

    let mut tx = deps.db_pool.begin().await?;
    let inserted =
        MemberAchievement::insert_if_missing(member.id, achievement.id, achievement.points, &mut tx)
            .await?;

    let Some(unlock) = inserted else {
        tx.rollback().await?;
        let existing = MemberAchievement::find(member.id, achievement.id, &deps.db_pool)
            .await?
            .context("Achievement unlock disappeared")?;
        return Ok(AwardAchievementResult {
            achievement: AchievementData::from(achievement),
            unlocked_at: existing.unlocked_at,
            newly_unlocked: false,
        });
    };

    let change = if achievement.points > 0 {
        let reason = format!("Achievement unlocked: {}", achievement.name);
        Some(record_points(member.id, achievement.points, &reason, Some(actor.id()), &mut tx).await?)
    } else {
        None
    };
    tx.commit().await?;

    info!(
        member_id = %member.id,
        achievement = %achievement.name,
        bonus = achievement.points,
        "Achievement unlocked"
    );

    let body = if achievement.points > 0 {
        format!("{} (+{} Bash Points)", achievement.description, achievement.points)
    } else {
        achievement.description.clone()
    };
    let content = NotificationContent::new(
        NotificationKind::Achievement,
        format!("Achievement unlocked: {}", achievement.name),
        body,
    )
    .with_link(format!("/profile/{}", member.github_username));
    if let Err(e) = notify_member(member.id, content, deps).await {
        warn!(member_id = %member.id, error = %e, "Failed to send achievement notification");
    }
    if let Some(change) = &change {
        announce_promotion(change, deps).await;
    }

    Ok(AwardAchievementResult {
        achievement: AchievementData::from(achievement),
        unlocked_at: unlock.unlocked_at,
        newly_unlocked: true,
    })
}

/// Removes the unlock and takes back the bonus it granted.
pub async fn revoke_achievement(
    actor: Actor,
    member_id: &str,
    achievement_id: &str,
    deps: &ServerDeps,
) -> Result<bool> {
    actor.can(Capability::ManageAchievements).check()?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;
    let achievement_id = AchievementId::parse(achievement_id).context("Invalid achievement id")?;

    let mut tx = deps.db_pool.begin().await?;
    let Some(removed) = MemberAchievement::delete(member_id, achievement_id, &mut tx).await? else {
        return Ok(false);
    };
    if removed.points_awarded > 0 {
        record_points(
            member_id,
            -removed.points_awarded,
            "Achievement revoked",
            Some(actor.id()),
            &mut tx,
        )
        .await?;
    }
    tx.commit().await?;

    info!(member_id = %member_id, achievement_id = %achievement_id, "Achievement revoked");
    Ok(true)
}
