//! Bash Points ledger.
//!
//! A points change always writes the member's new total and a ledger line
//! in the same transaction. Notifications go out after commit.

use anyhow::{Context, Result};
use sqlx::PgConnection;
use tracing::{info, warn};

use crate::common::{require_text, Actor, Capability, MemberId, Tier, ValidationError};
use crate::domains::members::data::PointsAwardResult;
use crate::domains::members::models::{Member, PointsEntry};
use crate::domains::notifications::actions::notify_member;
use crate::domains::notifications::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone)]
pub struct PointsChange {
    pub member: Member,
    pub entry: PointsEntry,
    pub previous_tier: Tier,
}

impl PointsChange {
    pub fn tier(&self) -> Tier {
        Tier::from_points(self.member.bash_points)
    }

    pub fn promoted(&self) -> bool {
        self.tier() > self.previous_tier
    }
}

impl From<PointsChange> for PointsAwardResult {
    fn from(change: PointsChange) -> Self {
        let promoted = change.promoted();
        Self {
            member: change.member.into(),
            entry: change.entry.into(),
            previous_tier: change.previous_tier,
            promoted,
        }
    }
}

/// Apply `delta` inside the caller's transaction.
pub async fn record_points(
    member_id: MemberId,
    delta: i32,
    reason: &str,
    awarded_by: Option<MemberId>,
    conn: &mut PgConnection,
) -> Result<PointsChange> {
    let member = Member::add_points(member_id, delta, &mut *conn).await?;
    let entry = PointsEntry::create(member_id, delta, reason, awarded_by, &mut *conn).await?;
    let previous_tier = Tier::from_points(member.bash_points - delta);

    Ok(PointsChange {
        member,
        entry,
        previous_tier,
    })
}

/// Tell a basher they reached a new tier. Never fails the caller.
pub async fn announce_promotion(change: &PointsChange, deps: &ServerDeps) {
    if !change.promoted() {
        return;
    }

    let tier = change.tier();
    info!(
        member_id = %change.member.id,
        from = %change.previous_tier,
        to = %tier,
        "Basher promoted"
    );

    let content = NotificationContent::new(
        NotificationKind::Tier,
        format!("Welcome to {}!", capitalize(tier.label())),
        format!(
            "You reached {} Bash Points and moved up to the {} tier.",
            change.member.bash_points,
            tier.label()
        ),
    )
    .with_link(format!("/profile/{}", change.member.github_username));

    if let Err(e) = notify_member(change.member.id, content, deps).await {
        warn!(member_id = %change.member.id, error = %e, "Failed to send tier notification");
    }
}

/// Organiser award or deduction of Bash Points
pub async fn award_points(
    actor: Actor,
    member_id: &str,
    points: i32,
    reason: String,
    deps: &ServerDeps,
) -> Result<PointsChange> {
    actor.can(Capability::AwardPoints).check()?;

    if points == 0 {
        return Err(ValidationError::ZeroPoints.into());
    }
    let reason = require_text("reason", &reason)?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;

    Member::find_by_id_optional(member_id, &deps.db_pool)
        .await?
        .context("Member not found")?;

    let mut tx = deps.db_pool.begin().await?;
    let change = record_points(member_id, points, &reason, Some(actor.id()), &mut tx).await?;
    tx.commit().await?;

    info!(
        member_id = %member_id,
        points,
        total = change.member.bash_points,
        awarded_by = %actor.id(),
        "Bash Points awarded"
    );

    let title = if points > 0 {
        format!("You earned {} Bash Points", points)
    } else {
        format!("{} Bash Points deducted", points.unsigned_abs())
    };
    let content = NotificationContent::new(NotificationKind::Points, title, reason)
        .with_link(format!("/profile/{}", change.member.github_username));
    if let Err(e) = notify_member(member_id, content, deps).await {
        warn!(member_id = %member_id, error = %e, "Failed to send points notification");
    }

    announce_promotion(&change, deps).await;

    Ok(change)
}

pub async fn get_points_history(
    member_id: &str,
    limit: Option<i32>,
    deps: &ServerDeps,
) -> Result<Vec<PointsEntry>> {
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;
    let limit = i64::from(limit.unwrap_or(50).clamp(1, 200));
    PointsEntry::find_by_member(member_id, limit, &deps.db_pool).await
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
