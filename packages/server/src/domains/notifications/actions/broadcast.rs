use anyhow::Result;
use tracing::info;

use crate::common::{optional_text, require_text, Actor, Capability};
use crate::domains::members::models::Member;
use crate::domains::notifications::actions::dispatch::{notify_members, DeliverySummary};
use crate::domains::notifications::models::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

/// Organiser announcement to every basher
pub async fn broadcast_notification(
    actor: Actor,
    title: String,
    body: String,
    link: Option<String>,
    deps: &ServerDeps,
) -> Result<DeliverySummary> {
    actor.can(Capability::BroadcastNotifications).check()?;

    let mut content = NotificationContent::new(
        NotificationKind::General,
        require_text("title", &title)?,
        require_text("body", &body)?,
    );
    content.link = optional_text(link);

    let member_ids = Member::all_ids(&deps.db_pool).await?;
    info!(actor = %actor.id(), recipients = member_ids.len(), "Broadcasting notification");

    notify_members(&member_ids, content, deps).await
}
