//! Inbox mutations. Bashers only ever touch their own notifications.

use anyhow::{Context, Result};
use tracing::info;

use crate::common::{MemberId, NotificationId};
use crate::domains::notifications::models::Notification;
use crate::kernel::ServerDeps;

pub async fn mark_notification_read(
    member_id: MemberId,
    notification_id: &str,
    deps: &ServerDeps,
) -> Result<Notification> {
    let id = NotificationId::parse(notification_id).context("Invalid notification id")?;

    Notification::mark_read(id, member_id, &deps.db_pool)
        .await?
        .context("Notification not found")
}

pub async fn mark_all_notifications_read(member_id: MemberId, deps: &ServerDeps) -> Result<i32> {
    let updated = Notification::mark_all_read(member_id, &deps.db_pool).await?;
    info!(member_id = %member_id, updated, "Marked all notifications read");
    Ok(updated as i32)
}

pub async fn delete_notification(
    member_id: MemberId,
    notification_id: &str,
    deps: &ServerDeps,
) -> Result<bool> {
    let id = NotificationId::parse(notification_id).context("Invalid notification id")?;
    Notification::delete(id, member_id, &deps.db_pool).await
}
