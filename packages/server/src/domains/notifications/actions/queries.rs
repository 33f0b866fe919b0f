use anyhow::Result;
use tracing::info;

use crate::common::{build_page_info, Cursor, MemberId, ValidatedPaginationArgs};
use crate::domains::notifications::data::{
    NotificationConnection, NotificationData, NotificationEdge,
};
use crate::domains::notifications::models::Notification;
use crate::kernel::ServerDeps;

pub async fn get_my_notifications(
    member_id: MemberId,
    unread_only: bool,
    args: &ValidatedPaginationArgs,
    deps: &ServerDeps,
) -> Result<NotificationConnection> {
    info!(member_id = %member_id, unread_only, "Getting notifications");

    let pool = &deps.db_pool;
    let (rows, has_more) = Notification::find_page(member_id, unread_only, args, pool).await?;
    let total_count = Notification::count_for_member(member_id, unread_only, pool).await? as i32;
    let unread_count = Notification::count_unread(member_id, pool).await? as i32;

    let edges: Vec<NotificationEdge> = rows
        .into_iter()
        .map(|notification| {
            let cursor = Cursor::encode_uuid(notification.id.into_uuid());
            NotificationEdge {
                node: NotificationData::from(notification),
                cursor,
            }
        })
        .collect();

    let page_info = build_page_info(
        has_more,
        args,
        edges.first().map(|e| e.cursor.clone()),
        edges.last().map(|e| e.cursor.clone()),
    );

    Ok(NotificationConnection {
        edges,
        page_info,
        total_count,
        unread_count,
    })
}

pub async fn get_unread_count(member_id: MemberId, deps: &ServerDeps) -> Result<i32> {
    Ok(Notification::count_unread(member_id, &deps.db_pool).await? as i32)
}
