use chrono::{DateTime, Utc};
use juniper::GraphQLObject;

use crate::common::PageInfo;
use crate::domains::notifications::models::{Notification, NotificationKind, PushSubscription};

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "An in-app notification for the signed-in basher")]
pub struct NotificationData {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Frontend route to open when the notification is clicked
    pub link: Option<String>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationData {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            read: notification.is_read(),
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            link: notification.link,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct NotificationEdge {
    pub node: NotificationData,
    pub cursor: String,
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct NotificationConnection {
    pub edges: Vec<NotificationEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
    pub unread_count: i32,
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "Outcome of a broadcast to every basher")]
pub struct BroadcastResult {
    pub recipients: i32,
    pub push_delivered: i32,
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct PushSubscriptionData {
    pub id: String,
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
}

impl From<PushSubscription> for PushSubscriptionData {
    fn from(sub: PushSubscription) -> Self {
        Self {
            id: sub.id.to_string(),
            endpoint: sub.endpoint,
            created_at: sub.created_at,
        }
    }
}
