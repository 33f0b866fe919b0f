//! Fan-out of notifications to the inbox and to browser push.
//!
//! Every notification is stored first. Push is best effort: a failed push
//! is logged and never fails the operation that triggered it, and
//! subscriptions the push service reports as gone are deleted.

use std::sync::Arc;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::common::MemberId;
use crate::domains::notifications::data::BroadcastResult;
use crate::domains::notifications::models::{Notification, NotificationContent, PushSubscription};
use crate::kernel::{PushOutcome, PushPayload, ServerDeps};

/// Concurrent sends during a fan-out
const PUSH_CONCURRENCY: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliverySummary {
    pub recipients: u64,
    pub push_delivered: usize,
}

impl From<DeliverySummary> for BroadcastResult {
    fn from(summary: DeliverySummary) -> Self {
        Self {
            recipients: summary.recipients as i32,
            push_delivered: summary.push_delivered as i32,
        }
    }
}

/// Store a notification for one basher and push it to their browsers.
pub async fn notify_member(
    member_id: MemberId,
    content: NotificationContent,
    deps: &ServerDeps,
) -> Result<Notification> {
    let notification = Notification::create(member_id, &content, &deps.db_pool).await?;
    debug!(member_id = %member_id, kind = ?content.kind, "Notification stored");

    match PushSubscription::find_by_member(member_id, &deps.db_pool).await {
        Ok(subscriptions) => {
            deliver_push(&subscriptions, &content, deps).await;
        }
        Err(e) => warn!(member_id = %member_id, error = %e, "Failed to load push subscriptions"),
    }

    Ok(notification)
}

/// Store the same notification for many bashers and push it to each of them.
pub async fn notify_members(
    member_ids: &[MemberId],
    content: NotificationContent,
    deps: &ServerDeps,
) -> Result<DeliverySummary> {
    let recipients = Notification::create_for_members(member_ids, &content, &deps.db_pool).await?;

    let push_delivered = match PushSubscription::find_by_members(member_ids, &deps.db_pool).await {
        Ok(subscriptions) => deliver_push(&subscriptions, &content, deps).await,
        Err(e) => {
            warn!(error = %e, "Failed to load push subscriptions for fan-out");
            0
        }
    };

    info!(recipients, push_delivered, kind = ?content.kind, "Notification fan-out complete");

    Ok(DeliverySummary {
        recipients,
        push_delivered,
    })
}

/// Returns how many pushes were accepted by the push services.
pub(crate) async fn deliver_push(
    subscriptions: &[PushSubscription],
    content: &NotificationContent,
    deps: &ServerDeps,
) -> usize {
    if subscriptions.is_empty() {
        return 0;
    }
    if deps.push_service.public_key().is_none() {
        debug!("Push disabled, {} subscriptions skipped", subscriptions.len());
        return 0;
    }

    let payload = PushPayload {
        title: content.title.clone(),
        body: content.body.clone(),
        url: content.link.clone(),
    };

    // Each send owns its service handle and payload so the fan-out stays Send
    let sends: Vec<BoxFuture<'static, (String, Result<PushOutcome>)>> = subscriptions
        .iter()
        .map(|sub| {
            let push = Arc::clone(&deps.push_service);
            let payload = payload.clone();
            let target = sub.target();
            async move {
                let outcome = push.send(&target, &payload).await;
                (target.endpoint, outcome)
            }
            .boxed()
        })
        .collect();

    let outcomes: Vec<(String, Result<PushOutcome>)> = stream::iter(sends)
        .buffer_unordered(PUSH_CONCURRENCY)
        .collect()
        .await;

    let mut delivered = 0;
    let mut gone = Vec::new();
    for (endpoint, outcome) in outcomes {
        match outcome {
            Ok(PushOutcome::Delivered) => delivered += 1,
            Ok(PushOutcome::Gone) => gone.push(endpoint),
            Err(e) => warn!(endpoint = %endpoint, error = %e, "Push delivery failed"),
        }
    }

    if !gone.is_empty() {
        match PushSubscription::delete_by_endpoints(&gone, &deps.db_pool).await {
            Ok(removed) => info!(removed, "Removed expired push subscriptions"),
            Err(e) => warn!(error = %e, "Failed to remove expired push subscriptions"),
        }
    }

    delivered
}
