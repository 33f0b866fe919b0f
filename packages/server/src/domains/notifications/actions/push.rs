use anyhow::{bail, Result};
use tracing::info;

use crate::common::{require_text, MemberId};
use crate::domains::notifications::models::PushSubscription;
use crate::kernel::ServerDeps;

pub fn get_vapid_public_key(deps: &ServerDeps) -> Option<String> {
    deps.push_service.public_key()
}

pub async fn subscribe_push(
    member_id: MemberId,
    endpoint: String,
    p256dh: String,
    auth: String,
    deps: &ServerDeps,
) -> Result<PushSubscription> {
    let endpoint = require_text("endpoint", &endpoint)?;
    if !endpoint.starts_with("https://") {
        bail!("Push endpoint must be an https URL");
    }
    let p256dh = require_text("p256dh", &p256dh)?;
    let auth = require_text("auth", &auth)?;

    let subscription =
        PushSubscription::upsert(member_id, &endpoint, &p256dh, &auth, &deps.db_pool).await?;
    info!(member_id = %member_id, "Push subscription registered");

    Ok(subscription)
}

pub async fn unsubscribe_push(member_id: MemberId, endpoint: &str, deps: &ServerDeps) -> Result<bool> {
    PushSubscription::delete_for_member(endpoint.trim(), member_id, &deps.db_pool).await
}
