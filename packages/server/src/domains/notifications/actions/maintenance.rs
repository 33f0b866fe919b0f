use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::info;

use crate::domains::notifications::models::Notification;
use crate::kernel::ServerDeps;

/// Read notifications are kept this long before the nightly prune.
pub const READ_RETENTION_DAYS: i64 = 30;

pub async fn delete_read_older_than(days: i64, deps: &ServerDeps) -> Result<u64> {
    let cutoff = Utc::now() - Duration::days(days);
    let removed = Notification::delete_read_before(cutoff, &deps.db_pool).await?;
    info!(removed, days, "Pruned read notifications");
    Ok(removed)
}
