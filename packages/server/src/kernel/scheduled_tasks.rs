//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! - Every 15 minutes: remind bashers about events starting within a day
//! - Daily at 03:00 UTC: prune read notifications past retention

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::events::actions::send_event_reminders;
use crate::domains::notifications::actions::{delete_read_older_than, READ_RETENTION_DAYS};
use crate::kernel::ServerDeps;

const EVENT_REMINDER_SCHEDULE: &str = "0 */15 * * * *";
const NOTIFICATION_PRUNE_SCHEDULE: &str = "0 0 3 * * *";

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let reminder_deps = deps.clone();
    let reminder_job = Job::new_async(EVENT_REMINDER_SCHEDULE, move |_uuid, _lock| {
        let deps = reminder_deps.clone();
        Box::pin(async move {
            match send_event_reminders(&deps).await {
                Ok(0) => tracing::debug!("No event reminders due"),
                Ok(sent) => tracing::info!("Sent reminders for {} events", sent),
                Err(e) => tracing::error!("Event reminder task failed: {}", e),
            }
        })
    })?;

    scheduler.add(reminder_job).await?;

    let prune_deps = deps.clone();
    let prune_job = Job::new_async(NOTIFICATION_PRUNE_SCHEDULE, move |_uuid, _lock| {
        let deps = prune_deps.clone();
        Box::pin(async move {
            if let Err(e) = delete_read_older_than(READ_RETENTION_DAYS, &deps).await {
                tracing::error!("Notification prune task failed: {}", e);
            }
        })
    })?;

    scheduler.add(prune_job).await?;
    scheduler.start().await?;

    tracing::info!(
        "Scheduled tasks started (event reminders every 15 minutes, notification prune daily at 03:00)"
    );
    Ok(scheduler)
}
