use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::domains::events::actions::manage::describe_schedule;
use crate::domains::events::models::Event;
use crate::domains::members::Member;
use crate::domains::notifications::actions::notify_members;
use crate::domains::notifications::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

/// How far ahead an event gets its reminder
pub const REMINDER_WINDOW_HOURS: i64 = 24;

/// Remind every basher about events starting soon. Each event is claimed
/// before sending, so overlapping runs never remind twice; a claim whose
/// notifications could not be stored is released for the next run.
pub async fn send_event_reminders(deps: &ServerDeps) -> Result<usize> {
    let now = Utc::now();
    let due = Event::find_due_for_reminder(now, now + Duration::hours(REMINDER_WINDOW_HOURS), &deps.db_pool).await?;
    if due.is_empty() {
        return Ok(0);
    }

    let member_ids = Member::all_ids(&deps.db_pool).await?;
    let mut sent = 0;

    for event in due {
        let Some(event) = Event::claim_reminder(event.id, &deps.db_pool).await? else {
            continue;
        };

        let content = NotificationContent::new(
            NotificationKind::Event,
            format!("Reminder: {}", event.title),
            describe_schedule(&event),
        )
        .with_link(format!("/events/{}", event.id));

        match notify_members(&member_ids, content, deps).await {
            Ok(summary) => {
                info!(event_id = %event.id, recipients = summary.recipients, "Event reminder sent");
                sent += 1;
            }
            Err(e) => {
                warn!(event_id = %event.id, error = %e, "Event reminder failed, releasing claim");
                if let Err(e) = Event::release_reminder(event.id, &deps.db_pool).await {
                    warn!(event_id = %event.id, error = %e, "Failed to release reminder claim");
                }
            }
        }
    }

    Ok(sent)
}
