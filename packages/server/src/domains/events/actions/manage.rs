use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::common::{optional_text, require_text, Actor, Capability, EventId, ValidationError};
use crate::domains::events::data::EventInput;
use crate::domains::events::models::{Event, EventFields};
use crate::domains::members::Member;
use crate::domains::notifications::actions::notify_members;
use crate::domains::notifications::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

/// Trim text fields and enforce the event invariants.
pub fn validate_event(input: EventInput) -> Result<EventFields, ValidationError> {
    let title = require_text("title", &input.title)?;
    if input.ends_at <= input.starts_at {
        return Err(ValidationError::InvalidTimeRange);
    }
    let points = input.points.unwrap_or(0);
    if points < 0 {
        return Err(ValidationError::InvalidPoints(points.to_string()));
    }

    Ok(EventFields {
        title,
        description: optional_text(input.description),
        venue: optional_text(input.venue),
        starts_at: input.starts_at,
        ends_at: input.ends_at,
        points,
    })
}

pub async fn get_events(upcoming: Option<bool>, deps: &ServerDeps) -> Result<Vec<Event>> {
    let now = Utc::now();
    match upcoming {
        Some(true) => Event::find_upcoming(now, &deps.db_pool).await,
        Some(false) => Event::find_past(now, &deps.db_pool).await,
        None => Event::find_all(&deps.db_pool).await,
    }
}

pub async fn get_event(event_id: &str, deps: &ServerDeps) -> Result<Option<Event>> {
    let id = EventId::parse(event_id).context("Invalid event id")?;
    Event::find_by_id_optional(id, &deps.db_pool).await
}

/// Schedules the event and announces it to every basher.
pub async fn create_event(actor: Actor, input: EventInput, deps: &ServerDeps) -> Result<Event> {
    actor.can(Capability::ManageEvents).check()?;

    let event = Event::create(validate_event(input)?, &deps.db_pool).await?;
    info!(event_id = %event.id, title = %event.title, starts_at = %event.starts_at, "Event created");

    if event.starts_at > Utc::now() {
        let content = NotificationContent::new(
            NotificationKind::Event,
            format!("New event: {}", event.title),
            describe_schedule(&event),
        )
        .with_link(format!("/events/{}", event.id));

        match Member::all_ids(&deps.db_pool).await {
            Ok(ids) => {
                if let Err(e) = notify_members(&ids, content, deps).await {
                    warn!(event_id = %event.id, error = %e, "Failed to announce event");
                }
            }
            Err(e) => warn!(event_id = %event.id, error = %e, "Failed to load members for announcement"),
        }
    }

    Ok(event)
}

pub async fn update_event(
    actor: Actor,
    event_id: &str,
    input: EventInput,
    deps: &ServerDeps,
) -> Result<Event> {
    actor.can(Capability::ManageEvents).check()?;
    let id = EventId::parse(event_id).context("Invalid event id")?;
    let fields = validate_event(input)?;

    Event::find_by_id_optional(id, &deps.db_pool)
        .await?
        .context("Event not found")?;

    let event = Event::update(id, fields, &deps.db_pool).await?;
    info!(event_id = %event.id, "Event updated");
    Ok(event)
}

pub async fn delete_event(actor: Actor, event_id: &str, deps: &ServerDeps) -> Result<bool> {
    actor.can(Capability::ManageEvents).check()?;
    let id = EventId::parse(event_id).context("Invalid event id")?;

    let deleted = Event::delete(id, &deps.db_pool).await?;
    info!(event_id = %id, deleted, "Event deleted");
    Ok(deleted)
}

pub(crate) fn describe_schedule(event: &Event) -> String {
    let when = event.starts_at.format("%a %d %b, %H:%M UTC");
    match event.venue.as_deref() {
        Some(venue) => format!("{} at {}", when, venue),
        None => when.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn input(hours: i64) -> EventInput {
        let starts_at = Utc.with_ymd_and_hms(2026, 3, 6, 18, 0, 0).unwrap();
        EventInput {
            title: "  Hack Night ".into(),
            description: Some("".into()),
            venue: Some("Lab 3".into()),
            starts_at,
            ends_at: starts_at + Duration::hours(hours),
            points: None,
        }
    }

    #[test]
    fn valid_event_is_trimmed() {
        let fields = validate_event(input(3)).unwrap();
        assert_eq!(fields.title, "Hack Night");
        assert_eq!(fields.description, None);
        assert_eq!(fields.points, 0);
    }

    #[test]
    fn end_must_follow_start() {
        assert_eq!(validate_event(input(0)).unwrap_err(), ValidationError::InvalidTimeRange);
        assert_eq!(validate_event(input(-1)).unwrap_err(), ValidationError::InvalidTimeRange);
    }

    #[test]
    fn negative_points_rejected() {
        let mut bad = input(2);
        bad.points = Some(-5);
        assert!(matches!(validate_event(bad), Err(ValidationError::InvalidPoints(_))));
    }

    #[test]
    fn blank_title_rejected() {
        let mut bad = input(2);
        bad.title = "   ".into();
        assert_eq!(validate_event(bad).unwrap_err(), ValidationError::EmptyField("title"));
    }
}
