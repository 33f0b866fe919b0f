//! Marking attendance. Each newly marked attendee earns the event's points
//! in the same transaction as the attendance row; unmarking reverses them.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::common::utils::percentage;
use crate::common::{Actor, Capability, ClanId, EventId, MemberId};
use crate::domains::clans::Clan;
use crate::domains::events::actions::report::{aggregate_attendance, Roster};
use crate::domains::events::data::{AttendanceReportData, MarkAttendanceResult, MemberAttendanceData};
use crate::domains::events::models::{Attendance, Event};
use crate::domains::members::actions::{announce_promotion, record_points, PointsChange};
use crate::domains::members::Member;
use crate::domains::notifications::actions::notify_member;
use crate::domains::notifications::{NotificationContent, NotificationKind};
use crate::kernel::ServerDeps;

async fn find_event(event_id: &str, deps: &ServerDeps) -> Result<Event> {
    let id = EventId::parse(event_id).context("Invalid event id")?;
    Event::find_by_id_optional(id, &deps.db_pool)
        .await?
        .context("Event not found")
}

pub async fn mark_attendance(
    actor: Actor,
    event_id: &str,
    member_ids: Vec<String>,
    deps: &ServerDeps,
) -> Result<MarkAttendanceResult> {
    actor.can(Capability::ManageEvents).check()?;
    let event = find_event(event_id, deps).await?;

    let mut ids: Vec<MemberId> = Vec::with_capacity(member_ids.len());
    for raw in &member_ids {
        let id = MemberId::parse(raw).with_context(|| format!("Invalid member id: {}", raw))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    let known: HashSet<MemberId> = Member::find_by_ids(&ids, &deps.db_pool)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();
    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        bail!("Member not found: {}", missing);
    }

    let reason = format!("Attended {}", event.title);
    let mut newly_marked = Vec::new();
    let mut changes: Vec<PointsChange> = Vec::new();

    let mut tx = deps.db_pool.begin().await?;
    for member_id in &ids {
        let marked = Attendance::insert_if_missing(event.id, *member_id, event.points, &mut tx).await?;
        if marked.is_none() {
            continue;
        }
        newly_marked.push(*member_id);

        if event.points > 0 {
            let change = record_points(*member_id, event.points, &reason, Some(actor.id()), &mut tx).await?;
            changes.push(change);
        }
    }
    tx.commit().await?;

    info!(
        event_id = %event.id,
        newly_marked = newly_marked.len(),
        requested = ids.len(),
        "Attendance marked"
    );

    for member_id in &newly_marked {
        let body = if event.points > 0 {
            format!("Thanks for coming! You earned {} Bash Points.", event.points)
        } else {
            "Thanks for coming! Your attendance was recorded.".to_string()
        };
        let content = NotificationContent::new(NotificationKind::Event, event.title.clone(), body)
            .with_link(format!("/events/{}", event.id));

        if let Err(e) = notify_member(*member_id, content, deps).await {
            warn!(member_id = %member_id, error = %e, "Failed to send attendance notification");
        }
    }
    for change in &changes {
        announce_promotion(change, deps).await;
    }

    Ok(MarkAttendanceResult {
        newly_marked: newly_marked.len() as i32,
        already_marked: (ids.len() - newly_marked.len()) as i32,
        points_per_attendee: event.points,
    })
}

/// Returns false when the member was not marked.
pub async fn unmark_attendance(
    actor: Actor,
    event_id: &str,
    member_id: &str,
    deps: &ServerDeps,
) -> Result<bool> {
    actor.can(Capability::ManageEvents).check()?;
    let event = find_event(event_id, deps).await?;
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;

    let mut tx = deps.db_pool.begin().await?;
    let Some(removed) = Attendance::delete(event.id, member_id, &mut tx).await? else {
        return Ok(false);
    };
    if removed.points_awarded > 0 {
        record_points(
            member_id,
            -removed.points_awarded,
            &format!("Attendance removed: {}", event.title),
            Some(actor.id()),
            &mut tx,
        )
        .await?;
    }
    tx.commit().await?;

    info!(
        event_id = %event.id,
        member_id = %member_id,
        points_reversed = removed.points_awarded,
        "Attendance unmarked"
    );
    Ok(true)
}

pub async fn get_event_attendance(event_id: &str, deps: &ServerDeps) -> Result<AttendanceReportData> {
    let event = find_event(event_id, deps).await?;
    let pool = &deps.db_pool;

    let roster: Vec<Roster> = Member::find_all_by_points(pool)
        .await?
        .into_iter()
        .map(|m| Roster {
            member_id: m.id,
            clan_id: m.clan_id,
        })
        .collect();
    let clans: Vec<(ClanId, String)> = Clan::find_all(pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();
    let attendees: HashSet<MemberId> = Attendance::member_ids_for_event(event.id, pool)
        .await?
        .into_iter()
        .collect();

    Ok(aggregate_attendance(event.id.to_string(), &roster, &clans, &attendees))
}

pub async fn get_member_attendance(member_id: &str, deps: &ServerDeps) -> Result<MemberAttendanceData> {
    let member_id = MemberId::parse(member_id).context("Invalid member id")?;
    let member = Member::find_by_id_optional(member_id, &deps.db_pool)
        .await?
        .context("Member not found")?;
    member_attendance(&member, deps).await
}

pub(crate) async fn member_attendance(member: &Member, deps: &ServerDeps) -> Result<MemberAttendanceData> {
    let tally = Attendance::tally_for_member(member.id, member.joined_at, Utc::now(), &deps.db_pool).await?;

    Ok(MemberAttendanceData {
        member_id: member.id.to_string(),
        attended: tally.attended as i32,
        eligible_events: tally.eligible as i32,
        percentage: percentage(tally.attended, tally.eligible),
    })
}
