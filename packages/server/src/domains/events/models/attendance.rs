use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::{EventId, MemberId};

/// A basher checked in at an event
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Attendance {
    pub event_id: EventId,
    pub member_id: MemberId,
    /// Points granted when marked, reversed on unmark
    pub points_awarded: i32,
    pub marked_at: DateTime<Utc>,
}

/// Attended vs eligible events for one basher
#[derive(sqlx::FromRow, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceTally {
    pub attended: i64,
    pub eligible: i64,
}

impl Attendance {
    /// `None` when the member was already marked.
    pub async fn insert_if_missing(
        event_id: EventId,
        member_id: MemberId,
        points_awarded: i32,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO attendance (event_id, member_id, points_awarded)
             VALUES ($1, $2, $3)
             ON CONFLICT (event_id, member_id) DO NOTHING
             RETURNING *",
        )
        .bind(event_id)
        .bind(member_id)
        .bind(points_awarded)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(
        event_id: EventId,
        member_id: MemberId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM attendance WHERE event_id = $1 AND member_id = $2 RETURNING *",
        )
        .bind(event_id)
        .bind(member_id)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn member_ids_for_event(event_id: EventId, pool: &PgPool) -> Result<Vec<MemberId>> {
        sqlx::query_scalar::<_, MemberId>(
            "SELECT member_id FROM attendance WHERE event_id = $1 ORDER BY marked_at",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_event(event_id: EventId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Eligible events are those that started after the member joined,
    /// plus any earlier event they were marked at.
    pub async fn tally_for_member(
        member_id: MemberId,
        joined_at: DateTime<Utc>,
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<AttendanceTally> {
        sqlx::query_as::<_, AttendanceTally>(
            "SELECT COUNT(a.member_id) AS attended, COUNT(*) AS eligible
             FROM events e
             LEFT JOIN attendance a ON a.event_id = e.id AND a.member_id = $1
             WHERE e.starts_at <= $3
               AND (e.starts_at >= $2 OR a.member_id IS NOT NULL)",
        )
        .bind(member_id)
        .bind(joined_at)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
