use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::EventId;

/// A scheduled club event - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// Bash Points awarded to each attendee
    pub points: i32,
    pub reminder_sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated event fields, shared by create and update
#[derive(Debug, Clone)]
pub struct EventFields {
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub points: i32,
}

impl Event {
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now
    }

    pub async fn find_by_id_optional(id: EventId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Events that have not finished yet, soonest first
    pub async fn find_upcoming(now: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE ends_at > $1 ORDER BY starts_at ASC")
            .bind(now)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Finished events, most recent first
    pub async fn find_past(now: DateTime<Utc>, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE ends_at <= $1 ORDER BY starts_at DESC")
            .bind(now)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events ORDER BY starts_at DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Unreminded events starting in `(now, until]`
    pub async fn find_due_for_reminder(
        now: DateTime<Utc>,
        until: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events
             WHERE reminder_sent = FALSE AND starts_at > $1 AND starts_at <= $2
             ORDER BY starts_at ASC",
        )
        .bind(now)
        .bind(until)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Flip `reminder_sent`; `None` when another worker already claimed it.
    pub async fn claim_reminder(id: EventId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE events SET reminder_sent = TRUE
             WHERE id = $1 AND reminder_sent = FALSE
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Undo a claim whose reminder could not be stored.
    pub async fn release_reminder(id: EventId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE events SET reminder_sent = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn create(fields: EventFields, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO events (id, title, description, venue, starts_at, ends_at, points)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(EventId::new())
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.venue)
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.points)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Moving the start time re-arms the reminder.
    pub async fn update(id: EventId, fields: EventFields, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE events
             SET title = $2,
                 description = $3,
                 venue = $4,
                 reminder_sent = reminder_sent AND starts_at = $5,
                 starts_at = $5,
                 ends_at = $6,
                 points = $7
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.venue)
        .bind(fields.starts_at)
        .bind(fields.ends_at)
        .bind(fields.points)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: EventId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
