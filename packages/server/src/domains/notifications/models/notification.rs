use anyhow::Result;
use chrono::{DateTime, Utc};
use juniper::GraphQLEnum;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{MemberId, NotificationId, ValidatedPaginationArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, GraphQLEnum)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    General,
    Points,
    Achievement,
    Event,
    Clan,
    Tier,
}

/// In-app notification - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub member_id: MemberId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Content of a notification before it is addressed to anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

impl NotificationContent {
    pub fn new(kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

impl Notification {
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }

    pub async fn create(
        member_id: MemberId,
        content: &NotificationContent,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO notifications (id, member_id, kind, title, body, link)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(member_id)
        .bind(content.kind)
        .bind(&content.title)
        .bind(&content.body)
        .bind(&content.link)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// One row per member in a single statement; returns rows inserted.
    pub async fn create_for_members(
        member_ids: &[MemberId],
        content: &NotificationContent,
        pool: &PgPool,
    ) -> Result<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<NotificationId> = member_ids.iter().map(|_| NotificationId::new()).collect();

        let result = sqlx::query(
            "INSERT INTO notifications (id, member_id, kind, title, body, link)
             SELECT n.id, n.member_id, $3, $4, $5, $6
             FROM UNNEST($1::uuid[], $2::uuid[]) AS n(id, member_id)",
        )
        .bind(&ids)
        .bind(member_ids)
        .bind(content.kind)
        .bind(&content.title)
        .bind(&content.body)
        .bind(&content.link)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// A member's notifications, newest first.
    pub async fn find_page(
        member_id: MemberId,
        unread_only: bool,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> Result<(Vec<Self>, bool)> {
        // Newest first, so "forward" walks towards smaller ids.
        let rows = if args.is_forward() {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM notifications
                 WHERE member_id = $1
                   AND ($2 = FALSE OR read_at IS NULL)
                   AND ($3::uuid IS NULL OR id < $3)
                 ORDER BY id DESC
                 LIMIT $4",
            )
            .bind(member_id)
            .bind(unread_only)
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?
        } else {
            let mut rows = sqlx::query_as::<_, Self>(
                "SELECT * FROM notifications
                 WHERE member_id = $1
                   AND ($2 = FALSE OR read_at IS NULL)
                   AND ($3::uuid IS NULL OR id > $3)
                 ORDER BY id ASC
                 LIMIT $4",
            )
            .bind(member_id)
            .bind(unread_only)
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?;

            let has_more = rows.len() > args.limit as usize;
            rows.truncate(args.limit as usize);
            rows.reverse();
            return Ok((rows, has_more));
        };

        Ok(crate::common::trim_results(rows, args.limit))
    }

    pub async fn find_by_id_for_member(
        id: NotificationId,
        member_id: MemberId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM notifications WHERE id = $1 AND member_id = $2")
            .bind(id)
            .bind(member_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn count_unread(member_id: MemberId, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE member_id = $1 AND read_at IS NULL",
        )
        .bind(member_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_member(member_id: MemberId, unread_only: bool, pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications
             WHERE member_id = $1 AND ($2 = FALSE OR read_at IS NULL)",
        )
        .bind(member_id)
        .bind(unread_only)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Keeps the first read timestamp when called twice.
    pub async fn mark_read(
        id: NotificationId,
        member_id: MemberId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE notifications
             SET read_at = COALESCE(read_at, NOW())
             WHERE id = $1 AND member_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(member_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn mark_all_read(member_id: MemberId, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE member_id = $1 AND read_at IS NULL",
        )
        .bind(member_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(id: NotificationId, member_id: MemberId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND member_id = $2")
            .bind(id)
            .bind(member_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_read_before(cutoff: DateTime<Utc>, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE read_at IS NOT NULL AND created_at < $1",
        )
        .bind(cutoff)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
