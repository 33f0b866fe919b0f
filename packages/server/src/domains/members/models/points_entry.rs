use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::{MemberId, PointsEntryId};

/// One line in a basher's Bash Points ledger
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PointsEntry {
    pub id: PointsEntryId,
    pub member_id: MemberId,
    pub points: i32,
    pub reason: String,
    /// `None` for system awards (attendance, achievements)
    pub awarded_by: Option<MemberId>,
    pub created_at: DateTime<Utc>,
}

impl PointsEntry {
    pub async fn create(
        member_id: MemberId,
        points: i32,
        reason: &str,
        awarded_by: Option<MemberId>,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO points_history (id, member_id, points, reason, awarded_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(PointsEntryId::new())
        .bind(member_id)
        .bind(points)
        .bind(reason)
        .bind(awarded_by)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_by_member(member_id: MemberId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM points_history WHERE member_id = $1 ORDER BY id DESC LIMIT $2",
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
