use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::common::{AchievementId, MemberId};
use crate::domains::achievements::models::Achievement;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct MemberAchievement {
    pub member_id: MemberId,
    pub achievement_id: AchievementId,
    pub points_awarded: i32,
    pub unlocked_at: DateTime<Utc>,
}

/// An achievement together with when a basher unlocked it
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct UnlockedAchievement {
    #[sqlx(flatten)]
    pub achievement: Achievement,
    pub unlocked_at: DateTime<Utc>,
}

impl MemberAchievement {
    /// `None` when the basher already holds the achievement.
    pub async fn insert_if_missing(
        member_id: MemberId,
        achievement_id: AchievementId,
        points_awarded: i32,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO member_achievements (member_id, achievement_id, points_awarded)
             VALUES ($1, $2, $3)
             ON CONFLICT (member_id, achievement_id) DO NOTHING
             RETURNING *",
        )
        .bind(member_id)
        .bind(achievement_id)
        .bind(points_awarded)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find(
        member_id: MemberId,
        achievement_id: AchievementId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM member_achievements WHERE member_id = $1 AND achievement_id = $2",
        )
        .bind(member_id)
        .bind(achievement_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(
        member_id: MemberId,
        achievement_id: AchievementId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "DELETE FROM member_achievements
             WHERE member_id = $1 AND achievement_id = $2
             RETURNING *",
        )
        .bind(member_id)
        .bind(achievement_id)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    /// Most recent unlock first
    pub async fn find_for_member(member_id: MemberId, pool: &PgPool) -> Result<Vec<UnlockedAchievement>> {
        sqlx::query_as::<_, UnlockedAchievement>(
            "SELECT a.*, ma.unlocked_at
             FROM member_achievements ma
             JOIN achievements a ON a.id = ma.achievement_id
             WHERE ma.member_id = $1
             ORDER BY ma.unlocked_at DESC",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
