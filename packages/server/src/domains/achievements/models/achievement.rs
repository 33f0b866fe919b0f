use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::AchievementId;

/// A badge bashers can unlock - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    /// Bonus Bash Points granted on unlock
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct AchievementWithCount {
    #[sqlx(flatten)]
    pub achievement: Achievement,
    pub unlock_count: i32,
}

impl Achievement {
    pub async fn find_all_with_counts(pool: &PgPool) -> Result<Vec<AchievementWithCount>> {
        sqlx::query_as::<_, AchievementWithCount>(
            "SELECT a.*, COUNT(ma.member_id)::INT AS unlock_count
             FROM achievements a
             LEFT JOIN member_achievements ma ON ma.achievement_id = a.id
             GROUP BY a.id
             ORDER BY LOWER(a.name)",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id_optional(id: AchievementId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM achievements WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM achievements WHERE LOWER(name) = LOWER($1)")
            .bind(name.trim())
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(
        name: &str,
        description: &str,
        icon: Option<String>,
        points: i32,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO achievements (id, name, description, icon, points)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(AchievementId::new())
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(points)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: AchievementId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM achievements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
