use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::ClanId;

/// A clan bashers compete under - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Clan {
    pub id: ClanId,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Clan with its members' combined standing
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ClanStanding {
    pub id: ClanId,
    pub name: String,
    pub logo_url: Option<String>,
    pub member_count: i32,
    pub total_points: i32,
}

impl Clan {
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clans ORDER BY LOWER(name)")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: ClanId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM clans WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id_optional(id: ClanId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clans WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_name(name: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM clans WHERE LOWER(name) = LOWER($1)")
            .bind(name.trim())
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(
        name: &str,
        description: Option<String>,
        logo_url: Option<String>,
        banner_url: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO clans (id, name, description, logo_url, banner_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(ClanId::new())
        .bind(name)
        .bind(description)
        .bind(logo_url)
        .bind(banner_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update(
        id: ClanId,
        name: &str,
        description: Option<String>,
        logo_url: Option<String>,
        banner_url: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE clans
             SET name = $2, description = $3, logo_url = $4, banner_url = $5
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(logo_url)
        .bind(banner_url)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Members of a deleted clan become clanless (ON DELETE SET NULL).
    pub async fn delete(id: ClanId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Every clan, strongest first. Empty clans stand on zero.
    pub async fn standings(pool: &PgPool) -> Result<Vec<ClanStanding>> {
        sqlx::query_as::<_, ClanStanding>(
            "SELECT c.id, c.name, c.logo_url,
                    COUNT(m.id)::INT AS member_count,
                    COALESCE(SUM(m.bash_points), 0)::INT AS total_points
             FROM clans c
             LEFT JOIN members m ON m.clan_id = c.id
             GROUP BY c.id
             ORDER BY total_points DESC, LOWER(c.name) ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn standing(id: ClanId, pool: &PgPool) -> Result<ClanStanding> {
        sqlx::query_as::<_, ClanStanding>(
            "SELECT c.id, c.name, c.logo_url,
                    COUNT(m.id)::INT AS member_count,
                    COALESCE(SUM(m.bash_points), 0)::INT AS total_points
             FROM clans c
             LEFT JOIN members m ON m.clan_id = c.id
             WHERE c.id = $1
             GROUP BY c.id",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
