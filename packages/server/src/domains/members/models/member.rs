use anyhow::Result;
use chrono::{DateTime, Utc};
use juniper::GraphQLEnum;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{ClanId, MemberId, ValidatedPaginationArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, GraphQLEnum)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Basher,
    Organiser,
}

/// A basher - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Member {
    pub id: MemberId,
    pub github_username: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub title: Option<String>,
    pub role: MemberRole,
    pub bash_points: i32,
    pub clan_id: Option<ClanId>,

    // External platform handles
    pub leetcode_username: Option<String>,
    pub duolingo_username: Option<String>,
    pub discord_username: Option<String>,

    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct CreateMember {
    pub github_username: String,
    pub name: String,
    #[builder(default)]
    pub avatar_url: Option<String>,
    #[builder(default)]
    pub bio: Option<String>,
    #[builder(default)]
    pub title: Option<String>,
    #[builder(default = MemberRole::Basher)]
    pub role: MemberRole,
    #[builder(default)]
    pub clan_id: Option<ClanId>,
    #[builder(default)]
    pub leetcode_username: Option<String>,
    #[builder(default)]
    pub duolingo_username: Option<String>,
    #[builder(default)]
    pub discord_username: Option<String>,
}

/// Fields a basher may edit on their own profile. Every field is written;
/// `None` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub bio: Option<String>,
    pub title: Option<String>,
    pub avatar_url: Option<String>,
    pub leetcode_username: Option<String>,
    pub duolingo_username: Option<String>,
    pub discord_username: Option<String>,
}

impl Member {
    pub fn is_organiser(&self) -> bool {
        self.role == MemberRole::Organiser
    }

    pub async fn find_by_id(id: MemberId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id_optional(id: MemberId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// GitHub logins are case-insensitive
    pub async fn find_by_github_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members WHERE LOWER(github_username) = LOWER($1)",
        )
        .bind(username.trim())
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Leaderboard order: points first, name breaks ties
    pub async fn find_all_by_points(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members ORDER BY bash_points DESC, LOWER(name) ASC, id ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_clan(clan_id: ClanId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM members WHERE clan_id = $1
             ORDER BY bash_points DESC, LOWER(name) ASC, id ASC",
        )
        .bind(clan_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_ids(ids: &[MemberId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn all_ids(pool: &PgPool) -> Result<Vec<MemberId>> {
        sqlx::query_scalar::<_, MemberId>("SELECT id FROM members")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Members in join order (v7 ids), Relay cursor pagination
    pub async fn find_paginated(
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> Result<(Vec<Self>, bool)> {
        let rows = if args.is_forward() {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM members
                 WHERE ($1::uuid IS NULL OR id > $1)
                 ORDER BY id ASC
                 LIMIT $2",
            )
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?
        } else {
            let mut rows = sqlx::query_as::<_, Self>(
                "SELECT * FROM members
                 WHERE ($1::uuid IS NULL OR id < $1)
                 ORDER BY id DESC
                 LIMIT $2",
            )
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

    pub async fn count(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(input: CreateMember, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO members (
                id, github_username, name, avatar_url, bio, title, role, clan_id,
                leetcode_username, duolingo_username, discord_username
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(MemberId::new())
        .bind(input.github_username.trim())
        .bind(input.name)
        .bind(input.avatar_url)
        .bind(input.bio)
        .bind(input.title)
        .bind(input.role)
        .bind(input.clan_id)
        .bind(input.leetcode_username)
        .bind(input.duolingo_username)
        .bind(input.discord_username)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_profile(id: MemberId, update: ProfileUpdate, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE members
             SET name = $2,
                 bio = $3,
                 title = $4,
                 avatar_url = $5,
                 leetcode_username = $6,
                 duolingo_username = $7,
                 discord_username = $8,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update.name)
        .bind(update.bio)
        .bind(update.title)
        .bind(update.avatar_url)
        .bind(update.leetcode_username)
        .bind(update.duolingo_username)
        .bind(update.discord_username)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_role(id: MemberId, role: MemberRole, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn update_github_username(id: MemberId, username: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET github_username = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(username.trim())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_clan(id: MemberId, clan_id: Option<ClanId>, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE members SET clan_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(clan_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Apply a signed points delta inside the caller's transaction
    pub async fn add_points(id: MemberId, delta: i32, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE members
             SET bash_points = bash_points + $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(delta)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: MemberId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_basher() {
        let input = CreateMember::builder()
            .github_username("octocat")
            .name("Mona")
            .build();

        assert_eq!(input.role, MemberRole::Basher);
        assert!(input.clan_id.is_none());
        assert!(input.leetcode_username.is_none());
    }

    #[test]
    fn organiser_role_check() {
        let member = Member {
            id: MemberId::new(),
            github_username: "octocat".into(),
            name: "Mona".into(),
            avatar_url: None,
            bio: None,
            title: None,
            role: MemberRole::Organiser,
            bash_points: 0,
            clan_id: None,
            leetcode_username: None,
            duolingo_username: None,
            discord_username: None,
            joined_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(member.is_organiser());
    }
}
