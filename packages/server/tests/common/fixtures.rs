//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use blitz_core::common::{ClanId, MemberId};
use blitz_core::domains::achievements::Achievement;
use blitz_core::domains::clans::Clan;
use blitz_core::domains::events::models::EventFields;
use blitz_core::domains::events::Event;
use blitz_core::domains::members::models::CreateMember;
use blitz_core::domains::members::{Member, MemberRole};
use blitz_core::domains::notifications::PushSubscription;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

/// Create a basher with `points` Bash Points and no clan
pub async fn create_basher(pool: &PgPool, login: &str, points: i32) -> Result<Member> {
    let member = Member::create(
        CreateMember::builder()
            .github_username(login)
            .name(format!("{} Basher", capitalize(login)))
            .build(),
        pool,
    )
    .await?;

    set_points(pool, member.id, points).await
}

/// Create an organiser by role
pub async fn create_organiser(pool: &PgPool, login: &str) -> Result<Member> {
    Member::create(
        CreateMember::builder()
            .github_username(login)
            .name(format!("{} Organiser", capitalize(login)))
            .role(MemberRole::Organiser)
            .build(),
        pool,
    )
    .await
}

/// Overwrite a basher's total without writing points history
pub async fn set_points(pool: &PgPool, member_id: MemberId, points: i32) -> Result<Member> {
    sqlx::query_as::<_, Member>("UPDATE members SET bash_points = $2 WHERE id = $1 RETURNING *")
        .bind(member_id)
        .bind(points)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
}

/// Backdate when a basher joined
pub async fn set_joined_at(pool: &PgPool, member_id: MemberId, joined_at: DateTime<Utc>) -> Result<()> {
    sqlx::query("UPDATE members SET joined_at = $2 WHERE id = $1")
        .bind(member_id)
        .bind(joined_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn create_clan(pool: &PgPool, name: &str) -> Result<Clan> {
    Clan::create(name, Some(format!("The {} clan", name)), None, None, pool).await
}

pub async fn join_clan(pool: &PgPool, member_id: MemberId, clan_id: ClanId) -> Result<Member> {
    Member::set_clan(member_id, Some(clan_id), pool).await
}

/// Two-hour event starting `starts_in` from now (negative for past events)
pub async fn create_event(
    pool: &PgPool,
    title: &str,
    starts_in: Duration,
    points: i32,
) -> Result<Event> {
    let starts_at = Utc::now() + starts_in;
    Event::create(
        EventFields {
            title: title.to_string(),
            description: None,
            venue: Some("Lab 3".to_string()),
            starts_at,
            ends_at: starts_at + Duration::hours(2),
            points,
        },
        pool,
    )
    .await
}

pub async fn create_achievement(pool: &PgPool, name: &str, points: i32) -> Result<Achievement> {
    Achievement::create(name, &format!("Awarded for {}", name), None, points, pool).await
}

/// Register a browser push endpoint for a basher
pub async fn subscribe(pool: &PgPool, member_id: MemberId, endpoint: &str) -> Result<PushSubscription> {
    PushSubscription::upsert(member_id, endpoint, "p256dh-key", "auth-secret", pool).await
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
