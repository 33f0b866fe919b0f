use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::{MemberId, PushSubscriptionId};
use crate::kernel::PushTarget;

/// Browser push subscription registered by a basher
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PushSubscription {
    pub id: PushSubscriptionId,
    pub member_id: MemberId,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    pub fn target(&self) -> PushTarget {
        PushTarget {
            endpoint: self.endpoint.clone(),
            p256dh: self.p256dh.clone(),
            auth: self.auth.clone(),
        }
    }

    /// Endpoints are unique; re-subscribing moves the endpoint to the caller
    /// and refreshes its keys.
    pub async fn upsert(
        member_id: MemberId,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO push_subscriptions (id, member_id, endpoint, p256dh, auth)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (endpoint) DO UPDATE
             SET member_id = EXCLUDED.member_id,
                 p256dh = EXCLUDED.p256dh,
                 auth = EXCLUDED.auth
             RETURNING *",
        )
        .bind(PushSubscriptionId::new())
        .bind(member_id)
        .bind(endpoint)
        .bind(p256dh)
        .bind(auth)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_member(member_id: MemberId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM push_subscriptions WHERE member_id = $1 ORDER BY created_at",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_members(member_ids: &[MemberId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM push_subscriptions WHERE member_id = ANY($1)")
            .bind(member_ids)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn delete_for_member(endpoint: &str, member_id: MemberId, pool: &PgPool) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = $1 AND member_id = $2")
                .bind(endpoint)
                .bind(member_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_endpoints(endpoints: &[String], pool: &PgPool) -> Result<u64> {
        if endpoints.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM push_subscriptions WHERE endpoint = ANY($1)")
            .bind(endpoints)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
