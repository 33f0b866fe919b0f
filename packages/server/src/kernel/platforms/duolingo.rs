use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::ensure_success;
use crate::kernel::BaseDuolingoClient;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DuolingoCourse {
    pub title: String,
    #[serde(default)]
    pub xp: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuolingoStats {
    #[serde(default)]
    pub streak: i32,
    #[serde(default)]
    pub total_xp: i64,
    #[serde(default)]
    pub courses: Vec<DuolingoCourse>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<DuolingoStats>,
}

/// Client for Duolingo's (undocumented) public user endpoint
pub struct DuolingoClient {
    client: Client,
    base_url: String,
}

impl DuolingoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BaseDuolingoClient for DuolingoClient {
    async fn fetch_stats(&self, username: &str) -> Result<DuolingoStats> {
        debug!(username, "Fetching Duolingo stats");

        let response = self
            .client
            .get(format!("{}/2017-06-30/users", self.base_url))
            .query(&[("username", username), ("fields", "streak,totalXp,courses")])
            .send()
            .await?;

        let body: UsersResponse = ensure_success("Duolingo", response)
            .await?
            .json()
            .await
            .context("Failed to parse Duolingo response")?;

        body.users
            .into_iter()
            .next()
            .with_context(|| format!("Duolingo user {} not found", username))
    }
}
