use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use super::ensure_success;
use crate::kernel::BaseLeetCodeClient;

/// Solve counts from the LeetCode stats mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct LeetCodeStats {
    pub total_solved: i32,
    pub easy_solved: i32,
    pub medium_solved: i32,
    pub hard_solved: i32,
    pub ranking: Option<i32>,
    pub acceptance_rate: Option<f64>,
    /// Unix seconds (as strings) -> submissions that day
    pub submission_calendar: HashMap<String, i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MirrorResponse {
    status: String,
    message: Option<String>,
    #[serde(default)]
    total_solved: i32,
    #[serde(default)]
    easy_solved: i32,
    #[serde(default)]
    medium_solved: i32,
    #[serde(default)]
    hard_solved: i32,
    ranking: Option<i32>,
    acceptance_rate: Option<f64>,
    #[serde(default)]
    submission_calendar: HashMap<String, i64>,
}

impl TryFrom<MirrorResponse> for LeetCodeStats {
    type Error = anyhow::Error;

    fn try_from(raw: MirrorResponse) -> Result<Self> {
        if raw.status != "success" {
            anyhow::bail!(
                "LeetCode mirror error: {}",
                raw.message.unwrap_or_else(|| raw.status.clone())
            );
        }

        Ok(Self {
            total_solved: raw.total_solved,
            easy_solved: raw.easy_solved,
            medium_solved: raw.medium_solved,
            hard_solved: raw.hard_solved,
            ranking: raw.ranking,
            acceptance_rate: raw.acceptance_rate,
            submission_calendar: raw.submission_calendar,
        })
    }
}

pub struct LeetCodeClient {
    client: Client,
    base_url: String,
}

impl LeetCodeClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BaseLeetCodeClient for LeetCodeClient {
    async fn fetch_stats(&self, username: &str) -> Result<LeetCodeStats> {
        debug!(username, "Fetching LeetCode stats");

        let url = format!("{}/{}", self.base_url, urlencoding::encode(username));
        let response = ensure_success("LeetCode", self.client.get(url).send().await?).await?;
        let raw: MirrorResponse = response
            .json()
            .await
            .context("Failed to parse LeetCode stats")?;

        raw.try_into()
    }
}
