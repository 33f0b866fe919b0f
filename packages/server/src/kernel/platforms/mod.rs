//! HTTP clients for the external platforms shown on basher profiles.

pub mod discord;
pub mod duolingo;
pub mod github;
pub mod leetcode;

use anyhow::{Context, Result};
use std::time::Duration;

pub use discord::{DiscordClient, DiscordProfile};
pub use duolingo::{DuolingoClient, DuolingoCourse, DuolingoStats};
pub use github::{GithubClient, GithubUser};
pub use leetcode::{LeetCodeClient, LeetCodeStats};

pub const USER_AGENT: &str = "byte-bash-blitz";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared client for every platform call.
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Turn a non-2xx response into an error carrying the body.
pub(crate) async fn ensure_success(
    platform: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!("{} API error {}: {}", platform, status, body)
}
