use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::ensure_success;
use crate::config::GithubOAuthConfig;
use crate::kernel::BaseGithubClient;

const API_BASE: &str = "https://api.github.com";
const OAUTH_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// Subset of the GitHub user object we show and store.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GithubUser {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: i32,
    #[serde(default)]
    pub followers: i32,
    #[serde(default)]
    pub following: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GitHub REST client
pub struct GithubClient {
    client: Client,
    api_token: Option<String>,
    oauth: Option<GithubOAuthConfig>,
}

impl GithubClient {
    pub fn new(client: Client, api_token: Option<String>, oauth: Option<GithubOAuthConfig>) -> Self {
        Self {
            client,
            api_token,
            oauth,
        }
    }

    async fn get_user(&self, url: String, token: Option<&str>) -> Result<GithubUser> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = ensure_success("GitHub", request.send().await?).await?;
        response
            .json::<GithubUser>()
            .await
            .context("Failed to parse GitHub user")
    }
}

#[async_trait]
impl BaseGithubClient for GithubClient {
    async fn fetch_user(&self, username: &str) -> Result<GithubUser> {
        debug!(username, "Fetching GitHub user");
        let url = format!("{}/users/{}", API_BASE, urlencoding::encode(username));
        self.get_user(url, self.api_token.as_deref()).await
    }

    async fn exchange_oauth_code(&self, code: &str) -> Result<String> {
        let oauth = self
            .oauth
            .as_ref()
            .context("GitHub login is not configured")?;

        info!("Exchanging GitHub OAuth code");

        let response = self
            .client
            .post(OAUTH_TOKEN_URL)
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "client_id": oauth.client_id,
                "client_secret": oauth.client_secret,
                "code": code,
            }))
            .send()
            .await?;

        let body: OAuthTokenResponse = ensure_success("GitHub OAuth", response)
            .await?
            .json()
            .await
            .context("Failed to parse GitHub OAuth response")?;

        match (body.access_token, body.error) {
            (Some(token), None) => Ok(token),
            (_, Some(error)) => anyhow::bail!(
                "GitHub OAuth rejected the code: {} {}",
                error,
                body.error_description.unwrap_or_default()
            ),
            (None, None) => anyhow::bail!("GitHub OAuth returned no access token"),
        }
    }

    async fn fetch_authenticated_user(&self, access_token: &str) -> Result<GithubUser> {
        self.get_user(format!("{}/user", API_BASE), Some(access_token))
            .await
    }
}
