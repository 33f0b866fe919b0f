use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_LEETCODE_API_URL: &str = "https://leetcode-stats-api.herokuapp.com";
pub const DEFAULT_DUOLINGO_API_URL: &str = "https://www.duolingo.com";
pub const DEFAULT_VAPID_SUBJECT: &str = "mailto:admin@bytebashblitz.dev";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
    pub organiser_github_usernames: Vec<String>,
    pub github_oauth: Option<GithubOAuthConfig>,
    pub github_token: Option<String>,
    pub leetcode_api_url: String,
    pub duolingo_api_url: String,
    pub discord: Option<DiscordConfig>,
    pub vapid: Option<VapidConfig>,
    pub scheduler_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct GithubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub guild_id: String,
}

#[derive(Debug, Clone)]
pub struct VapidConfig {
    pub public_key: String,
    pub private_key: String,
    pub subject: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "byte-bash-blitz".to_string()),
            allowed_origins: parse_list(env::var("ALLOWED_ORIGINS").ok()),
            organiser_github_usernames: parse_list(env::var("ORGANISER_GITHUB_USERNAMES").ok()),
            github_oauth: both(
                env::var("GITHUB_CLIENT_ID").ok(),
                env::var("GITHUB_CLIENT_SECRET").ok(),
            )
            .map(|(client_id, client_secret)| GithubOAuthConfig {
                client_id,
                client_secret,
            }),
            github_token: non_empty(env::var("GITHUB_TOKEN").ok()),
            leetcode_api_url: env::var("LEETCODE_API_URL")
                .unwrap_or_else(|_| DEFAULT_LEETCODE_API_URL.to_string()),
            duolingo_api_url: env::var("DUOLINGO_API_URL")
                .unwrap_or_else(|_| DEFAULT_DUOLINGO_API_URL.to_string()),
            discord: both(
                env::var("DISCORD_BOT_TOKEN").ok(),
                env::var("DISCORD_GUILD_ID").ok(),
            )
            .map(|(bot_token, guild_id)| DiscordConfig {
                bot_token,
                guild_id,
            }),
            vapid: both(
                env::var("VAPID_PUBLIC_KEY").ok(),
                env::var("VAPID_PRIVATE_KEY").ok(),
            )
            .map(|(public_key, private_key)| VapidConfig {
                public_key,
                private_key,
                subject: env::var("VAPID_SUBJECT")
                    .unwrap_or_else(|_| DEFAULT_VAPID_SUBJECT.to_string()),
            }),
            scheduler_enabled: parse_bool(env::var("SCHEDULER_ENABLED").ok(), true)
                .context("SCHEDULER_ENABLED must be true or false")?,
        })
    }
}

/// Comma-separated list; blanks dropped.
fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_bool(raw: Option<String>, default: bool) -> Result<bool> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => anyhow::bail!("invalid boolean: {}", v),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty())
}

/// A feature that needs two settings is enabled only when both are present.
fn both(a: Option<String>, b: Option<String>) -> Option<(String, String)> {
    non_empty(a).zip(non_empty(b))
}
