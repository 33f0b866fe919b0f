use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::ensure_success;
use crate::config::DiscordConfig;
use crate::kernel::BaseDiscordClient;

const API_BASE: &str = "https://discord.com/api/v10";
const CDN_BASE: &str = "https://cdn.discordapp.com";

#[derive(Debug, Clone, PartialEq)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GuildMember {
    user: DiscordUser,
    nick: Option<String>,
    joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    global_name: Option<String>,
    avatar: Option<String>,
}

impl From<GuildMember> for DiscordProfile {
    fn from(member: GuildMember) -> Self {
        let avatar_url = member
            .user
            .avatar
            .as_ref()
            .map(|hash| format!("{}/avatars/{}/{}.png", CDN_BASE, member.user.id, hash));

        Self {
            id: member.user.id,
            username: member.user.username,
            display_name: member.user.global_name,
            nickname: member.nick,
            avatar_url,
            joined_at: member.joined_at,
        }
    }
}

/// Discord REST client authenticated as the club bot
pub struct DiscordClient {
    client: Client,
    config: DiscordConfig,
}

impl DiscordClient {
    pub fn new(client: Client, config: DiscordConfig) -> Self {
        Self { client, config }
    }
}

/// Guild search matches prefixes of usernames and nicknames; keep exact
/// username matches only.
fn pick_member(members: Vec<GuildMember>, username: &str) -> Option<DiscordProfile> {
    members
        .into_iter()
        .find(|m| m.user.username.eq_ignore_ascii_case(username))
        .map(DiscordProfile::from)
}

#[async_trait]
impl BaseDiscordClient for DiscordClient {
    async fn fetch_member(&self, username: &str) -> Result<Option<DiscordProfile>> {
        debug!(username, "Searching Discord guild member");

        let response = self
            .client
            .get(format!(
                "{}/guilds/{}/members/search",
                API_BASE, self.config.guild_id
            ))
            .query(&[("query", username), ("limit", "5")])
            .header("Authorization", format!("Bot {}", self.config.bot_token))
            .send()
            .await?;

        let members: Vec<GuildMember> = ensure_success("Discord", response)
            .await?
            .json()
            .await
            .context("Failed to parse Discord guild members")?;

        Ok(pick_member(members, username))
    }
}
