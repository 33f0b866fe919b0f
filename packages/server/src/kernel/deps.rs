//! Server dependencies for actions (using traits for testability)
//!
//! Every external service sits behind a `Base*` trait so integration tests
//! can run the real actions against mocks.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

use crate::common::auth::HasAuthContext;
use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::platforms::{
    http_client, DiscordClient, DuolingoClient, GithubClient, LeetCodeClient,
};
use crate::kernel::web_push::{DisabledPushService, WebPushService};
use crate::kernel::{
    BaseDiscordClient, BaseDuolingoClient, BaseGithubClient, BaseLeetCodeClient,
    BasePushNotificationService,
};

#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub push_service: Arc<dyn BasePushNotificationService>,
    pub github: Arc<dyn BaseGithubClient>,
    pub leetcode: Arc<dyn BaseLeetCodeClient>,
    pub duolingo: Arc<dyn BaseDuolingoClient>,
    /// `None` unless a bot token and guild are configured
    pub discord: Option<Arc<dyn BaseDiscordClient>>,
    pub jwt_service: Arc<JwtService>,
    pub organiser_github_usernames: Vec<String>,
}

impl ServerDeps {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db_pool: PgPool,
        push_service: Arc<dyn BasePushNotificationService>,
        github: Arc<dyn BaseGithubClient>,
        leetcode: Arc<dyn BaseLeetCodeClient>,
        duolingo: Arc<dyn BaseDuolingoClient>,
        discord: Option<Arc<dyn BaseDiscordClient>>,
        jwt_service: Arc<JwtService>,
        organiser_github_usernames: Vec<String>,
    ) -> Self {
        Self {
            db_pool,
            push_service,
            github,
            leetcode,
            duolingo,
            discord,
            jwt_service,
            organiser_github_usernames,
        }
    }

    /// Wire the production clients described by `config`.
    pub fn from_config(db_pool: PgPool, config: &Config) -> Result<Self> {
        let client = http_client()?;

        let push_service: Arc<dyn BasePushNotificationService> = match config.vapid.clone() {
            Some(vapid) => Arc::new(WebPushService::new(vapid)?),
            None => {
                info!("VAPID keys not configured, push notifications disabled");
                Arc::new(DisabledPushService)
            }
        };

        let discord: Option<Arc<dyn BaseDiscordClient>> = match config.discord.clone() {
            Some(discord) => Some(Arc::new(DiscordClient::new(client.clone(), discord))),
            None => {
                info!("Discord bot not configured, Discord stats disabled");
                None
            }
        };

        Ok(Self::new(
            db_pool,
            push_service,
            Arc::new(GithubClient::new(
                client.clone(),
                config.github_token.clone(),
                config.github_oauth.clone(),
            )),
            Arc::new(LeetCodeClient::new(
                client.clone(),
                config.leetcode_api_url.clone(),
            )),
            Arc::new(DuolingoClient::new(client, config.duolingo_api_url.clone())),
            discord,
            Arc::new(JwtService::new(
                &config.jwt_secret,
                config.jwt_issuer.clone(),
            )),
            config.organiser_github_usernames.clone(),
        ))
    }
}

impl HasAuthContext for ServerDeps {
    fn organiser_github_usernames(&self) -> &[String] {
        &self.organiser_github_usernames
    }
}
