// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Domain actions depend on these so tests can swap in the mocks from
// `test_dependencies`.
//
// Naming convention: Base* for trait names (e.g., BaseGithubClient)

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::kernel::platforms::{DiscordProfile, DuolingoStats, GithubUser, LeetCodeStats};

// =============================================================================
// Push Notification Trait (Infrastructure)
// =============================================================================

/// A browser push subscription as stored for a basher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// JSON body delivered to the service worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// The push service no longer knows this subscription (404/410).
    Gone,
}

#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    /// Public VAPID key handed to browsers; `None` when push is disabled.
    fn public_key(&self) -> Option<String>;

    async fn send(&self, target: &PushTarget, payload: &PushPayload) -> Result<PushOutcome>;
}

// =============================================================================
// External platform traits
// =============================================================================

#[async_trait]
pub trait BaseGithubClient: Send + Sync {
    /// Public profile of any GitHub user
    async fn fetch_user(&self, username: &str) -> Result<GithubUser>;

    /// Swap an OAuth authorization code for an access token
    async fn exchange_oauth_code(&self, code: &str) -> Result<String>;

    /// Profile of the user owning `access_token`
    async fn fetch_authenticated_user(&self, access_token: &str) -> Result<GithubUser>;
}

#[async_trait]
pub trait BaseLeetCodeClient: Send + Sync {
    async fn fetch_stats(&self, username: &str) -> Result<LeetCodeStats>;
}

#[async_trait]
pub trait BaseDuolingoClient: Send + Sync {
    async fn fetch_stats(&self, username: &str) -> Result<DuolingoStats>;
}

#[async_trait]
pub trait BaseDiscordClient: Send + Sync {
    /// Guild member matching `username`, `None` if they are not in the guild
    async fn fetch_member(&self, username: &str) -> Result<Option<DiscordProfile>>;
}
