// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::platforms::{DiscordProfile, DuolingoStats, GithubUser, LeetCodeStats};
use super::{
    BaseDiscordClient, BaseDuolingoClient, BaseGithubClient, BaseLeetCodeClient,
    BasePushNotificationService, PushOutcome, PushPayload, PushTarget, ServerDeps,
};
use crate::domains::auth::JwtService;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

// =============================================================================
// Mock Push Notification Service
// =============================================================================

pub struct MockPushNotificationService {
    sent: Arc<Mutex<Vec<(String, PushPayload)>>>,
    gone_endpoints: Arc<Mutex<HashSet<String>>>,
    failing_endpoints: Arc<Mutex<HashSet<String>>>,
}

impl MockPushNotificationService {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            gone_endpoints: Arc::new(Mutex::new(HashSet::new())),
            failing_endpoints: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Answer "gone" for this endpoint, as a push service does after the
    /// browser unsubscribed.
    pub fn with_gone_endpoint(self, endpoint: &str) -> Self {
        self.gone_endpoints.lock().unwrap().insert(endpoint.to_string());
        self
    }

    /// Fail every send to this endpoint
    pub fn with_failing_endpoint(self, endpoint: &str) -> Self {
        self.failing_endpoints.lock().unwrap().insert(endpoint.to_string());
        self
    }

    /// Every push accepted so far, as (endpoint, payload)
    pub fn sent(&self) -> Vec<(String, PushPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn was_sent_with_title(&self, title: &str) -> bool {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .any(|(_, payload)| payload.title == title)
    }
}

impl Default for MockPushNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePushNotificationService for MockPushNotificationService {
    fn public_key(&self) -> Option<String> {
        Some("test-vapid-public-key".to_string())
    }

    async fn send(&self, target: &PushTarget, payload: &PushPayload) -> Result<PushOutcome> {
        if self.failing_endpoints.lock().unwrap().contains(&target.endpoint) {
            return Err(anyhow!("push service unavailable"));
        }
        if self.gone_endpoints.lock().unwrap().contains(&target.endpoint) {
            return Ok(PushOutcome::Gone);
        }

        self.sent
            .lock()
            .unwrap()
            .push((target.endpoint.clone(), payload.clone()));
        Ok(PushOutcome::Delivered)
    }
}

// =============================================================================
// Mock GitHub
// =============================================================================

pub struct MockGithubClient {
    users: Arc<Mutex<HashMap<String, GithubUser>>>,
    oauth_codes: Arc<Mutex<HashMap<String, String>>>,
}

/// A plausible GitHub profile for `login`
pub fn github_user(login: &str) -> GithubUser {
    GithubUser {
        login: login.to_string(),
        name: Some(format!("{} (GitHub)", login)),
        avatar_url: format!("https://avatars.example/{}.png", login),
        html_url: format!("https://github.com/{}", login),
        bio: None,
        public_repos: 12,
        followers: 34,
        following: 5,
        created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
    }
}

impl MockGithubClient {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            oauth_codes: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_user(self, user: GithubUser) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(user.login.to_lowercase(), user);
        self
    }

    /// Accept `code` as an OAuth code signing in `login`
    pub fn with_oauth_code(self, code: &str, login: &str) -> Self {
        self.oauth_codes
            .lock()
            .unwrap()
            .insert(code.to_string(), login.to_string());
        self.with_user(github_user(login))
    }
}

impl Default for MockGithubClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseGithubClient for MockGithubClient {
    async fn fetch_user(&self, username: &str) -> Result<GithubUser> {
        self.users
            .lock()
            .unwrap()
            .get(&username.to_lowercase())
            .cloned()
            .ok_or_else(|| anyhow!("GitHub user {} not found", username))
    }

    async fn exchange_oauth_code(&self, code: &str) -> Result<String> {
        self.oauth_codes
            .lock()
            .unwrap()
            .get(code)
            .map(|login| format!("token-for-{}", login))
            .ok_or_else(|| anyhow!("bad_verification_code"))
    }

    async fn fetch_authenticated_user(&self, access_token: &str) -> Result<GithubUser> {
        let login = access_token
            .strip_prefix("token-for-")
            .ok_or_else(|| anyhow!("Bad credentials"))?;
        self.fetch_user(login).await
    }
}

// =============================================================================
// Mock LeetCode / Duolingo / Discord
// =============================================================================

pub struct MockLeetCodeClient {
    stats: Arc<Mutex<HashMap<String, LeetCodeStats>>>,
}

impl MockLeetCodeClient {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_stats(self, username: &str, stats: LeetCodeStats) -> Self {
        self.stats.lock().unwrap().insert(username.to_string(), stats);
        self
    }
}

impl Default for MockLeetCodeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseLeetCodeClient for MockLeetCodeClient {
    async fn fetch_stats(&self, username: &str) -> Result<LeetCodeStats> {
        self.stats
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| anyhow!("LeetCode user {} not found", username))
    }
}

pub struct MockDuolingoClient {
    stats: Arc<Mutex<HashMap<String, DuolingoStats>>>,
}

impl MockDuolingoClient {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_stats(self, username: &str, stats: DuolingoStats) -> Self {
        self.stats.lock().unwrap().insert(username.to_string(), stats);
        self
    }
}

impl Default for MockDuolingoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDuolingoClient for MockDuolingoClient {
    async fn fetch_stats(&self, username: &str) -> Result<DuolingoStats> {
        self.stats
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| anyhow!("Duolingo user {} not found", username))
    }
}

pub struct MockDiscordClient {
    members: Arc<Mutex<HashMap<String, DiscordProfile>>>,
}

impl MockDiscordClient {
    pub fn new() -> Self {
        Self {
            members: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_member(self, profile: DiscordProfile) -> Self {
        self.members
            .lock()
            .unwrap()
            .insert(profile.username.to_lowercase(), profile);
        self
    }
}

impl Default for MockDiscordClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDiscordClient for MockDiscordClient {
    async fn fetch_member(&self, username: &str) -> Result<Option<DiscordProfile>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&username.to_lowercase())
            .cloned())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub push_service: Arc<MockPushNotificationService>,
    pub github: Arc<MockGithubClient>,
    pub leetcode: Arc<MockLeetCodeClient>,
    pub duolingo: Arc<MockDuolingoClient>,
    pub discord: Option<Arc<MockDiscordClient>>,
    pub organiser_github_usernames: Vec<String>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            push_service: Arc::new(MockPushNotificationService::new()),
            github: Arc::new(MockGithubClient::new()),
            leetcode: Arc::new(MockLeetCodeClient::new()),
            duolingo: Arc::new(MockDuolingoClient::new()),
            discord: Some(Arc::new(MockDiscordClient::new())),
            organiser_github_usernames: Vec::new(),
        }
    }

    pub fn mock_push(mut self, service: MockPushNotificationService) -> Self {
        self.push_service = Arc::new(service);
        self
    }

    pub fn mock_github(mut self, client: MockGithubClient) -> Self {
        self.github = Arc::new(client);
        self
    }

    pub fn mock_leetcode(mut self, client: MockLeetCodeClient) -> Self {
        self.leetcode = Arc::new(client);
        self
    }

    pub fn mock_duolingo(mut self, client: MockDuolingoClient) -> Self {
        self.duolingo = Arc::new(client);
        self
    }

    /// `None` behaves like a server without a Discord bot configured
    pub fn mock_discord(mut self, client: Option<MockDiscordClient>) -> Self {
        self.discord = client.map(Arc::new);
        self
    }

    pub fn organisers(mut self, logins: &[&str]) -> Self {
        self.organiser_github_usernames = logins.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Assemble `ServerDeps` backed by these mocks
    pub fn into_server_deps(self, db_pool: PgPool) -> ServerDeps {
        ServerDeps::new(
            db_pool,
            self.push_service,
            self.github,
            self.leetcode,
            self.duolingo,
            self.discord.map(|d| d as Arc<dyn BaseDiscordClient>),
            Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            self.organiser_github_usernames,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
