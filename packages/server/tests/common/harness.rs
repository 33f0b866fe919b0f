//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary. Each harness
//! gets its own freshly migrated database inside it, so leaderboards and
//! broadcasts only ever see the rows their own test created.

use anyhow::{Context, Result};
use blitz_core::domains::auth::actions::is_organiser;
use blitz_core::domains::members::Member;
use blitz_core::kernel::test_dependencies::{MockPushNotificationService, TestDependencies};
use blitz_core::kernel::ServerDeps;
use blitz_core::server::middleware::AuthUser;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::GraphQLClient;

/// Shared test infrastructure that persists across all tests.
struct SharedTestInfra {
    server_url: String,
    admin_pool: PgPool,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=300"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let server_url = format!("postgresql://postgres:postgres@{}:{}", pg_host, pg_port);

        let admin_pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&format!("{}/postgres", server_url))
            .await
            .context("Failed to connect to Postgres")?;

        Ok(Self {
            server_url,
            admin_pool,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }

    /// Create and migrate a database private to one test.
    async fn fresh_database(&self) -> Result<PgPool> {
        let name = format!("blitz_test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE DATABASE {}", name))
            .execute(&self.admin_pool)
            .await
            .context("Failed to create test database")?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&format!("{}/{}", self.server_url, name))
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(pool)
    }
}

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let client = ctx.graphql();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Database pool - use this for test fixtures.
    pub db_pool: PgPool,
    /// Dependencies handed to every action and resolver.
    pub deps: Arc<ServerDeps>,
    /// The push service inside `deps`, for asserting on deliveries.
    pub push: Arc<MockPushNotificationService>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl TestHarness {
    /// Harness with default mocks: every platform answers "not found",
    /// push accepts everything.
    pub async fn new() -> Result<Self> {
        Self::with_dependencies(TestDependencies::new()).await
    }

    pub async fn with_dependencies(test_deps: TestDependencies) -> Result<Self> {
        let infra = SharedTestInfra::get().await;
        let db_pool = infra.fresh_database().await?;

        let push = test_deps.push_service.clone();
        let deps = Arc::new(test_deps.into_server_deps(db_pool.clone()));

        Ok(Self {
            db_pool,
            deps,
            push,
        })
    }

    /// Anonymous GraphQL client.
    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(self.deps.clone(), None)
    }

    /// GraphQL client signed in as `member`, with the same organiser
    /// status a freshly issued token would carry.
    pub fn graphql_as(&self, member: &Member) -> GraphQLClient {
        let auth_user = AuthUser {
            member_id: member.id,
            github_username: member.github_username.clone(),
            is_organiser: is_organiser(member, self.deps.as_ref()),
        };
        GraphQLClient::new(self.deps.clone(), Some(auth_user))
    }
}
