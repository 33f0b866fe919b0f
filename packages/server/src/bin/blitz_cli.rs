//! Operator CLI
//!
//! Shell access to the few operations that are needed before anyone can
//! sign in: running migrations, minting a session token for a basher and
//! awarding points. Every command prints one JSON object.

use anyhow::{Context, Result};
use blitz_core::config::Config;
use blitz_core::domains::auth::actions::{is_organiser, issue_session_token};
use blitz_core::domains::members::actions::{announce_promotion, record_points};
use blitz_core::domains::members::Member;
use blitz_core::kernel::ServerDeps;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "blitz_cli")]
#[command(about = "Byte Bash Blitz operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the embedded database migrations
    Migrate,

    /// Print a session token for an existing basher
    IssueToken { github_username: String },

    /// Award (or with a negative value, deduct) Bash Points
    AwardPoints {
        github_username: String,
        #[arg(allow_hyphen_values = true)]
        points: i32,
        reason: String,
    },
}

#[derive(Serialize)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bash_points: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<String>,
}

impl Response {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            token: None,
            bash_points: None,
            tier: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }

    fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string(self)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let result = match cli.command {
        Commands::Migrate => cmd_migrate(&pool).await,
        Commands::IssueToken { github_username } => {
            cmd_issue_token(&github_username, pool, &config).await
        }
        Commands::AwardPoints {
            github_username,
            points,
            reason,
        } => cmd_award_points(&github_username, points, &reason, pool, &config).await,
    };

    match result {
        Ok(response) => response.print(),
        Err(e) => {
            Response::error(format!("{:#}", e)).print()?;
            std::process::exit(1);
        }
    }
}

async fn cmd_migrate(pool: &PgPool) -> Result<Response> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    Ok(Response::ok("Migrations complete"))
}

async fn find_basher(github_username: &str, pool: &PgPool) -> Result<Member> {
    Member::find_by_github_username(github_username, pool)
        .await?
        .with_context(|| format!("No basher with GitHub username {}", github_username))
}

async fn cmd_issue_token(github_username: &str, pool: PgPool, config: &Config) -> Result<Response> {
    let member = find_basher(github_username, &pool).await?;
    let deps = ServerDeps::from_config(pool, config)?;

    let token = issue_session_token(&member, &deps)?;
    let role = if is_organiser(&member, &deps) {
        "organiser"
    } else {
        "basher"
    };

    Ok(Response {
        token: Some(token),
        ..Response::ok(format!("Token issued for {} ({})", member.github_username, role))
    })
}

async fn cmd_award_points(
    github_username: &str,
    points: i32,
    reason: &str,
    pool: PgPool,
    config: &Config,
) -> Result<Response> {
    if points == 0 {
        anyhow::bail!("Points must not be zero");
    }
    if reason.trim().is_empty() {
        anyhow::bail!("A reason is required");
    }

    let member = find_basher(github_username, &pool).await?;
    let deps = ServerDeps::from_config(pool, config)?;

    let mut tx = deps.db_pool.begin().await?;
    let change = record_points(member.id, points, reason.trim(), None, &mut tx).await?;
    tx.commit().await?;

    announce_promotion(&change, &deps).await;

    Ok(Response {
        bash_points: Some(change.member.bash_points),
        tier: Some(change.tier().to_string()),
        ..Response::ok(format!("{} Bash Points recorded for {}", points, member.github_username))
    })
}
