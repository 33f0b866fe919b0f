use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::kernel::ServerDeps;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database: DatabaseHealth,
    connection_pool: ConnectionPoolHealth,
    integrations: IntegrationHealth,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
pub struct ConnectionPoolHealth {
    size: u32,
    idle_connections: usize,
    max_connections: u32,
}

/// Which optional integrations are configured. Informational only.
#[derive(Serialize)]
pub struct IntegrationHealth {
    web_push: bool,
    discord: bool,
}

/// Health check endpoint
///
/// 200 when the database answers within 5 seconds, 503 otherwise.
pub async fn health_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_health = match tokio::time::timeout(
        std::time::Duration::from_secs(5),
        sqlx::query("SELECT 1").execute(&deps.db_pool),
    )
    .await
    {
        Ok(Ok(_)) => DatabaseHealth {
            status: "ok".to_string(),
            error: None,
        },
        Ok(Err(e)) => DatabaseHealth {
            status: "error".to_string(),
            error: Some(format!("Query failed: {}", e)),
        },
        Err(_) => DatabaseHealth {
            status: "error".to_string(),
            error: Some("Query timeout (>5s)".to_string()),
        },
    };

    let connection_pool = ConnectionPoolHealth {
        size: deps.db_pool.size(),
        idle_connections: deps.db_pool.num_idle(),
        max_connections: deps.db_pool.options().get_max_connections(),
    };

    let integrations = IntegrationHealth {
        web_push: deps.push_service.public_key().is_some(),
        discord: deps.discord.is_some(),
    };

    let is_healthy = db_health.status == "ok";
    let (status_code, status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            database: db_health,
            connection_pool,
            integrations,
        }),
    )
}
