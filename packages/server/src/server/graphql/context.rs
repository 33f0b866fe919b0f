use std::sync::Arc;

use juniper::{FieldError, FieldResult};
use sqlx::PgPool;

use crate::common::auth::{Actor, AuthError};
use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Shared resources plus the caller resolved by `jwt_auth_middleware`.
#[derive(Clone)]
pub struct GraphQLContext {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(server_deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            db_pool: server_deps.db_pool.clone(),
            server_deps,
            auth_user,
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.server_deps
    }

    pub fn require_auth(&self) -> FieldResult<&AuthUser> {
        self.auth_user
            .as_ref()
            .ok_or_else(|| {
                FieldError::new(
                    AuthError::AuthenticationRequired.to_string(),
                    juniper::Value::null(),
                )
            })
    }

    /// The signed-in caller as an authorization actor.
    pub fn actor(&self) -> FieldResult<Actor> {
        let user = self.require_auth()?;
        Ok(Actor::new(user.member_id, user.is_organiser))
    }
}
