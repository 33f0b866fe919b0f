use crate::common::MemberId;
use crate::domains::auth::JwtService;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Authenticated basher taken from a session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub member_id: MemberId,
    pub github_username: String,
    pub is_organiser: bool,
}

/// JWT authentication middleware
///
/// Verifies the bearer token and stores an `AuthUser` in the request
/// extensions. Missing or invalid tokens fall through as public access.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!(
            "Authenticated basher: {} (organiser: {})",
            user.github_username, user.is_organiser
        );
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // "Bearer <token>" or the raw token
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthUser {
        member_id: MemberId::from_uuid(claims.member_id),
        github_username: claims.github_username,
        is_organiser: claims.is_organiser,
    })
}
