//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::{jwt_auth_middleware, AuthUser};
use crate::server::routes::{graphql_batch_handler, graphql_handler, health_handler};

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(deps): Extension<Arc<ServerDeps>>,
    mut request: Request,
    next: Next,
) -> Response {
    // Populated by jwt_auth_middleware
    let auth_user = request.extensions().get::<AuthUser>().cloned();

    let context = GraphQLContext::new(deps, auth_user);
    request.extensions_mut().insert(context);

    next.run(request).await
}

/// Any origin when none are configured, otherwise only the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()`; the
/// rate limiter falls back to the peer address when no proxy header is set.
pub fn build_app(deps: Arc<ServerDeps>, allowed_origins: &[String]) -> Result<Router> {
    let schema = Arc::new(create_schema());
    let jwt_service = deps.jwt_service.clone();

    // 10 requests per second per client IP, bursts up to 20
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .context("Invalid rate limiter configuration")?,
    );

    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let mut router = Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/graphql/batch", post(graphql_batch_handler));

    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(crate::server::routes::graphql_playground));
    }

    let app = router
        .layer(middleware::from_fn(create_graphql_context))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(rate_limit_layer)
        // Health check is not rate limited
        .route("/health", get(health_handler))
        .layer(Extension(deps))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(schema);

    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN};
    use tower::ServiceExt;

    async fn preflight(allowed_origins: &[String], origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/graphql", post(|| async { "ok" }))
            .layer(cors_layer(allowed_origins));

        let request = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/graphql")
            .header(ORIGIN, origin)
            .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn listed_origin_is_allowed() {
        let origins = vec!["https://bytebashblitz.dev".to_string()];
        assert_eq!(
            preflight(&origins, "https://bytebashblitz.dev").await,
            Some(HeaderValue::from_static("https://bytebashblitz.dev"))
        );
        assert_eq!(preflight(&origins, "https://elsewhere.example").await, None);
    }

    #[tokio::test]
    async fn no_configured_origins_allows_any() {
        assert_eq!(
            preflight(&[], "https://elsewhere.example").await,
            Some(HeaderValue::from_static("*"))
        );
    }

    #[tokio::test]
    async fn invalid_origins_are_skipped() {
        let origins = vec!["bad\norigin".to_string(), "https://bytebashblitz.dev".to_string()];
        assert_eq!(
            preflight(&origins, "https://bytebashblitz.dev").await,
            Some(HeaderValue::from_static("https://bytebashblitz.dev"))
        );
    }
}
