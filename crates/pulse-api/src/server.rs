// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::state::AppState;

/// Preflight responses are cacheable for 12 hours.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.state.config);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        Router::new()
            // Health (raw body, no envelope)
            .route("/health", get(handlers::health))
            // Event ingestion
            .route("/api/events/interaction", post(handlers::ingest_interaction))
            .route("/api/events/content", post(handlers::ingest_content))
            .route("/api/events/view", post(handlers::ingest_view))
            .route("/api/events/remix", post(handlers::ingest_remix))
            // Analytics
            .route("/api/analytics/trending", get(handlers::trending))
            .route("/api/analytics/post/{id}/stats", get(handlers::post_stats))
            .route(
                "/api/analytics/user/{id}/recommendations",
                get(handlers::user_recommendations),
            )
            .route(
                "/api/analytics/dashboard/metrics",
                get(handlers::dashboard_metrics),
            )
            .route(
                "/api/analytics/dashboard/top-creators",
                get(handlers::top_creators),
            )
            .route(
                "/api/analytics/dashboard/content-types",
                get(handlers::content_types),
            )
            .route(
                "/api/analytics/dashboard/trends",
                get(handlers::engagement_trends),
            )
            // Admin
            .route("/api/admin/index-posts", post(handlers::index_posts))
            // WebSocket
            .route("/ws", get(handlers::websocket))
            // Middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the shutdown future resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.state.config.socket_addr();
        let router = self.router();

        info!(%addr, "starting API server");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("failed to bind {addr}: {e}")))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("server error: {e}")))?;

        info!("API server shutdown complete");
        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
///
/// A wildcard origin list allows any origin without credentials; an
/// explicit list allows credentials for exactly those origins.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION];

    let layer = CorsLayer::new()
        .allow_methods(methods)
        .allow_headers(headers)
        .max_age(CORS_MAX_AGE);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparsable allowed origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_wildcard() {
        let config = ApiConfig::default();
        let _layer = create_cors_layer(&config);
    }

    #[test]
    fn test_cors_layer_explicit_origins() {
        let config = ApiConfig {
            allowed_origins: vec![
                "https://app.example".to_string(),
                "not a header value\u{0}".to_string(),
            ],
            ..ApiConfig::default()
        };
        let _layer = create_cors_layer(&config);
    }
}
