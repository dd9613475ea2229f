// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the API.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use wago_core::{MessagingTransport, WagoError};
use wago_store::EventStore;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// How long in-flight requests may take to finish after shutdown begins.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Outbound messaging client.
    pub transport: Arc<dyn MessagingTransport>,
    /// Inbound messages served by GET /messages.
    pub store: Arc<EventStore>,
    pub auth: AuthConfig,
    /// Bound on a single outbound send.
    pub send_timeout: Duration,
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the API router.
///
/// - GET /health (public)
/// - POST /send-text, POST /send-otp, GET /messages (API key)
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::get_health));

    let api_routes = Router::new()
        .route("/send-text", post(handlers::post_send_text))
        .route("/send-otp", post(handlers::post_send_otp))
        .route("/messages", get(handlers::get_messages))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(api_routes)
}

/// Bind and serve until `shutdown` fires.
///
/// `extra` is merged into the app unauthenticated; the transport's inbound
/// callback lives there. After cancellation in-flight requests get
/// [`SHUTDOWN_GRACE`] to complete before the server is dropped.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    extra: Router,
    shutdown: CancellationToken,
) -> Result<(), WagoError> {
    let app = build_router(state)
        .merge(extra)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| WagoError::Server {
            message: format!("failed to bind {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("API server listening on {addr}");

    let graceful = {
        let shutdown = shutdown.clone();
        async move { shutdown.cancelled().await }
    };
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(graceful)
        .into_future();
    let deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    };

    tokio::select! {
        result = server => result.map_err(|e| WagoError::Server {
            message: format!("server error: {e}"),
            source: Some(Box::new(e)),
        })?,
        _ = deadline => {
            tracing::warn!(grace = ?SHUTDOWN_GRACE, "in-flight requests did not finish, closing");
        }
    }

    tracing::info!("API server stopped");
    Ok(())
}
