// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API key middleware for the protected routes.
//!
//! Fail-closed: without a configured key every protected request is refused
//! with 403, whatever headers it carries.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::handlers::ApiError;

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication configuration for the gateway.
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected `X-API-Key` value. `None` (or empty) disables the API.
    pub api_key: Option<String>,
}

impl AuthConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Reject requests whose `X-API-Key` does not match the configured key.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = auth.api_key.as_deref() else {
        tracing::warn!(path = %request.uri().path(), "no API key configured, rejecting request");
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "API disabled: configure api.api_key",
        ));
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided != Some(expected) {
        tracing::debug!(path = %request.uri().path(), "invalid or missing API key");
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized"));
    }

    Ok(next.run(request).await)
}
