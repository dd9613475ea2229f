// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the wago API.
//!
//! Handles GET /health, POST /send-text, POST /send-otp, GET /messages.

use std::num::IntErrorKind;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use wago_core::types::{MessageId, StoredMessage};
use wago_core::WagoError;

use crate::server::GatewayState;

/// Template used by /send-otp when none is supplied.
pub const DEFAULT_OTP_TEMPLATE: &str = "Kode verifikasi kamu: %s";

/// Shortest accepted recipient number.
pub const MIN_RECIPIENT_DIGITS: usize = 7;

/// Request body for POST /send-text.
#[derive(Debug, Deserialize)]
pub struct SendTextRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub text: String,
}

/// Request body for POST /send-otp.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub code: String,
    /// Must contain `%s`; trimmed, and replaced by the default when blank.
    #[serde(default)]
    pub template: Option<String>,
}

/// Response body for both send endpoints.
#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub message_id: MessageId,
}

/// Query parameters for GET /messages, parsed by hand so that bad numbers
/// produce a JSON 400 instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    pub after: Option<String>,
    pub limit: Option<String>,
    pub chat: Option<String>,
}

/// Response body for GET /messages.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub items: Vec<StoredMessage>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error turned into a `{"error": ...}` response with the given status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<WagoError> for ApiError {
    fn from(err: WagoError) -> Self {
        let status = match err {
            WagoError::Transport { .. } | WagoError::Timeout { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

/// GET /health (unauthenticated).
pub async fn get_health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// POST /send-text
pub async fn post_send_text(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<SendResponse>, ApiError> {
    let req: SendTextRequest = parse_body(&body)?;
    if req.to.is_empty() || req.text.is_empty() {
        return Err(ApiError::bad_request("`to` and `text` are required"));
    }
    validate_recipient(&req.to)?;

    let message_id = send(&state, &req.to, &req.text).await?;
    Ok(Json(SendResponse { message_id }))
}

/// POST /send-otp
pub async fn post_send_otp(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<SendResponse>, ApiError> {
    let req: SendOtpRequest = parse_body(&body)?;
    if req.to.is_empty() || req.code.is_empty() {
        return Err(ApiError::bad_request("`to` and `code` are required"));
    }
    validate_recipient(&req.to)?;
    let text = render_otp(req.template.as_deref(), &req.code)?;

    let message_id = send(&state, &req.to, &text).await?;
    Ok(Json(SendResponse { message_id }))
}

/// GET /messages?after=<id>&limit=<n>&chat=<chat>
pub async fn get_messages(
    State(state): State<GatewayState>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let after = match non_blank(query.after.as_deref()) {
        None => 0,
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            ApiError::bad_request(format!("`after` must be a non-negative integer, got `{raw}`"))
        })?,
    };
    let limit = match non_blank(query.limit.as_deref()) {
        None => wago_store::DEFAULT_PAGE_LIMIT as i64,
        Some(raw) => parse_limit(raw)?,
    };

    let items = state.store.after(after, limit, query.chat.as_deref());
    Ok(Json(MessagesResponse { items }))
}

/// Integers too large for `i64` are out of range like any other, so they
/// get the default page size.
fn parse_limit(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(limit) => Ok(limit),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(wago_store::DEFAULT_PAGE_LIMIT as i64)
        }
        Err(_) => Err(ApiError::bad_request(format!(
            "`limit` must be an integer, got `{raw}`"
        ))),
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

/// Recipients are bare international numbers: digits only, no `+`.
pub fn validate_recipient(to: &str) -> Result<(), ApiError> {
    if to.len() >= MIN_RECIPIENT_DIGITS && to.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "`to` must be at least {MIN_RECIPIENT_DIGITS} digits without `+`"
        )))
    }
}

/// Substitute `code` for the first `%s` in `template`.
pub fn render_otp(template: Option<&str>, code: &str) -> Result<String, ApiError> {
    let template = template
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_OTP_TEMPLATE);
    if !template.contains("%s") {
        return Err(ApiError::bad_request("`template` must contain `%s`"));
    }
    Ok(template.replacen("%s", code, 1))
}

async fn send(state: &GatewayState, to: &str, text: &str) -> Result<MessageId, ApiError> {
    let result = tokio::time::timeout(state.send_timeout, state.transport.send_text(to, text))
        .await
        .unwrap_or(Err(WagoError::Timeout {
            duration: state.send_timeout,
        }));

    result.map_err(|e| {
        tracing::warn!(%to, error = %e, "outbound send failed");
        ApiError::from(e)
    })
}
