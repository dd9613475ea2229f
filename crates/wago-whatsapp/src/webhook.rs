// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback endpoint Meta calls with inbound messages.
//!
//! `GET` answers the subscription handshake, `POST` carries message
//! notifications signed with the app secret in `X-Hub-Signature-256`.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use wago_core::types::TransportEvent;
use wago_webhook::verify_signature;

use crate::types::WebhookPayload;

/// Route the callback is mounted at.
pub const WEBHOOK_PATH: &str = "/whatsapp/webhook";

/// Header carrying `sha256=<hex>` of the raw body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

#[derive(Clone)]
pub(crate) struct WebhookState {
    pub verify_token: Option<Arc<str>>,
    pub app_secret: Option<Arc<str>>,
    pub events: mpsc::Sender<TransportEvent>,
}

pub(crate) fn router(state: WebhookState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, get(verify_subscription).post(receive_notification))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct HandshakeQuery {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// GET: echo `hub.challenge` when the mode and verify token match.
async fn verify_subscription(
    State(state): State<WebhookState>,
    Query(query): Query<HandshakeQuery>,
) -> Response {
    let expected = state.verify_token.as_deref().filter(|t| !t.is_empty());
    match (expected, query.mode.as_deref(), query.verify_token.as_deref(), query.challenge) {
        (Some(expected), Some("subscribe"), Some(given), Some(challenge)) if given == expected => {
            debug!("webhook subscription verified");
            (StatusCode::OK, challenge).into_response()
        }
        _ => {
            warn!("rejected webhook subscription handshake");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// POST: verify the signature, then forward each message to the pump.
async fn receive_notification(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(secret) = state.app_secret.as_deref().filter(|s| !s.is_empty()) {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("sha256="));
        match signature {
            Some(sig) if verify_signature(secret, &body, sig) => {}
            _ => {
                warn!("webhook notification with missing or invalid signature");
                return StatusCode::UNAUTHORIZED;
            }
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "malformed webhook notification");
            return StatusCode::BAD_REQUEST;
        }
    };

    let now = Utc::now();
    for message in payload.messages() {
        debug!(message_id = %message.id, kind = %message.type_, "inbound cloud api message");
        if state
            .events
            .send(TransportEvent::Message(message.to_event(now)))
            .await
            .is_err()
        {
            warn!("inbound event receiver dropped, refusing notification");
            return StatusCode::SERVICE_UNAVAILABLE;
        }
    }

    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wago_webhook::sign_payload;

    use super::*;

    const PAYLOAD: &str = r#"{"object":"whatsapp_business_account","entry":[{"id":"1","changes":[{"field":"messages","value":{"messaging_product":"whatsapp","messages":[{"from":"6281234567","id":"wamid.1","timestamp":"1767225600","type":"text","text":{"body":"!ping"}}]}}]}]}"#;

    fn app(
        verify_token: Option<&str>,
        app_secret: Option<&str>,
    ) -> (Router, mpsc::Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel(8);
        let router = router(WebhookState {
            verify_token: verify_token.map(Arc::from),
            app_secret: app_secret.map(Arc::from),
            events: tx,
        });
        (router, rx)
    }

    fn handshake(query: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("{WEBHOOK_PATH}?{query}"))
            .body(Body::empty())
            .unwrap()
    }

    fn notification(body: &str, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(WEBHOOK_PATH)
            .header("content-type", "application/json");
        if let Some(sig) = signature {
            builder = builder.header(SIGNATURE_HEADER, sig);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn handshake_echoes_challenge() {
        let (app, _rx) = app(Some("verify-me"), None);
        let resp = app
            .oneshot(handshake(
                "hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=1158201444",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"1158201444");
    }

    #[tokio::test]
    async fn handshake_rejects_wrong_token_or_mode() {
        for query in [
            "hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1",
            "hub.mode=unsubscribe&hub.verify_token=verify-me&hub.challenge=1",
            "hub.mode=subscribe&hub.verify_token=verify-me",
            "",
        ] {
            let (app, _rx) = app(Some("verify-me"), None);
            let resp = app.oneshot(handshake(query)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "query {query:?}");
        }
    }

    #[tokio::test]
    async fn handshake_rejected_without_configured_token() {
        let (app, _rx) = app(None, None);
        let resp = app
            .oneshot(handshake("hub.mode=subscribe&hub.verify_token=&hub.challenge=1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn signed_notification_is_forwarded() {
        let (app, mut rx) = app(None, Some("app-secret"));
        let sig = format!("sha256={}", sign_payload("app-secret", PAYLOAD.as_bytes()));
        let resp = app.oneshot(notification(PAYLOAD, Some(sig))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        match rx.recv().await {
            Some(TransportEvent::Message(event)) => {
                assert_eq!(event.info.id, "wamid.1");
                assert_eq!(event.info.chat_id, "6281234567");
                assert_eq!(event.content.conversation.as_deref(), Some("!ping"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_signature_is_unauthorized() {
        let (app, mut rx) = app(None, Some("app-secret"));
        let sig = format!("sha256={}", sign_payload("other", PAYLOAD.as_bytes()));
        let resp = app.oneshot(notification(PAYLOAD, Some(sig))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let (app, _) = self::app(None, Some("app-secret"));
        let resp = app.oneshot(notification(PAYLOAD, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsigned_accepted_without_app_secret() {
        let (app, mut rx) = app(None, None);
        let resp = app.oneshot(notification(PAYLOAD, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(matches!(rx.recv().await, Some(TransportEvent::Message(_))));
    }

    #[tokio::test]
    async fn status_callbacks_are_acknowledged() {
        let (app, mut rx) = app(None, None);
        let body = r#"{"entry":[{"changes":[{"value":{"statuses":[{"id":"wamid.1","status":"read"}]}}]}]}"#;
        let resp = app.oneshot(notification(body, None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (app, _rx) = app(None, None);
        let resp = app.oneshot(notification("{not json", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
