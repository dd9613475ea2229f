// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget webhook notifier.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use wago_core::types::InboundPayload;
use wago_core::WagoError;

use crate::signing::sign_payload;
use crate::SIGNATURE_HEADER;

/// Default bound on a single delivery attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how to deliver inbound messages.
#[derive(Clone)]
pub struct WebhookSettings {
    /// Endpoint receiving the POST.
    pub url: String,
    /// Shared secret for the signature header. `None` or empty disables signing.
    pub secret: Option<String>,
    /// Bound on the whole request, connect included.
    pub timeout: Duration,
}

impl std::fmt::Debug for WebhookSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSettings")
            .field("url", &self.url)
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Delivers inbound payloads to the operator webhook.
///
/// Cheap to clone; clones share the HTTP client and settings.
#[derive(Clone, Debug)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    settings: Arc<WebhookSettings>,
}

impl WebhookNotifier {
    /// Build a notifier with its own HTTP client bounded by `settings.timeout`.
    pub fn new(settings: WebhookSettings) -> Result<Self, WagoError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| WagoError::Webhook {
                message: format!("failed to build webhook HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    /// The configured endpoint.
    pub fn url(&self) -> &str {
        &self.settings.url
    }

    /// Deliver `payload` on a detached task and return immediately.
    ///
    /// The returned handle may be dropped; the task runs to completion or
    /// timeout on its own and only logs its outcome. Nothing bounds the number
    /// of tasks outstanding at once.
    pub fn notify(&self, payload: InboundPayload) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            match notifier.deliver(&payload).await {
                Ok(()) => debug!(chat_id = %payload.chat_id, "webhook delivered"),
                Err(e) => warn!(
                    chat_id = %payload.chat_id,
                    url = %notifier.settings.url,
                    error = %e,
                    "webhook delivery failed, dropping"
                ),
            }
        })
    }

    /// Perform a single delivery attempt.
    ///
    /// The signature covers exactly the bytes sent as the body.
    pub async fn deliver(&self, payload: &InboundPayload) -> Result<(), WagoError> {
        let body = serde_json::to_vec(payload).map_err(|e| WagoError::Webhook {
            message: format!("failed to serialize payload: {e}"),
            source: Some(Box::new(e)),
        })?;

        let mut request = self
            .client
            .post(&self.settings.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(secret) = self.settings.secret.as_deref().filter(|s| !s.is_empty()) {
            request = request.header(SIGNATURE_HEADER, sign_payload(secret, &body));
        }

        let response = request.body(body).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("request timed out after {:?}", self.settings.timeout)
            } else {
                format!("request failed: {e}")
            };
            WagoError::Webhook {
                message,
                source: Some(Box::new(e)),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WagoError::Webhook {
                message: format!("endpoint responded with {status}"),
                source: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use wago_core::types::MessageKind;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::signing::verify_signature;

    fn payload() -> InboundPayload {
        InboundPayload {
            chat_id: "6281234567890".into(),
            sender_id: "6281234567890".into(),
            text: "halo".into(),
            kind: MessageKind::Conversation,
            timestamp: DateTime::parse_from_rfc3339("2026-03-04T05:06:07Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn notifier(url: String, secret: Option<&str>) -> WebhookNotifier {
        WebhookNotifier::new(WebhookSettings {
            url,
            secret: secret.map(str::to_string),
            timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn delivers_signed_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let n = notifier(format!("{}/hook", server.uri()), Some("s3cret"));
        n.deliver(&payload()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let req = &requests[0];
        let sig = req
            .headers
            .get("x-wago-signature")
            .and_then(|v| v.to_str().ok())
            .expect("signature header present");
        assert!(verify_signature("s3cret", &req.body, sig));
        assert_eq!(sig, sign_payload("s3cret", &req.body));

        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body["text"], "halo");
        assert_eq!(body["kind"], "conversation");
        assert_eq!(body["timestamp"], "2026-03-04T05:06:07Z");
    }

    #[tokio::test]
    async fn omits_signature_without_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        for secret in [None, Some("")] {
            notifier(server.uri(), secret).deliver(&payload()).await.unwrap();
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.headers.get("x-wago-signature").is_none()));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = notifier(server.uri(), None).deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, WagoError::Webhook { ref message, .. } if message.contains("500")));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let err = notifier(server.uri(), None).deliver(&payload()).await.unwrap_err();
        assert!(matches!(err, WagoError::Webhook { ref message, .. } if message.contains("timed out")));
    }

    #[tokio::test]
    async fn notify_swallows_failures() {
        // Nothing listens on this port; the spawned task must finish quietly.
        let n = notifier("http://127.0.0.1:9/hook".to_string(), Some("s"));
        n.notify(payload()).await.unwrap();
    }

    #[tokio::test]
    async fn notify_returns_before_delivery_completes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .expect(1)
            .mount(&server)
            .await;

        let n = notifier(server.uri(), None);
        let started = std::time::Instant::now();
        let handle = n.notify(payload());
        assert!(started.elapsed() < Duration::from_millis(100));
        handle.await.unwrap();
    }

    #[test]
    fn settings_debug_redacts_secret() {
        let settings = WebhookSettings {
            url: "https://example.com/hook".into(),
            secret: Some("top-secret".into()),
            timeout: DEFAULT_TIMEOUT,
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("top-secret"));
        assert!(debug.contains("[redacted]"));
    }
}
