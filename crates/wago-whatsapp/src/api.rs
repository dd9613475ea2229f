// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Cloud API messages endpoint.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;
use wago_core::types::MessageId;
use wago_core::WagoError;

use crate::types::{ApiErrorResponse, SendResponse, SendTextRequest};

/// Bound on a single Cloud API request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends messages through `{api_base}/{phone_number_id}/messages`.
#[derive(Debug, Clone)]
pub struct CloudApiClient {
    client: reqwest::Client,
    messages_url: String,
}

impl CloudApiClient {
    pub fn new(api_base: &str, phone_number_id: &str, access_token: &str) -> Result<Self, WagoError> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| WagoError::Config(format!("invalid whatsapp.access_token: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WagoError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            messages_url: format!(
                "{}/{}/messages",
                api_base.trim_end_matches('/'),
                phone_number_id
            ),
        })
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }

    /// Send a plain text message and return the ID Meta assigned to it.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<MessageId, WagoError> {
        let response = self
            .client
            .post(&self.messages_url)
            .json(&SendTextRequest::new(to, text))
            .send()
            .await
            .map_err(|e| WagoError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| WagoError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(%status, "cloud api send response received");

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Cloud API error ({}): {}",
                    api_err.error.code, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(WagoError::Transport {
                message,
                source: None,
            });
        }

        let parsed: SendResponse = serde_json::from_str(&body).map_err(|e| WagoError::Transport {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })?;

        parsed
            .messages
            .into_iter()
            .next()
            .map(|m| MessageId(m.id))
            .ok_or_else(|| WagoError::Transport {
                message: "API response contained no message id".into(),
                source: None,
            })
    }
}
