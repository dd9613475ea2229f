// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API transport for wago.
//!
//! Implements [`MessagingTransport`] on top of Meta's Cloud API: outbound
//! texts go through the Graph `messages` endpoint, inbound messages arrive on
//! the callback router returned by [`WhatsAppTransport::router`] and are
//! forwarded as [`TransportEvent`]s.

pub mod api;
pub mod types;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::mpsc;
use tracing::{debug, info};
use wago_core::types::{MessageId, TransportEvent};
use wago_core::{MessagingTransport, WagoError};

pub use api::CloudApiClient;
pub use webhook::{SIGNATURE_HEADER, WEBHOOK_PATH};

/// Default Graph API base URL.
pub const DEFAULT_API_BASE: &str = "https://graph.facebook.com/v21.0";

/// Cloud API credentials and endpoints.
#[derive(Clone)]
pub struct WhatsAppSettings {
    pub api_base: String,
    pub phone_number_id: String,
    pub access_token: String,
    /// Token Meta echoes during the subscription handshake.
    pub verify_token: Option<String>,
    /// App secret used to verify callback signatures.
    pub app_secret: Option<String>,
}

impl std::fmt::Debug for WhatsAppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppSettings")
            .field("api_base", &self.api_base)
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &"[redacted]")
            .field("verify_token", &self.verify_token.as_ref().map(|_| "[redacted]"))
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Messaging transport backed by the WhatsApp Cloud API.
pub struct WhatsAppTransport {
    client: CloudApiClient,
    settings: WhatsAppSettings,
    events: mpsc::Sender<TransportEvent>,
}

impl WhatsAppTransport {
    /// Build a transport that reports inbound traffic on `events`.
    pub fn new(
        settings: WhatsAppSettings,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Self, WagoError> {
        let client = CloudApiClient::new(
            &settings.api_base,
            &settings.phone_number_id,
            &settings.access_token,
        )?;
        Ok(Self {
            client,
            settings,
            events,
        })
    }

    /// Routes for the inbound callback, to be merged into the HTTP server.
    pub fn router(&self) -> Router {
        webhook::router(webhook::WebhookState {
            verify_token: self.settings.verify_token.as_deref().map(Arc::from),
            app_secret: self.settings.app_secret.as_deref().map(Arc::from),
            events: self.events.clone(),
        })
    }

    async fn emit(&self, event: TransportEvent) {
        if self.events.send(event).await.is_err() {
            debug!("transport event receiver dropped");
        }
    }
}

#[async_trait]
impl MessagingTransport for WhatsAppTransport {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn connect(&self) -> Result<(), WagoError> {
        if self.settings.phone_number_id.is_empty() {
            return Err(WagoError::Config(
                "whatsapp.phone_number_id is required".into(),
            ));
        }
        if self.settings.access_token.is_empty() {
            return Err(WagoError::Config("whatsapp.access_token is required".into()));
        }
        info!(
            phone_number_id = %self.settings.phone_number_id,
            url = %self.client.messages_url(),
            "whatsapp cloud transport ready"
        );
        self.emit(TransportEvent::Connected).await;
        Ok(())
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<MessageId, WagoError> {
        let id = self.client.send_text(to, text).await?;
        debug!(%to, message_id = %id, "text sent");
        Ok(id)
    }

    async fn disconnect(&self) -> Result<(), WagoError> {
        self.emit(TransportEvent::Disconnected).await;
        Ok(())
    }
}
