// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in inbound subscribers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use wago_core::types::InboundPayload;
use wago_core::MessagingTransport;
use wago_store::EventStore;
use wago_webhook::WebhookNotifier;

use crate::router::InboundSubscriber;

/// Appends every message to the event store.
pub struct StoreSubscriber {
    store: Arc<EventStore>,
}

impl StoreSubscriber {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl InboundSubscriber for StoreSubscriber {
    async fn on_message(&self, payload: &InboundPayload) {
        let stored = self.store.add(payload.clone());
        debug!(id = stored.id, chat_id = %payload.chat_id, "stored inbound message");
    }
}

/// Forwards every message to the operator webhook without waiting for it.
pub struct WebhookSubscriber {
    notifier: WebhookNotifier,
}

impl WebhookSubscriber {
    pub fn new(notifier: WebhookNotifier) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl InboundSubscriber for WebhookSubscriber {
    async fn on_message(&self, payload: &InboundPayload) {
        // Detached; the handle is intentionally dropped.
        let _ = self.notifier.notify(payload.clone());
    }
}

/// Logs `sender: text` for every message.
#[derive(Debug, Default)]
pub struct ConsoleSubscriber;

#[async_trait]
impl InboundSubscriber for ConsoleSubscriber {
    async fn on_message(&self, payload: &InboundPayload) {
        info!(kind = %payload.kind, "{}: {}", payload.sender_id, payload.text);
    }
}

/// Bound on a single command reply.
pub const COMMAND_REPLY_TIMEOUT: Duration = Duration::from_secs(15);

/// Answers `!ping` and `!id` chat commands.
///
/// Only messages whose text was typed by the sender are considered, so a
/// caption reading `!ping` triggers a reply but a placeholder never does.
pub struct CommandSubscriber {
    transport: Arc<dyn MessagingTransport>,
    reply_timeout: Duration,
}

impl CommandSubscriber {
    pub fn new(transport: Arc<dyn MessagingTransport>) -> Self {
        Self {
            transport,
            reply_timeout: COMMAND_REPLY_TIMEOUT,
        }
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// The reply for `payload`, if it is a known command.
    pub fn reply_for(payload: &InboundPayload) -> Option<String> {
        if !payload.kind.is_text() {
            return None;
        }
        match payload.text.as_str() {
            "!ping" => Some("pong".to_string()),
            "!id" => Some(format!(
                "Chat: {}\nSender: {}",
                payload.chat_id, payload.sender_id
            )),
            _ => None,
        }
    }
}

#[async_trait]
impl InboundSubscriber for CommandSubscriber {
    async fn on_message(&self, payload: &InboundPayload) {
        let Some(reply) = Self::reply_for(payload) else {
            return;
        };

        let transport = Arc::clone(&self.transport);
        let chat_id = payload.chat_id.clone();
        let command = payload.text.clone();
        let timeout = self.reply_timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, transport.send_text(&chat_id, &reply)).await {
                Ok(Ok(id)) => debug!(%chat_id, %command, message_id = %id, "command reply sent"),
                Ok(Err(e)) => warn!(%chat_id, %command, error = %e, "command reply failed"),
                Err(_) => warn!(%chat_id, %command, ?timeout, "command reply timed out"),
            }
        });
    }
}
