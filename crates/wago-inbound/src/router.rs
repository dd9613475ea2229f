// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscriber trait and fan-out router for inbound payloads.
//!
//! Subscribers are registered once, by name, through
//! [`InboundRouter::subscribe`]. Every accepted message is handed to each
//! subscriber in registration order.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;
use wago_core::types::InboundPayload;

/// Consumer of normalized inbound messages.
///
/// Implementations must not block the caller for long; slow work (network
/// calls, replies) belongs on a spawned task.
#[async_trait]
pub trait InboundSubscriber: Send + Sync {
    async fn on_message(&self, payload: &InboundPayload);
}

/// Ordered list of named subscribers.
#[derive(Default, Clone)]
pub struct InboundRouter {
    subscribers: Vec<(String, Arc<dyn InboundSubscriber>)>,
}

impl InboundRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `subscriber` to the dispatch order.
    pub fn subscribe(&mut self, name: impl Into<String>, subscriber: Arc<dyn InboundSubscriber>) {
        self.subscribers.push((name.into(), subscriber));
    }

    /// Builder form of [`subscribe`](Self::subscribe).
    pub fn with(mut self, name: impl Into<String>, subscriber: Arc<dyn InboundSubscriber>) -> Self {
        self.subscribe(name, subscriber);
        self
    }

    /// Names of the registered subscribers, in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.subscribers.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Hand `payload` to every subscriber, one after another.
    pub async fn dispatch(&self, payload: &InboundPayload) {
        for (name, subscriber) in &self.subscribers {
            trace!(subscriber = %name, chat_id = %payload.chat_id, "dispatching inbound message");
            subscriber.on_message(payload).await;
        }
    }
}

impl std::fmt::Debug for InboundRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundRouter")
            .field("subscribers", &self.names())
            .finish()
    }
}
