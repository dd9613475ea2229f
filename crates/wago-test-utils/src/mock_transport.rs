// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging transport for deterministic testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use wago_core::types::{MessageId, TransportEvent};
use wago_core::{MessagingTransport, WagoError};

/// A text captured by [`MockTransport::send_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentText {
    pub to: String,
    pub text: String,
}

/// A messaging transport that records sends instead of delivering them.
///
/// Sends can be made to fail or to stall, to exercise error and timeout
/// paths. When built with an event channel, `connect`/`disconnect` emit the
/// matching [`TransportEvent`]s and [`inject`](Self::inject) pushes arbitrary
/// events as if they came from the network.
pub struct MockTransport {
    sent: Arc<Mutex<Vec<SentText>>>,
    fail_sends: AtomicBool,
    send_delay: Mutex<Option<Duration>>,
    connected: AtomicBool,
    events: Option<mpsc::Sender<TransportEvent>>,
}

impl MockTransport {
    /// Create a mock transport without an event channel.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_sends: AtomicBool::new(false),
            send_delay: Mutex::new(None),
            connected: AtomicBool::new(false),
            events: None,
        }
    }

    /// Create a mock transport that reports events on `events`.
    pub fn with_events(events: mpsc::Sender<TransportEvent>) -> Self {
        Self {
            events: Some(events),
            ..Self::new()
        }
    }

    /// Make subsequent sends fail (`true`) or succeed (`false`).
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Delay every subsequent send by `delay`.
    pub async fn set_send_delay(&self, delay: Option<Duration>) {
        *self.send_delay.lock().await = delay;
    }

    /// Push an event into the channel given to [`with_events`](Self::with_events).
    ///
    /// # Panics
    ///
    /// Panics if the mock has no event channel or the receiver was dropped.
    pub async fn inject(&self, event: TransportEvent) {
        let tx = self
            .events
            .as_ref()
            .expect("mock transport was built without an event channel");
        tx.send(event).await.expect("event receiver dropped");
    }

    /// All texts passed to `send_text`, in call order.
    pub async fn sent_texts(&self) -> Vec<SentText> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn emit(&self, event: TransportEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event).await;
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagingTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self) -> Result<(), WagoError> {
        self.connected.store(true, Ordering::SeqCst);
        self.emit(TransportEvent::Connected).await;
        Ok(())
    }

    async fn send_text(&self, to: &str, text: &str) -> Result<MessageId, WagoError> {
        let delay = *self.send_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(WagoError::Transport {
                message: "mock send failure".to_string(),
                source: None,
            });
        }

        self.sent.lock().await.push(SentText {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }

    async fn disconnect(&self) -> Result<(), WagoError> {
        self.connected.store(false, Ordering::SeqCst);
        self.emit(TransportEvent::Disconnected).await;
        Ok(())
    }
}
