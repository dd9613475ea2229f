// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The inbound event loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use wago_core::types::{MessageEvent, TransportEvent};

use crate::filter::{FilterVerdict, ReplayFilter};
use crate::normalize::{normalize, to_inbound};
use crate::router::InboundRouter;

/// Drives transport events through the filter, normalizer and router.
#[derive(Debug)]
pub struct InboundPump {
    filter: ReplayFilter,
    router: InboundRouter,
    log_unknown: bool,
}

impl InboundPump {
    pub fn new(filter: ReplayFilter, router: InboundRouter) -> Self {
        Self {
            filter,
            router,
            log_unknown: false,
        }
    }

    /// Log messages whose content could not be classified.
    pub fn log_unknown(mut self, enabled: bool) -> Self {
        self.log_unknown = enabled;
        self
    }

    /// Consume events until the channel closes or `cancel` fires.
    pub async fn run(self, mut events: mpsc::Receiver<TransportEvent>, cancel: CancellationToken) {
        info!(subscribers = ?self.router.names(), "inbound pump running");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        info!("transport event channel closed, stopping inbound pump");
                        break;
                    }
                },
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping inbound pump");
                    break;
                }
            }
        }
    }

    /// Process a single transport event.
    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => info!("transport connected"),
            TransportEvent::Disconnected => info!("transport disconnected"),
            TransportEvent::PairSuccess { id } => info!(account = %id, "pairing succeeded"),
            TransportEvent::Message(message) => self.handle_message(message).await,
        }
    }

    async fn handle_message(&self, message: MessageEvent) {
        match self.filter.check(&message.info) {
            FilterVerdict::Accept => {}
            verdict => {
                trace!(message_id = %message.info.id, ?verdict, "inbound message filtered");
                return;
            }
        }

        let Some(payload) = to_inbound(&message) else {
            if self.log_unknown {
                let kind = normalize(&message.content).kind;
                debug!(
                    sender_id = %message.info.sender_id,
                    message_id = %message.info.id,
                    %kind,
                    "dropping inbound message without text"
                );
            }
            return;
        };

        self.router.dispatch(&payload).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};
    use wago_core::types::{MediaAttachment, MessageContent, MessageKind};
    use wago_store::EventStore;
    use wago_test_utils::{event_with_content, text_event, MockTransport};

    use super::*;
    use crate::subscribers::{CommandSubscriber, StoreSubscriber};

    fn pump_with_store(store: Arc<EventStore>) -> InboundPump {
        let router = InboundRouter::new().with("store", Arc::new(StoreSubscriber::new(store)));
        InboundPump::new(ReplayFilter::default(), router)
    }

    #[tokio::test]
    async fn text_message_reaches_store() {
        let store = Arc::new(EventStore::new(10));
        let pump = pump_with_store(store.clone());

        pump.handle_event(TransportEvent::Message(text_event("c1", "s1", "hi")))
            .await;

        let all = store.after(0, 10, None);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].payload.chat_id, "c1");
        assert_eq!(all[0].payload.kind, MessageKind::Conversation);
    }

    #[tokio::test]
    async fn media_placeholder_is_stored() {
        let store = Arc::new(EventStore::new(10));
        let pump = pump_with_store(store.clone());

        let content = MessageContent {
            image: Some(MediaAttachment { caption: None }),
            ..Default::default()
        };
        pump.handle_event(TransportEvent::Message(event_with_content("c", "s", content)))
            .await;

        let all = store.after(0, 10, None);
        assert_eq!(all[0].payload.text, "[image]");
        assert_eq!(all[0].payload.kind, MessageKind::Image);
    }

    #[tokio::test]
    async fn filtered_and_empty_messages_are_dropped() {
        let store = Arc::new(EventStore::new(10));
        let pump = pump_with_store(store.clone()).log_unknown(true);

        let mut old = text_event("c", "s", "old");
        old.info.timestamp = Utc::now() - TimeDelta::minutes(10);
        pump.handle_event(TransportEvent::Message(old)).await;

        let mut mine = text_event("c", "s", "mine");
        mine.info.is_from_me = true;
        pump.handle_event(TransportEvent::Message(mine)).await;

        pump.handle_event(TransportEvent::Message(event_with_content(
            "c",
            "s",
            MessageContent::default(),
        )))
        .await;

        pump.handle_event(TransportEvent::Connected).await;
        pump.handle_event(TransportEvent::PairSuccess { id: "acct".into() })
            .await;

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn run_stops_when_channel_closes() {
        let store = Arc::new(EventStore::new(10));
        let pump = pump_with_store(store.clone());
        let (tx, rx) = mpsc::channel(8);

        tx.send(TransportEvent::Message(text_event("c", "s", "one")))
            .await
            .unwrap();
        tx.send(TransportEvent::Message(text_event("c", "s", "two")))
            .await
            .unwrap();
        drop(tx);

        pump.run(rx, CancellationToken::new()).await;
        let texts: Vec<_> = store
            .after(0, 10, None)
            .into_iter()
            .map(|m| m.payload.text)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let pump = pump_with_store(Arc::new(EventStore::new(10)));
        let (_tx, rx) = mpsc::channel::<TransportEvent>(8);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(pump.run(rx, cancel.clone()));
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("pump stops after cancellation")
            .unwrap();
    }

    #[tokio::test]
    async fn ping_roundtrip_through_mock_transport() {
        let (tx, rx) = mpsc::channel(8);
        let transport = Arc::new(MockTransport::with_events(tx));
        let store = Arc::new(EventStore::new(10));
        let router = InboundRouter::new()
            .with("store", Arc::new(StoreSubscriber::new(store.clone())))
            .with("commands", Arc::new(CommandSubscriber::new(transport.clone())));
        let pump = InboundPump::new(ReplayFilter::default(), router);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(pump.run(rx, cancel.clone()));

        transport
            .inject(TransportEvent::Message(text_event("6281111111", "6281111111", "!ping")))
            .await;

        for _ in 0..100 {
            if transport.sent_count().await == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = transport.sent_texts().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "pong");
        assert_eq!(store.len(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }
}
