// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded in-memory log of inbound messages.
//!
//! [`EventStore`] keeps the most recent `capacity` messages in a ring buffer
//! and hands out sequential IDs starting at 1. Readers page through it with a
//! cursor (the last ID they have seen). Nothing is persisted: a restart
//! starts the counter over and the buffer empty.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

use wago_core::types::{InboundPayload, StoredMessage};

/// Largest page `after` will return.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Page size used when the requested limit is out of range.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Default number of messages retained.
pub const DEFAULT_CAPACITY: usize = 1000;

struct Inner {
    next_id: u64,
    buf: VecDeque<StoredMessage>,
}

/// Fixed-capacity, thread-safe store of inbound messages.
///
/// Appends take the write lock; cursor reads take the read lock, so any
/// number of readers proceed together and only block while an append is in
/// progress. The buffer is always in ascending ID order.
pub struct EventStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl EventStore {
    /// Create an empty store holding at most `capacity` messages.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "event store capacity must be non-zero");
        Self {
            capacity,
            inner: RwLock::new(Inner {
                next_id: 1,
                buf: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Append a payload, assigning it the next ID.
    ///
    /// When the store is full the oldest message is evicted first.
    pub fn add(&self, payload: InboundPayload) -> StoredMessage {
        // Every critical section leaves the buffer consistent, so a panic
        // elsewhere while holding the lock does not invalidate the data.
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        let msg = StoredMessage {
            id: inner.next_id,
            payload,
        };
        inner.next_id += 1;

        if inner.buf.len() == self.capacity
            && let Some(evicted) = inner.buf.pop_front()
        {
            tracing::trace!(evicted_id = evicted.id, "event store full, evicted oldest message");
        }
        inner.buf.push_back(msg.clone());
        msg
    }

    /// Messages with `id > after_id`, oldest first.
    ///
    /// `limit` outside `1..=500` falls back to 100. When `chat` is set (and
    /// non-empty) only messages from that chat are returned; the limit
    /// applies after filtering. The scan runs from the newest message and
    /// stops at the first one at or below the cursor, so the page is the
    /// *newest* `limit` matches above the cursor.
    pub fn after(&self, after_id: u64, limit: i64, chat: Option<&str>) -> Vec<StoredMessage> {
        let limit = clamp_limit(limit);
        let chat = chat.filter(|c| !c.is_empty());

        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);

        let mut page: Vec<StoredMessage> = inner
            .buf
            .iter()
            .rev()
            .take_while(|m| m.id > after_id)
            .filter(|m| chat.is_none_or(|c| m.payload.chat_id == c))
            .take(limit)
            .cloned()
            .collect();
        page.reverse();
        page
    }

    /// Number of messages currently retained.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .buf
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of messages retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recently assigned ID, or 0 if nothing was stored yet.
    pub fn last_id(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .next_id
            - 1
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for EventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStore")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("last_id", &self.last_id())
            .finish()
    }
}

fn clamp_limit(limit: i64) -> usize {
    if limit <= 0 || limit > MAX_PAGE_LIMIT {
        DEFAULT_PAGE_LIMIT
    } else {
        limit as usize
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use wago_core::types::MessageKind;

    use super::*;

    fn payload(chat: &str, text: &str) -> InboundPayload {
        InboundPayload {
            chat_id: chat.to_string(),
            sender_id: format!("{chat}-sender"),
            text: text.to_string(),
            kind: MessageKind::Conversation,
            timestamp: Utc::now(),
        }
    }

    fn texts(msgs: &[StoredMessage]) -> Vec<&str> {
        msgs.iter().map(|m| m.payload.text.as_str()).collect()
    }

    fn ids(msgs: &[StoredMessage]) -> Vec<u64> {
        msgs.iter().map(|m| m.id).collect()
    }

    #[test]
    fn ids_start_at_one_and_increase_by_one() {
        let store = EventStore::new(2);
        for expected in 1..=10 {
            let stored = store.add(payload("c", "x"));
            assert_eq!(stored.id, expected);
        }
        assert_eq!(store.last_id(), 10);
    }

    #[test]
    fn empty_store_reports_zero_last_id() {
        let store = EventStore::new(5);
        assert!(store.is_empty());
        assert_eq!(store.last_id(), 0);
        assert!(store.after(0, 10, None).is_empty());
    }

    #[test]
    fn full_store_evicts_oldest_first() {
        let store = EventStore::new(3);
        for text in ["A", "B", "C", "D"] {
            store.add(payload("c", text));
        }

        let all = store.after(0, 10, None);
        assert_eq!(texts(&all), vec!["B", "C", "D"]);
        assert_eq!(ids(&all), vec![2, 3, 4]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn cursor_returns_only_newer_messages() {
        let store = EventStore::new(3);
        for text in ["A", "B", "C", "D"] {
            store.add(payload("c", text));
        }

        assert_eq!(texts(&store.after(2, 10, None)), vec!["C", "D"]);
        assert_eq!(texts(&store.after(0, 1, None)), vec!["D"]);
        assert!(store.after(4, 10, None).is_empty());
        assert!(store.after(99, 10, None).is_empty());
    }

    #[test]
    fn retains_exactly_the_most_recent_capacity_messages() {
        let capacity = 7;
        let store = EventStore::new(capacity);
        for n in 1..=50u64 {
            store.add(payload("c", &n.to_string()));
            let expected_len = (n as usize).min(capacity);
            let all = store.after(0, 500, None);
            assert_eq!(all.len(), expected_len);
            let expected: Vec<u64> = (n + 1 - expected_len as u64..=n).collect();
            assert_eq!(ids(&all), expected);
        }
    }

    #[test]
    fn cursor_window_is_bounded_by_limit() {
        let store = EventStore::new(100);
        for n in 1..=20 {
            store.add(payload("c", &n.to_string()));
        }
        // Newest five above the cursor.
        assert_eq!(ids(&store.after(3, 5, None)), vec![16, 17, 18, 19, 20]);
        assert_eq!(ids(&store.after(15, 5, None)), vec![16, 17, 18, 19, 20]);
        assert_eq!(ids(&store.after(17, 5, None)), vec![18, 19, 20]);
    }

    #[test]
    fn chat_filter_applies_before_limit() {
        let store = EventStore::new(10);
        store.add(payload("a", "a1"));
        store.add(payload("b", "b1"));
        store.add(payload("a", "a2"));
        store.add(payload("b", "b2"));
        store.add(payload("a", "a3"));

        assert_eq!(texts(&store.after(0, 10, Some("a"))), vec!["a1", "a2", "a3"]);
        assert_eq!(texts(&store.after(0, 2, Some("a"))), vec!["a2", "a3"]);
        assert_eq!(texts(&store.after(2, 10, Some("b"))), vec!["b2"]);
        assert!(store.after(0, 10, Some("zzz")).is_empty());
    }

    #[test]
    fn empty_chat_filter_means_all_chats() {
        let store = EventStore::new(10);
        store.add(payload("a", "a1"));
        store.add(payload("b", "b1"));
        assert_eq!(store.after(0, 10, Some("")).len(), 2);
    }

    #[test]
    fn out_of_range_limits_behave_like_default() {
        let store = EventStore::new(1000);
        for n in 0..300 {
            store.add(payload("c", &n.to_string()));
        }
        let default_page = store.after(0, 100, None);
        assert_eq!(default_page.len(), 100);
        for limit in [0, -1, -500, 501, 10_000] {
            assert_eq!(store.after(0, limit, None), default_page, "limit {limit}");
        }
        assert_eq!(store.after(0, 500, None).len(), 300);
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn zero_capacity_panics() {
        let _ = EventStore::new(0);
    }

    #[test]
    fn concurrent_appends_assign_unique_sequential_ids() {
        let store = Arc::new(EventStore::new(10_000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..250 {
                        store.add(payload(&format!("chat-{t}"), &n.to_string()));
                        let _ = store.after(0, 50, None);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.len(), 2000);
        assert_eq!(store.last_id(), 2000);
        let all = store.after(0, 500, None);
        assert!(all.windows(2).all(|w| w[1].id == w[0].id + 1));
    }
}
