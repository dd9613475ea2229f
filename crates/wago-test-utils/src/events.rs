// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for inbound message events.

use chrono::Utc;
use wago_core::types::{MessageContent, MessageEvent, MessageInfo};

/// A plain text message from `sender` in `chat`, timestamped now.
pub fn text_event(chat: &str, sender: &str, text: &str) -> MessageEvent {
    event_with_content(
        chat,
        sender,
        MessageContent {
            conversation: Some(text.to_string()),
            ..Default::default()
        },
    )
}

/// A message with arbitrary content, timestamped now and not sent by us.
pub fn event_with_content(chat: &str, sender: &str, content: MessageContent) -> MessageEvent {
    MessageEvent {
        info: MessageInfo {
            id: format!("mock-in-{}", uuid::Uuid::new_v4()),
            chat_id: chat.to_string(),
            sender_id: sender.to_string(),
            timestamp: Utc::now(),
            is_from_me: false,
        },
        content,
    }
}
