// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud API wire types.
//!
//! Only the fields wago reads are modelled; everything else in Meta's
//! payloads is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wago_core::types::{
    ButtonsResponse, ListResponse, MediaAttachment, MessageContent, MessageEvent,
    MessageInfo, Reaction,
};

// --- Outbound -------------------------------------------------------------

/// Body of `POST /{phone_number_id}/messages` for a plain text message.
#[derive(Debug, Clone, Serialize)]
pub struct SendTextRequest<'a> {
    pub messaging_product: &'static str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub text: TextBody<'a>,
}

impl<'a> SendTextRequest<'a> {
    pub fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            type_: "text",
            text: TextBody { body },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBody<'a> {
    pub body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub messages: Vec<SentMessageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentMessageRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i64,
}

// --- Inbound webhook ------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub value: ChangeValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    /// Absent for delivery/read status callbacks.
    #[serde(default)]
    pub messages: Vec<CloudMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudMessage {
    pub id: String,
    pub from: String,
    /// Unix seconds, as a string.
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "type", default)]
    pub type_: String,
    pub text: Option<Text>,
    pub image: Option<Media>,
    pub video: Option<Media>,
    pub document: Option<Media>,
    pub audio: Option<Media>,
    pub voice: Option<Media>,
    pub sticker: Option<Media>,
    pub reaction: Option<CloudReaction>,
    pub button: Option<Button>,
    pub interactive: Option<Interactive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudReaction {
    #[serde(default)]
    pub emoji: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Button {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Interactive {
    pub button_reply: Option<Reply>,
    pub list_reply: Option<Reply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub title: String,
}

impl CloudMessage {
    /// Map onto the transport-neutral content model.
    pub fn content(&self) -> MessageContent {
        let caption = |m: &Option<Media>| {
            m.as_ref().map(|m| MediaAttachment {
                caption: m.caption.clone(),
            })
        };

        let buttons_response = self
            .button
            .as_ref()
            .map(|b| b.text.clone())
            .or_else(|| {
                self.interactive
                    .as_ref()
                    .and_then(|i| i.button_reply.as_ref())
                    .map(|r| r.title.clone())
            })
            .map(|selected_display_text| ButtonsResponse {
                selected_display_text,
            });

        let list_response = self
            .interactive
            .as_ref()
            .and_then(|i| i.list_reply.as_ref())
            .map(|r| ListResponse {
                title: r.title.clone(),
            });

        MessageContent {
            conversation: self.text.as_ref().map(|t| t.body.clone()),
            extended_text: None,
            image: caption(&self.image),
            video: caption(&self.video),
            reaction: self.reaction.as_ref().map(|r| Reaction {
                text: r.emoji.clone(),
            }),
            sticker: self.sticker.is_some(),
            audio: self.audio.is_some() || self.voice.is_some(),
            document: caption(&self.document),
            buttons_response,
            list_response,
        }
    }

    /// Origin timestamp, falling back to `now` when missing or malformed.
    pub fn timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(now)
    }

    /// Build the event forwarded to the inbound pump.
    ///
    /// The Cloud API only delivers direct messages, so chat and sender are
    /// both the originating phone number.
    pub fn to_event(&self, now: DateTime<Utc>) -> MessageEvent {
        MessageEvent {
            info: MessageInfo {
                id: self.id.clone(),
                chat_id: self.from.clone(),
                sender_id: self.from.clone(),
                timestamp: self.timestamp(now),
                is_from_me: false,
            },
            content: self.content(),
        }
    }
}

impl WebhookPayload {
    /// All messages across every entry and change, in payload order.
    pub fn messages(&self) -> impl Iterator<Item = &CloudMessage> {
        self.entry
            .iter()
            .flat_map(|e| e.changes.iter())
            .flat_map(|c| c.value.messages.iter())
    }
}
