// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across wago crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier assigned by the messaging transport to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of an inbound message after normalization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    Conversation,
    ExtendedText,
    ImageCaption,
    Image,
    VideoCaption,
    Video,
    Reaction,
    Sticker,
    Audio,
    DocCaption,
    Document,
    ButtonsResponse,
    ListResponse,
    Unknown,
}

impl MessageKind {
    /// Whether the normalized text of this kind was written by the sender,
    /// as opposed to a placeholder such as `[image]`.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            MessageKind::Conversation
                | MessageKind::ExtendedText
                | MessageKind::ImageCaption
                | MessageKind::VideoCaption
                | MessageKind::Reaction
                | MessageKind::DocCaption
                | MessageKind::ButtonsResponse
                | MessageKind::ListResponse
        )
    }
}

/// Normalized representation of a received message.
///
/// This is also the exact JSON body delivered to the operator webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundPayload {
    /// Conversation the message belongs to.
    pub chat_id: String,
    /// Originator of the message.
    pub sender_id: String,
    /// Normalized body. Never empty for a payload that reaches the store.
    pub text: String,
    /// Classification tag.
    pub kind: MessageKind,
    /// Time asserted by the origin, not the time of insertion.
    pub timestamp: DateTime<Utc>,
}

/// An inbound payload after it has been appended to the event store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Sequential identifier assigned by the store, starting at 1.
    pub id: u64,
    #[serde(flatten)]
    pub payload: InboundPayload,
}

/// Transport-level metadata of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInfo {
    /// Transport message identifier.
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub timestamp: DateTime<Utc>,
    /// Set when the transport reports the message as sent by this account.
    pub is_from_me: bool,
}

/// Quoted or link-preview text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedText {
    pub text: String,
}

/// Image, video, or document attachment. Only the caption matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaAttachment {
    pub caption: Option<String>,
}

/// Reaction to an earlier message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// The reaction glyph (empty when a reaction is removed).
    pub text: String,
}

/// Reply to an interactive buttons message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonsResponse {
    pub selected_display_text: String,
}

/// Reply to an interactive list message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResponse {
    pub title: String,
}

/// Content of an inbound message as delivered by the transport.
///
/// Mirrors the protocol shape where any combination of variants may be
/// present; the inbound adapter picks one by fixed precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    pub conversation: Option<String>,
    pub extended_text: Option<ExtendedText>,
    pub image: Option<MediaAttachment>,
    pub video: Option<MediaAttachment>,
    pub reaction: Option<Reaction>,
    pub sticker: bool,
    pub audio: bool,
    pub document: Option<MediaAttachment>,
    pub buttons_response: Option<ButtonsResponse>,
    pub list_response: Option<ListResponse>,
}

/// A message received from the transport, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub info: MessageInfo,
    pub content: MessageContent,
}

/// Notifications raised by a messaging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The transport established its connection.
    Connected,
    /// The transport lost or closed its connection.
    Disconnected,
    /// The transport completed account pairing.
    PairSuccess { id: String },
    /// An inbound message.
    Message(MessageEvent),
}
