// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content normalization.
//!
//! Maps the many content variants a transport can deliver onto a single
//! `(text, kind)` pair. Variants are tried in a fixed order and the first
//! match wins; media without a caption get a bracketed placeholder.

use wago_core::types::{InboundPayload, MessageContent, MessageEvent, MessageKind};

/// Normalized text and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub kind: MessageKind,
}

impl Normalized {
    fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Classify `content` and extract its text.
///
/// Returns kind `unknown` with empty text when nothing matches.
pub fn normalize(content: &MessageContent) -> Normalized {
    if let Some(text) = non_empty(content.conversation.as_deref()) {
        return Normalized::new(text, MessageKind::Conversation);
    }
    if let Some(text) = non_empty(content.extended_text.as_ref().map(|x| x.text.as_str())) {
        return Normalized::new(text, MessageKind::ExtendedText);
    }
    if let Some(image) = &content.image {
        return captioned(
            image.caption.as_deref(),
            MessageKind::ImageCaption,
            "[image]",
            MessageKind::Image,
        );
    }
    if let Some(video) = &content.video {
        return captioned(
            video.caption.as_deref(),
            MessageKind::VideoCaption,
            "[video]",
            MessageKind::Video,
        );
    }
    if let Some(reaction) = &content.reaction {
        return Normalized::new(format!("reaction: {}", reaction.text), MessageKind::Reaction);
    }
    if content.sticker {
        return Normalized::new("[sticker]", MessageKind::Sticker);
    }
    if content.audio {
        return Normalized::new("[audio]", MessageKind::Audio);
    }
    if let Some(document) = &content.document {
        return captioned(
            document.caption.as_deref(),
            MessageKind::DocCaption,
            "[document]",
            MessageKind::Document,
        );
    }
    if let Some(text) = non_empty(
        content
            .buttons_response
            .as_ref()
            .map(|b| b.selected_display_text.as_str()),
    ) {
        return Normalized::new(text, MessageKind::ButtonsResponse);
    }
    if let Some(text) = non_empty(content.list_response.as_ref().map(|l| l.title.as_str())) {
        return Normalized::new(text, MessageKind::ListResponse);
    }
    Normalized::new(String::new(), MessageKind::Unknown)
}

/// Build the payload stored and forwarded for `event`.
///
/// Returns `None` when the normalized text is empty; such messages are
/// dropped before they reach any subscriber.
pub fn to_inbound(event: &MessageEvent) -> Option<InboundPayload> {
    let Normalized { text, kind } = normalize(&event.content);
    if text.is_empty() {
        return None;
    }
    Some(InboundPayload {
        chat_id: event.info.chat_id.clone(),
        sender_id: event.info.sender_id.clone(),
        text,
        kind,
        timestamp: event.info.timestamp,
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn captioned(
    caption: Option<&str>,
    caption_kind: MessageKind,
    placeholder: &str,
    bare_kind: MessageKind,
) -> Normalized {
    match non_empty(caption) {
        Some(caption) => Normalized::new(caption, caption_kind),
        None => Normalized::new(placeholder, bare_kind),
    }
}
