// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for wago.
//!
//! Holds the error type, the inbound/stored message model shared by the
//! store, webhook, and gateway crates, and the [`MessagingTransport`] trait
//! that concrete messaging clients implement.

pub mod error;
pub mod traits;
pub mod types;

pub use error::WagoError;
pub use traits::MessagingTransport;
pub use types::{
    InboundPayload, MessageContent, MessageEvent, MessageId, MessageInfo, MessageKind,
    StoredMessage, TransportEvent,
};
