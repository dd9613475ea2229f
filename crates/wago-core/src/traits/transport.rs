// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging transport trait.

use async_trait::async_trait;

use crate::error::WagoError;
use crate::types::MessageId;

/// Client for the third-party messaging protocol.
///
/// Inbound notifications are not pulled through this trait: implementations
/// push [`TransportEvent`](crate::types::TransportEvent)s into the channel
/// they were constructed with, and the inbound pump consumes them.
#[async_trait]
pub trait MessagingTransport: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Establishes the connection to the messaging service.
    async fn connect(&self) -> Result<(), WagoError>;

    /// Sends a plain text message to a recipient given as digits without `+`.
    async fn send_text(&self, to: &str, text: &str) -> Result<MessageId, WagoError>;

    /// Closes the connection.
    async fn disconnect(&self) -> Result<(), WagoError>;
}
