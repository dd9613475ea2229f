// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wago send` command implementation.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::info;
use wago_config::model::WagoConfig;
use wago_core::types::MessageId;
use wago_core::{MessagingTransport, WagoError};
use wago_whatsapp::WhatsAppTransport;

/// Bound on the single send.
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Connect, send one text, print its ID and disconnect.
pub async fn run_send(config: WagoConfig, to: &str, text: &str) -> Result<(), WagoError> {
    // Connect/disconnect events are not consumed here.
    let (events_tx, _events_rx) = mpsc::channel(4);
    let transport = WhatsAppTransport::new(crate::whatsapp_settings(&config), events_tx)?;

    let id = send_once(&transport, to, text).await?;
    println!("{id}");
    Ok(())
}

async fn send_once(
    transport: &dyn MessagingTransport,
    to: &str,
    text: &str,
) -> Result<MessageId, WagoError> {
    transport.connect().await?;

    let result = tokio::time::timeout(SEND_TIMEOUT, transport.send_text(to, text))
        .await
        .unwrap_or(Err(WagoError::Timeout {
            duration: SEND_TIMEOUT,
        }));

    if let Err(e) = transport.disconnect().await {
        tracing::warn!(error = %e, "disconnect failed");
    }

    let id = result?;
    info!(%to, message_id = %id, transport = transport.name(), "message sent");
    Ok(id)
}
