// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wago listen` command implementation.
//!
//! Receives inbound messages without the API: only the transport callback is
//! served, and messages go to the console and the chat command handler.
//! Nothing is stored and no webhook is called.

use std::future::IntoFuture;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use wago_config::model::WagoConfig;
use wago_core::{MessagingTransport, WagoError};
use wago_gateway::server::SHUTDOWN_GRACE;
use wago_inbound::{
    CommandSubscriber, ConsoleSubscriber, InboundPump, InboundRouter, ReplayFilter,
};
use wago_whatsapp::WhatsAppTransport;

use crate::serve::EVENT_CHANNEL_CAPACITY;
use crate::shutdown;

/// Runs the `wago listen` command.
pub async fn run_listen(config: WagoConfig) -> Result<(), WagoError> {
    info!("starting wago listen");

    let cancel = shutdown::install_signal_handler();

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let whatsapp = Arc::new(WhatsAppTransport::new(
        crate::whatsapp_settings(&config),
        events_tx,
    )?);
    let callback_routes = whatsapp.router();
    let transport: Arc<dyn MessagingTransport> = whatsapp;

    let pump = InboundPump::new(
        ReplayFilter::starting_now(config.inbound.replay_grace()),
        listen_router(Arc::clone(&transport)),
    )
    .log_unknown(config.inbound.log_unknown);
    let pump_handle = tokio::spawn(pump.run(events_rx, cancel.clone()));

    transport.connect().await?;

    let addr = config.api.bind_address();
    let served: Result<(), WagoError> = async {
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| WagoError::Server {
                message: format!("failed to bind {addr}: {e}"),
                source: Some(Box::new(e)),
            })?;
        info!("listening for inbound messages on {addr}; press Ctrl+C to stop");

        let graceful = {
            let cancel = cancel.clone();
            async move { cancel.cancelled().await }
        };
        let server = axum::serve(listener, callback_routes)
            .with_graceful_shutdown(graceful)
            .into_future();
        let deadline = async {
            cancel.cancelled().await;
            tokio::time::sleep(SHUTDOWN_GRACE).await;
        };
        tokio::select! {
            result = server => result.map_err(|e| WagoError::Server {
                message: format!("server error: {e}"),
                source: Some(Box::new(e)),
            }),
            _ = deadline => Ok(()),
        }
    }
    .await;

    cancel.cancel();
    if let Err(e) = pump_handle.await {
        warn!(error = %e, "inbound pump task failed");
    }
    if let Err(e) = transport.disconnect().await {
        warn!(error = %e, "transport disconnect failed");
    }
    served
}

/// Console output plus chat commands.
fn listen_router(transport: Arc<dyn MessagingTransport>) -> InboundRouter {
    InboundRouter::new()
        .with("console", Arc::new(ConsoleSubscriber))
        .with("commands", Arc::new(CommandSubscriber::new(transport)))
}
