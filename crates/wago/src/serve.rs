// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wago serve` command implementation.
//!
//! Connects the WhatsApp transport, routes inbound messages into the event
//! store, the webhook and the console, and serves the HTTP API until a
//! shutdown signal arrives.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};
use wago_config::model::WagoConfig;
use wago_core::{MessagingTransport, WagoError};
use wago_gateway::{start_server, AuthConfig, GatewayState, ServerConfig};
use wago_inbound::{
    CommandSubscriber, ConsoleSubscriber, InboundPump, InboundRouter, ReplayFilter,
    StoreSubscriber, WebhookSubscriber,
};
use wago_store::EventStore;
use wago_webhook::{WebhookNotifier, WebhookSettings};
use wago_whatsapp::WhatsAppTransport;

use crate::shutdown;

/// Capacity of the transport event channel.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Runs the `wago serve` command.
pub async fn run_serve(config: WagoConfig) -> Result<(), WagoError> {
    info!("starting wago serve");

    let cancel = shutdown::install_signal_handler();

    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let whatsapp = Arc::new(WhatsAppTransport::new(
        crate::whatsapp_settings(&config),
        events_tx,
    )?);
    let callback_routes = whatsapp.router();
    let transport: Arc<dyn MessagingTransport> = whatsapp;

    let store = Arc::new(EventStore::new(config.store.capacity));
    let router = build_inbound_router(&config, &store, &transport)?;

    let pump = InboundPump::new(
        ReplayFilter::starting_now(config.inbound.replay_grace()),
        router,
    )
    .log_unknown(config.inbound.log_unknown);
    let pump_handle = tokio::spawn(pump.run(events_rx, cancel.clone()));

    transport.connect().await?;

    let auth = AuthConfig::new(config.api.api_key.clone());
    if !auth.is_enabled() {
        warn!("api.api_key is not set; /send-text, /send-otp and /messages will answer 403");
    }

    let state = GatewayState {
        transport: Arc::clone(&transport),
        store,
        auth,
        send_timeout: config.api.send_timeout(),
    };
    let server_config = ServerConfig {
        host: config.api.host.clone(),
        port: config.api.port,
    };

    let served = start_server(&server_config, state, callback_routes, cancel.clone()).await;

    // Stop the pump even when the server failed to start.
    cancel.cancel();
    if let Err(e) = pump_handle.await {
        warn!(error = %e, "inbound pump task failed");
    }
    if let Err(e) = transport.disconnect().await {
        warn!(error = %e, "transport disconnect failed");
    }

    served?;
    info!("wago serve stopped");
    Ok(())
}

/// Subscribers for `serve`: store first, then webhook, console and commands.
fn build_inbound_router(
    config: &WagoConfig,
    store: &Arc<EventStore>,
    transport: &Arc<dyn MessagingTransport>,
) -> Result<InboundRouter, WagoError> {
    let mut router =
        InboundRouter::new().with("store", Arc::new(StoreSubscriber::new(Arc::clone(store))));

    match config.webhook.url() {
        Some(url) => {
            let notifier = WebhookNotifier::new(WebhookSettings {
                url: url.to_string(),
                secret: config.webhook.secret.clone(),
                timeout: config.webhook.timeout(),
            })?;
            router.subscribe("webhook", Arc::new(WebhookSubscriber::new(notifier)));
            let signed = config.webhook.secret.as_deref().is_some_and(|s| !s.is_empty());
            info!(%url, signed, "webhook delivery enabled");
        }
        None => info!("no webhook.url configured, inbound messages are only stored"),
    }

    router.subscribe("console", Arc::new(ConsoleSubscriber));
    if config.inbound.commands {
        router.subscribe(
            "commands",
            Arc::new(CommandSubscriber::new(Arc::clone(transport))),
        );
    }
    Ok(router)
}
