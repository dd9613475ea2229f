// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process shutdown for `serve` and `listen`.
//!
//! One token is shared by the inbound pump and the HTTP listener; cancelling
//! it stops the pump and starts the server's bounded drain, after which the
//! command disconnects the transport.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Token cancelled on SIGINT or SIGTERM.
pub fn install_signal_handler() -> CancellationToken {
    cancel_on(termination_signal())
}

/// Token cancelled once `signal` resolves.
fn cancel_on<F>(signal: F) -> CancellationToken
where
    F: Future<Output = &'static str> + Send + 'static,
{
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        let name = signal.await;
        info!(signal = name, "shutting down wago");
        trigger.cancel();
    });
    token
}

/// Resolves with the name of the first termination signal received.
async fn termination_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => "SIGINT",
                    _ = sigterm.recv() => "SIGTERM",
                }
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM, only Ctrl+C stops wago");
                let _ = tokio::signal::ctrl_c().await;
                "SIGINT"
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        "Ctrl+C"
    }
}
