// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! wago - send and receive WhatsApp messages over HTTP.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod listen;
mod send;
mod serve;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use wago_config::model::WagoConfig;
use wago_whatsapp::WhatsAppSettings;

/// wago - send and receive WhatsApp messages over HTTP.
#[derive(Parser, Debug)]
#[command(name = "wago", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this TOML file instead of the default locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API with the transport, store and webhook.
    Serve,
    /// Send a single text message and print its ID.
    Send {
        /// Recipient number, digits only.
        #[arg(long)]
        to: String,
        /// Message body.
        #[arg(long)]
        text: String,
    },
    /// Print inbound messages and answer chat commands until interrupted.
    Listen,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => wago_config::load_and_validate_path(path),
        None => wago_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            wago_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Send { to, text } => send::run_send(config, &to, &text).await,
        Commands::Listen => listen::run_listen(config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "wago exited with an error");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wago={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Cloud API settings from the `[whatsapp]` section.
///
/// Missing credentials become empty strings; the transport rejects them on
/// `connect`.
fn whatsapp_settings(config: &WagoConfig) -> WhatsAppSettings {
    let wa = &config.whatsapp;
    WhatsAppSettings {
        api_base: wa.api_base.clone(),
        phone_number_id: wa.phone_number_id.clone().unwrap_or_default(),
        access_token: wa.access_token.clone().unwrap_or_default(),
        verify_token: wa.verify_token.clone().filter(|t| !t.is_empty()),
        app_secret: wa.app_secret.clone().filter(|s| !s.is_empty()),
    }
}
