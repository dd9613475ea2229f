// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP API for wago.
//!
//! Sends texts and OTP codes through the configured [`MessagingTransport`]
//! and serves the inbound [`EventStore`] to pollers through a cursor.
//!
//! [`MessagingTransport`]: wago_core::MessagingTransport
//! [`EventStore`]: wago_store::EventStore

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use handlers::ApiError;
pub use server::{build_router, start_server, GatewayState, ServerConfig};
