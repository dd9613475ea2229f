// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for wago.

use thiserror::Error;

/// The primary error type used across wago crates.
///
/// Store operations never produce one of these: append and cursor reads are
/// infallible in-memory operations.
#[derive(Debug, Error)]
pub enum WagoError {
    /// Configuration errors detected after loading (missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Messaging transport errors (connection failure, rejected send, bad response).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound webhook delivery errors. Logged by the notifier, never propagated
    /// to the producer of the message.
    #[error("webhook error: {message}")]
    Webhook {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
