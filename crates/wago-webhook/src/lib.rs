// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound webhook delivery for inbound messages.
//!
//! Every stored inbound message is POSTed once to the operator's endpoint.
//! Delivery is fire-and-forget: no retries, no queue, and failures are only
//! logged. When a secret is configured the body is signed with HMAC-SHA256
//! and the hex digest is sent in [`SIGNATURE_HEADER`].

pub mod notifier;
pub mod signing;

pub use notifier::{WebhookNotifier, WebhookSettings};
pub use signing::{sign_payload, verify_signature};

/// Header carrying the hex HMAC-SHA256 of the request body.
pub const SIGNATURE_HEADER: &str = "X-Wago-Signature";
