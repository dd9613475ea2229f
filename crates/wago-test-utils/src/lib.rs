// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for wago.
//!
//! - [`MockTransport`] - messaging transport that records sends and can be told to fail
//! - [`text_event`] and friends - builders for inbound [`MessageEvent`]s

pub mod events;
pub mod mock_transport;

pub use events::{event_with_content, text_event};
pub use mock_transport::{MockTransport, SentText};

pub use wago_core::types::MessageEvent;
