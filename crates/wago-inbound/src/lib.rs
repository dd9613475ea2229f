// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound message handling.
//!
//! Transport events flow through the [`InboundPump`]: the [`ReplayFilter`]
//! drops backfill and echoes, [`normalize`] turns heterogeneous content into
//! an [`InboundPayload`](wago_core::InboundPayload), and the
//! [`InboundRouter`] hands each payload to its subscribers in registration
//! order (store, webhook, console, chat commands).

pub mod filter;
pub mod normalize;
pub mod pump;
pub mod router;
pub mod subscribers;

pub use filter::{FilterVerdict, ReplayFilter};
pub use normalize::{normalize, to_inbound, Normalized};
pub use pump::InboundPump;
pub use router::{InboundRouter, InboundSubscriber};
pub use subscribers::{CommandSubscriber, ConsoleSubscriber, StoreSubscriber, WebhookSubscriber};
