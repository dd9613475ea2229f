// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the wago core and external collaborators.

pub mod transport;

pub use transport::MessagingTransport;
