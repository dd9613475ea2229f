// SPDX-FileCopyrightText: 2026 Wago Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replay and echo filtering.
//!
//! On (re)connect a transport may deliver history that predates this
//! process. Anything timestamped before `started_at - grace` is treated as
//! backfill and dropped. The grace window tolerates clock skew between the
//! origin and this host; it is a heuristic, not a guarantee.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use wago_core::types::MessageInfo;

/// Default tolerance below the start time.
pub const DEFAULT_REPLAY_GRACE: Duration = Duration::from_secs(2);

/// Outcome of [`ReplayFilter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    Accept,
    /// Older than the start of this process minus the grace window.
    Backfill,
    /// Sent by this account.
    FromMe,
}

/// Drops replayed history and our own outbound echoes.
#[derive(Debug, Clone)]
pub struct ReplayFilter {
    cutoff: DateTime<Utc>,
}

impl ReplayFilter {
    /// Filter relative to `started_at`.
    pub fn new(started_at: DateTime<Utc>, grace: Duration) -> Self {
        let cutoff = TimeDelta::from_std(grace)
            .ok()
            .and_then(|grace| started_at.checked_sub_signed(grace))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { cutoff }
    }

    /// Filter relative to the current time.
    pub fn starting_now(grace: Duration) -> Self {
        Self::new(Utc::now(), grace)
    }

    /// Messages strictly older than this are backfill.
    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn check(&self, info: &MessageInfo) -> FilterVerdict {
        if info.is_from_me {
            FilterVerdict::FromMe
        } else if info.timestamp < self.cutoff {
            FilterVerdict::Backfill
        } else {
            FilterVerdict::Accept
        }
    }
}

impl Default for ReplayFilter {
    fn default() -> Self {
        Self::starting_now(DEFAULT_REPLAY_GRACE)
    }
}
