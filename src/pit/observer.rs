// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Lifecycle observer injected into the table.

use std::fmt;

use super::entry::PitEntry;

/// Why an entry left the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseReason {
    /// Removed by the driver, typically after being satisfied.
    Explicit,
    /// Chosen as a victim to admit a new entry.
    Evicted,
    /// Removed by an expiry sweep.
    Expired,
}

impl fmt::Display for EraseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EraseReason::Explicit => "explicit",
            EraseReason::Evicted => "evicted",
            EraseReason::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Receives entry lifecycle events. All methods default to no-ops.
pub trait PitObserver: Send + Sync + fmt::Debug {
    fn on_created(&self, _entry: &PitEntry) {}

    /// A duplicate Interest found an existing entry.
    fn on_aggregated(&self, _entry: &PitEntry) {}

    fn on_erased(&self, _entry: &PitEntry, _reason: EraseReason) {}
}

/// Observer that logs every event through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PitObserver for TracingObserver {
    fn on_created(&self, entry: &PitEntry) {
        tracing::debug!(
            name = %entry.name(),
            id = %entry.id(),
            expire_at = %entry.expire_at(),
            "PIT entry created"
        );
    }

    fn on_aggregated(&self, entry: &PitEntry) {
        tracing::debug!(name = %entry.name(), id = %entry.id(), "Interest aggregated");
    }

    fn on_erased(&self, entry: &PitEntry, reason: EraseReason) {
        tracing::debug!(name = %entry.name(), id = %entry.id(), %reason, "PIT entry erased");
    }
}
