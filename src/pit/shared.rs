// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Thread-safe handle to a [`PitTable`].
//!
//! The table is a single-writer resource. Every mutation (create, erase,
//! refresh, sweep) takes the write lock, so two near-simultaneous duplicate
//! Interests can never both observe "absent" and allocate two entries.
//! Lookups take the read lock and may run concurrently with each other, but
//! never with a mutation. Results are returned as owned snapshots because a
//! borrowed entry cannot outlive the lock guard.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::entry::{EntryId, Interest, PitEntry};
use super::error::PitResult;
use super::fib::Fib;
use super::table::PitTable;
use crate::clock::Timestamp;
use crate::name::Name;

/// Cloneable, lock-protected PIT.
#[derive(Debug, Clone)]
pub struct SharedPit {
    inner: Arc<RwLock<PitTable>>,
}

impl SharedPit {
    pub fn new(table: PitTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    pub fn lookup_by_content(&self, name: &Name) -> Option<PitEntry> {
        self.inner.read().lookup_by_content(name).cloned()
    }

    pub fn lookup_by_interest(&self, name: &Name) -> Option<PitEntry> {
        self.inner.read().lookup_by_interest(name).cloned()
    }

    /// Creates or aggregates under the write lock.
    pub fn create(&self, interest: &Interest, fib: &dyn Fib) -> PitResult<PitEntry> {
        let mut table = self.inner.write();
        table.create(interest, fib).map(|entry| entry.clone())
    }

    pub fn erase(&self, id: EntryId) -> PitResult<PitEntry> {
        self.inner.write().erase(id)
    }

    pub fn refresh(&self, id: EntryId, lifetime: Option<Duration>) -> PitResult<Timestamp> {
        self.inner.write().refresh(id, lifetime)
    }

    pub fn sweep_expired(&self, now: Timestamp) -> usize {
        self.inner.write().sweep_expired(now)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.inner.read().print(out)
    }

    /// Runs `f` with shared access to the table.
    pub fn read<R>(&self, f: impl FnOnce(&PitTable) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the table.
    pub fn write<R>(&self, f: impl FnOnce(&mut PitTable) -> R) -> R {
        f(&mut self.inner.write())
    }
}
