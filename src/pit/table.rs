// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! The Pending Interest Table facade.

use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, trace, warn};

use super::entry::{EntryId, Interest, PitEntry};
use super::error::{PitError, PitResult};
use super::fib::Fib;
use super::observer::{EraseReason, PitObserver, TracingObserver};
use super::policy::EvictionPolicy;
use crate::clock::{Clock, Timestamp};
use crate::config::table::TableConfig;
use crate::data_structures::expiry_queue::ExpiryQueue;
use crate::data_structures::name_trie::{NameTrie, NameTrieConfig};
use crate::name::Name;

/// Stale expiry pairs tolerated before the index is rebuilt.
const EXPIRY_COMPACT_SLACK: usize = 64;

/// Tracks pending Interests by name.
///
/// Composes a [`NameTrie`] of [`PitEntry`]s, an [`EvictionPolicy`] bounding
/// its size and an [`ExpiryQueue`] ordering entries by expiry time. All
/// mutations take `&mut self`; see [`SharedPit`](super::SharedPit) for use
/// from several threads.
#[derive(Debug)]
pub struct PitTable {
    trie: NameTrie<PitEntry>,
    policy: Box<dyn EvictionPolicy>,
    expiry: ExpiryQueue<EntryId>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn PitObserver>,
    default_lifetime: Duration,
}

impl PitTable {
    /// Creates an unbounded table with a FIFO policy and default settings.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::from_config(&TableConfig::default(), clock)
    }

    /// Creates a table from configuration.
    pub fn from_config(config: &TableConfig, clock: Arc<dyn Clock>) -> Self {
        let trie = NameTrie::with_config(NameTrieConfig {
            max_depth: config.max_name_depth,
        });
        Self {
            trie,
            policy: config.eviction.build(config.max_size),
            expiry: ExpiryQueue::new(),
            clock,
            observer: Arc::new(TracingObserver),
            default_lifetime: config.default_lifetime(),
        }
    }

    /// Replaces the lifecycle observer.
    pub fn with_observer(mut self, observer: Arc<dyn PitObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replaces the eviction policy. Must be called before any entry is created.
    pub fn with_policy(mut self, policy: Box<dyn EvictionPolicy>) -> Self {
        debug_assert!(self.trie.is_empty());
        self.policy = policy;
        self
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Number of trie nodes, including payload-free interior ones.
    pub fn node_count(&self) -> usize {
        self.trie.node_count()
    }

    pub fn max_size(&self) -> usize {
        self.policy.max_size()
    }

    /// Changes the bound, evicting down to it if necessary.
    ///
    /// If the policy refuses to evict, the previous bound is restored and
    /// `CapacityExceeded` is returned.
    pub fn set_max_size(&mut self, max_size: usize) -> PitResult<()> {
        let previous = self.policy.max_size();
        self.policy.set_max_size(max_size);
        if max_size != 0 {
            if let Err(e) = self.evict_down_to(max_size) {
                self.policy.set_max_size(previous);
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn policy(&self) -> &dyn EvictionPolicy {
        self.policy.as_ref()
    }

    pub fn get(&self, id: EntryId) -> Option<&PitEntry> {
        self.trie.payload(id.handle())
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut PitEntry> {
        self.trie.payload_mut(id.handle())
    }

    /// Finds the entry a Content Object named `name` satisfies: the live
    /// entry whose name is the longest prefix of `name`.
    pub fn lookup_by_content(&self, name: &Name) -> Option<&PitEntry> {
        let found = self
            .trie
            .longest_prefix_descend(name)
            .and_then(|h| self.trie.payload(h));
        trace!(%name, hit = found.is_some(), "PIT lookup by content");
        found
    }

    /// Finds the entry for exactly `name`. Misses unless the full path exists
    /// and its terminal node carries an entry.
    pub fn lookup_by_interest(&self, name: &Name) -> Option<&PitEntry> {
        let found = self
            .trie
            .exact_descend(name)
            .and_then(|h| self.trie.payload(h));
        trace!(%name, hit = found.is_some(), "PIT lookup by interest");
        found
    }

    /// Mutable variant of [`lookup_by_interest`](Self::lookup_by_interest).
    pub fn lookup_by_interest_mut(&mut self, name: &Name) -> Option<&mut PitEntry> {
        let handle = self.trie.exact_descend(name)?;
        self.trie.payload_mut(handle)
    }

    /// Returns the entry for `interest.name`, creating it if absent.
    ///
    /// An existing entry is returned unmodified (aggregation). Otherwise the
    /// FIB is consulted, one victim may be evicted to respect the bound, and
    /// a new entry expiring after the Interest's lifetime is inserted.
    ///
    /// # Errors
    ///
    /// * `CapacityExceeded` if the table is full and the policy refuses to evict.
    /// * `Trie` if the name exceeds the configured depth.
    ///
    /// # Panics
    ///
    /// Panics if `fib` has no route for the name. A default route must always
    /// be installed; its absence is a misconfiguration, not a lookup miss.
    pub fn create(&mut self, interest: &Interest, fib: &dyn Fib) -> PitResult<&mut PitEntry> {
        let name = &interest.name;

        let existing = self
            .trie
            .exact_descend(name)
            .filter(|h| self.trie.payload(*h).is_some());
        if let Some(handle) = existing {
            let id = EntryId::from(handle);
            let entry = self
                .trie
                .payload_mut(handle)
                .ok_or(PitError::InvalidHandle(id))?;
            self.observer.on_aggregated(entry);
            return Ok(entry);
        }

        let route = match fib.longest_prefix_match(name) {
            Some(route) => route,
            None => panic!(
                "FIB has no route for {name}; a default route must always be configured"
            ),
        };

        self.trie.check_depth(name)?;
        self.admit()?;

        let now = self.clock.now();
        let expire_at = now.adding(interest.lifetime.unwrap_or(self.default_lifetime));
        let (handle, _) = self.trie.insert_with(name, |handle| {
            PitEntry::new(EntryId::from(handle), interest, route, now, expire_at)
        })?;
        let id = EntryId::from(handle);

        self.policy.on_insert(id, expire_at);
        self.expiry.schedule(expire_at, id);

        let entry = self
            .trie
            .payload_mut(handle)
            .ok_or(PitError::InvalidHandle(id))?;
        self.observer.on_created(entry);
        Ok(entry)
    }

    /// Removes the entry behind `id`, pruning trie nodes it no longer needs.
    ///
    /// # Errors
    ///
    /// `InvalidHandle` if the entry was already erased.
    pub fn erase(&mut self, id: EntryId) -> PitResult<PitEntry> {
        self.erase_with_reason(id, EraseReason::Explicit)
    }

    /// Pushes the entry's expiry to `lifetime` (or the default) from now.
    pub fn refresh(&mut self, id: EntryId, lifetime: Option<Duration>) -> PitResult<Timestamp> {
        let expire_at = self
            .clock
            .now()
            .adding(lifetime.unwrap_or(self.default_lifetime));
        let entry = self
            .trie
            .payload_mut(id.handle())
            .ok_or(PitError::InvalidHandle(id))?;
        entry.expire_at = expire_at;
        self.policy.on_refresh(id, expire_at);
        self.expiry.schedule(expire_at, id);
        self.maybe_compact_expiry();
        Ok(expire_at)
    }

    /// Removes every entry with `expire_at <= now`. Returns how many were removed.
    ///
    /// Uses the expiry index, so the cost depends on the number of due
    /// entries rather than the table size. Sweeping again with no new due
    /// entries removes nothing.
    pub fn sweep_expired(&mut self, now: Timestamp) -> usize {
        let mut removed = 0;
        while let Some((at, id)) = self.expiry.pop_due(now) {
            let current = self.trie.payload(id.handle()).map(PitEntry::expire_at);
            if current != Some(at) {
                continue;
            }
            if self.erase_with_reason(id, EraseReason::Expired).is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            info!(removed, remaining = self.len(), %now, "Expired PIT entries swept");
        }
        removed
    }

    /// Sweeps with the injected clock's current time.
    pub fn sweep_due(&mut self) -> usize {
        let now = self.clock.now();
        self.sweep_expired(now)
    }

    /// Earliest pending expiry, if any. May be stale; a sweep at that time
    /// is always safe.
    pub fn next_expiry(&self) -> Option<Timestamp> {
        self.expiry.next_deadline()
    }

    /// First live entry in trie order, or [`end`](Self::end).
    pub fn begin(&self) -> Option<&PitEntry> {
        self.trie.first().and_then(|h| self.trie.payload(h))
    }

    /// Live entry following `from` in trie order, or [`end`](Self::end).
    ///
    /// Resumes from `from`'s node. If `from` was erased the traversal cannot
    /// resume and `end` is returned; restart with [`begin`](Self::begin).
    pub fn next(&self, from: EntryId) -> Option<&PitEntry> {
        self.trie
            .next_after(from.handle())
            .and_then(|h| self.trie.payload(h))
    }

    /// The end-of-traversal sentinel.
    pub fn end(&self) -> Option<&PitEntry> {
        None
    }

    /// Iterates over live entries in trie order.
    pub fn iter(&self) -> impl Iterator<Item = &PitEntry> + '_ {
        self.trie.iter().map(|(_, entry)| entry)
    }

    /// Writes one line per live entry in trie order.
    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for entry in self.iter() {
            writeln!(out, "{}\t{}", entry.name(), entry)?;
        }
        Ok(())
    }

    /// Drops every entry without notifying the observer.
    pub fn clear(&mut self) {
        let dropped = self.trie.len();
        self.trie.clear();
        self.policy.clear();
        self.expiry.clear();
        info!(dropped, "PIT cleared");
    }

    fn admit(&mut self) -> PitResult<()> {
        let max_size = self.policy.max_size();
        if max_size == 0 {
            return Ok(());
        }
        self.evict_down_to(max_size - 1)
    }

    fn evict_down_to(&mut self, target: usize) -> PitResult<()> {
        while self.policy.len() > target {
            let max_size = self.policy.max_size();
            let victim = match self.policy.select_victim() {
                Some(victim) => victim,
                None => {
                    warn!(
                        max_size,
                        policy = self.policy.name(),
                        "PIT full, insertion refused"
                    );
                    return Err(PitError::CapacityExceeded { max_size });
                }
            };
            let evicted = self.erase_with_reason(victim, EraseReason::Evicted)?;
            info!(
                name = %evicted.name(),
                policy = self.policy.name(),
                "PIT entry evicted"
            );
        }
        Ok(())
    }

    fn erase_with_reason(&mut self, id: EntryId, reason: EraseReason) -> PitResult<PitEntry> {
        let entry = self
            .trie
            .erase(id.handle())
            .map_err(|_| PitError::InvalidHandle(id))?;
        self.policy.on_erase(id);
        self.observer.on_erased(&entry, reason);
        self.maybe_compact_expiry();
        Ok(entry)
    }

    fn maybe_compact_expiry(&mut self) {
        let queued = self.expiry.len();
        if queued <= EXPIRY_COMPACT_SLACK || queued <= 2 * self.trie.len() {
            return;
        }
        let trie = &self.trie;
        self.expiry.compact(|at, id| {
            trie.payload(id.handle())
                .map_or(false, |entry| entry.expire_at == at)
        });
    }
}

impl fmt::Display for PitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.iter() {
            writeln!(f, "{}\t{}", entry.name(), entry)?;
        }
        Ok(())
    }
}
