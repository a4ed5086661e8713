// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Size-bounding eviction policies.
//!
//! A policy tracks the live entry set and, when the table is at its bound,
//! nominates a victim. The table performs the actual erase, so a policy never
//! mutates the trie. A `max_size` of 0 means unbounded.
//!
//! Three strategies are provided:
//!
//! | Policy          | Victim                                    |
//! |-----------------|-------------------------------------------|
//! | `Fifo`          | oldest-inserted entry                     |
//! | `NearestExpiry` | entry with the earliest expiry time       |
//! | `Persistent`    | none; new insertions are refused when full |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use fnv::FnvBuildHasher;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::entry::EntryId;
use crate::clock::Timestamp;

/// Pluggable strategy bounding the number of PIT entries.
pub trait EvictionPolicy: Send + Sync + Debug {
    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    fn max_size(&self) -> usize;

    fn set_max_size(&mut self, max_size: usize);

    /// Number of entries currently tracked.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether admitting one more entry would exceed the bound.
    fn is_full(&self) -> bool {
        let max = self.max_size();
        max != 0 && self.len() >= max
    }

    fn on_insert(&mut self, id: EntryId, expire_at: Timestamp);

    /// The entry's expiry time changed.
    fn on_refresh(&mut self, _id: EntryId, _expire_at: Timestamp) {}

    fn on_erase(&mut self, id: EntryId);

    /// Nominates the entry to evict, or `None` to refuse admission.
    fn select_victim(&self) -> Option<EntryId>;

    fn clear(&mut self);
}

/// Policy selector used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionKind {
    #[default]
    Fifo,
    NearestExpiry,
    Persistent,
}

impl EvictionKind {
    /// Builds a policy of this kind with the given bound.
    pub fn build(self, max_size: usize) -> Box<dyn EvictionPolicy> {
        match self {
            EvictionKind::Fifo => Box::new(FifoPolicy::new(max_size)),
            EvictionKind::NearestExpiry => Box::new(NearestExpiryPolicy::new(max_size)),
            EvictionKind::Persistent => Box::new(PersistentPolicy::new(max_size)),
        }
    }
}

type IdMap<V> = HashMap<EntryId, V, FnvBuildHasher>;

/// Evicts the oldest-inserted entry.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    max_size: usize,
    next_seq: u64,
    order: BTreeMap<u64, EntryId>,
    seq_of: IdMap<u64>,
}

impl FifoPolicy {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }
}

impl EvictionPolicy for FifoPolicy {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    fn len(&self) -> usize {
        self.seq_of.len()
    }

    fn on_insert(&mut self, id: EntryId, _expire_at: Timestamp) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(old) = self.seq_of.insert(id, seq) {
            self.order.remove(&old);
        }
        self.order.insert(seq, id);
    }

    fn on_erase(&mut self, id: EntryId) {
        if let Some(seq) = self.seq_of.remove(&id) {
            self.order.remove(&seq);
        }
    }

    fn select_victim(&self) -> Option<EntryId> {
        self.order.values().next().copied()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.seq_of.clear();
    }
}

/// Evicts the entry closest to expiring; ties go to the oldest insertion.
#[derive(Debug, Default)]
pub struct NearestExpiryPolicy {
    max_size: usize,
    next_seq: u64,
    by_expiry: BTreeSet<(Timestamp, u64, EntryId)>,
    key_of: IdMap<(Timestamp, u64)>,
}

impl NearestExpiryPolicy {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }
}

impl EvictionPolicy for NearestExpiryPolicy {
    fn name(&self) -> &'static str {
        "nearest-expiry"
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    fn len(&self) -> usize {
        self.key_of.len()
    }

    fn on_insert(&mut self, id: EntryId, expire_at: Timestamp) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some((at, old_seq)) = self.key_of.insert(id, (expire_at, seq)) {
            self.by_expiry.remove(&(at, old_seq, id));
        }
        self.by_expiry.insert((expire_at, seq, id));
    }

    fn on_refresh(&mut self, id: EntryId, expire_at: Timestamp) {
        if let Some(key) = self.key_of.get_mut(&id) {
            self.by_expiry.remove(&(key.0, key.1, id));
            key.0 = expire_at;
            self.by_expiry.insert((expire_at, key.1, id));
        }
    }

    fn on_erase(&mut self, id: EntryId) {
        if let Some((at, seq)) = self.key_of.remove(&id) {
            self.by_expiry.remove(&(at, seq, id));
        }
    }

    fn select_victim(&self) -> Option<EntryId> {
        self.by_expiry.iter().next().map(|&(_, _, id)| id)
    }

    fn clear(&mut self) {
        self.by_expiry.clear();
        self.key_of.clear();
    }
}

/// Never evicts; the table refuses insertions once the bound is reached.
#[derive(Debug, Default)]
pub struct PersistentPolicy {
    max_size: usize,
    live: usize,
}

impl PersistentPolicy {
    pub fn new(max_size: usize) -> Self {
        Self { max_size, live: 0 }
    }
}

impl EvictionPolicy for PersistentPolicy {
    fn name(&self) -> &'static str {
        "persistent"
    }

    fn max_size(&self) -> usize {
        self.max_size
    }

    fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
    }

    fn len(&self) -> usize {
        self.live
    }

    fn on_insert(&mut self, _id: EntryId, _expire_at: Timestamp) {
        self.live += 1;
    }

    fn on_erase(&mut self, _id: EntryId) {
        self.live = self.live.saturating_sub(1);
    }

    fn select_victim(&self) -> Option<EntryId> {
        None
    }

    fn clear(&mut self) {
        self.live = 0;
    }
}
