// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Expiry Queue Implementation
//!
//! A min-ordered index of `(deadline, key)` pairs. It is independent of
//! whatever structure owns the keyed items, so expiring items never requires
//! a full traversal of that structure.
//!
//! # Lazy invalidation
//!
//! Keys are never removed from the middle of the heap. When an item is erased
//! or its deadline changes, the old pair simply stays queued; the owner checks
//! each popped pair against its own state and discards pairs that no longer
//! match. [`ExpiryQueue::compact`] rebuilds the heap once stale pairs dominate.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::clock::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled<K> {
    at: Timestamp,
    seq: u64,
    key: K,
}

impl<K: Eq> Ord for Scheduled<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // FIFO among equal deadlines
        self.at
            .cmp(&other.at)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<K: Eq> PartialOrd for Scheduled<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A min-priority queue of deadlines.
#[derive(Debug)]
pub struct ExpiryQueue<K> {
    heap: BinaryHeap<Reverse<Scheduled<K>>>,
    next_seq: u64,
}

impl<K: Copy + Eq> ExpiryQueue<K> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Number of queued pairs, stale ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queues `key` to expire at `at`.
    pub fn schedule(&mut self, at: Timestamp, key: K) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { at, seq, key }));
    }

    /// Earliest queued deadline.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.heap.peek().map(|Reverse(s)| s.at)
    }

    /// Pops the earliest pair if its deadline is at or before `now`.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<(Timestamp, K)> {
        if self.next_deadline()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(s)| (s.at, s.key))
    }

    /// Drops every pair for which `keep` returns `false`.
    pub fn compact<F>(&mut self, mut keep: F)
    where
        F: FnMut(Timestamp, &K) -> bool,
    {
        let heap = std::mem::take(&mut self.heap);
        self.heap = heap
            .into_iter()
            .filter(|Reverse(s)| keep(s.at, &s.key))
            .collect();
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<K: Copy + Eq> Default for ExpiryQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
