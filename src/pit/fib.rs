// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Forwarding Information Base collaborator.
//!
//! The PIT only needs longest-prefix route resolution, expressed by the
//! [`Fib`] trait. [`StaticFib`] is a small in-memory implementation on top of
//! the same [`NameTrie`] the table uses.

use std::collections::BTreeSet;

use tracing::debug;

use super::entry::FaceId;
use crate::data_structures::name_trie::{NameTrie, NameTrieResult};
use crate::name::Name;

/// A resolved route: the matching prefix and its next hops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FibRoute {
    pub prefix: Name,
    pub next_hops: Vec<FaceId>,
}

impl FibRoute {
    pub fn new(prefix: Name, next_hops: Vec<FaceId>) -> Self {
        Self { prefix, next_hops }
    }
}

/// Route lookup consumed by [`PitTable::create`](super::PitTable::create).
///
/// Implementations must return a route for every name admitted to the PIT;
/// deployments guarantee this by installing a default route on `/`.
#[cfg_attr(test, mockall::automock)]
pub trait Fib {
    fn longest_prefix_match(&self, name: &Name) -> Option<FibRoute>;
}

/// In-memory FIB keyed by name prefix.
#[derive(Debug, Default)]
pub struct StaticFib {
    routes: NameTrie<BTreeSet<FaceId>>,
}

impl StaticFib {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds next hops for `prefix`, merging with any already registered.
    pub fn add_route(
        &mut self,
        prefix: &Name,
        faces: impl IntoIterator<Item = FaceId>,
    ) -> NameTrieResult<()> {
        let (handle, _) = self.routes.insert_with(prefix, |_| BTreeSet::new())?;
        if let Some(hops) = self.routes.payload_mut(handle) {
            hops.extend(faces);
            debug!(prefix = %prefix, next_hops = hops.len(), "FIB route added");
        }
        Ok(())
    }

    /// Removes every next hop for `prefix`. Returns `false` if none was registered.
    pub fn remove_route(&mut self, prefix: &Name) -> bool {
        let handle = match self.routes.exact_descend(prefix) {
            Some(h) => h,
            None => return false,
        };
        self.routes.erase(handle).is_ok()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Fib for StaticFib {
    fn longest_prefix_match(&self, name: &Name) -> Option<FibRoute> {
        let handle = self.routes.longest_prefix_descend(name)?;
        let hops = self.routes.payload(handle)?;
        let prefix = self.routes.name_of(handle)?;
        Some(FibRoute::new(prefix, hops.iter().copied().collect()))
    }
}
