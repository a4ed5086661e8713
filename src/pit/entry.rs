// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! PIT entries and the Interest fields the table consumes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

use fnv::FnvHashSet;

use super::fib::FibRoute;
use crate::clock::Timestamp;
use crate::data_structures::name_trie::NodeHandle;
use crate::name::Name;

/// Identifier of a network face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(pub u32);

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle to a PIT entry.
///
/// Wraps the handle of the trie node that owns the entry. Erasing the entry
/// invalidates the handle, even if a later entry is created for the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(NodeHandle);

impl EntryId {
    pub(crate) fn handle(self) -> NodeHandle {
        self.0
    }
}

impl From<NodeHandle> for EntryId {
    fn from(handle: NodeHandle) -> Self {
        Self(handle)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The fields of an incoming Interest that the PIT needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    pub name: Name,
    pub incoming_face: FaceId,
    pub nonce: Option<u32>,
    /// Requested lifetime; the table default applies when absent.
    pub lifetime: Option<Duration>,
}

impl Interest {
    pub fn new(name: Name, incoming_face: FaceId) -> Self {
        Self {
            name,
            incoming_face,
            nonce: None,
            lifetime: None,
        }
    }

    pub fn with_nonce(mut self, nonce: u32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

/// The record kept for one pending Interest name.
///
/// Owned by the trie node at `name`. The expiry time can only be changed
/// through [`PitTable::refresh`](super::PitTable::refresh) so that the
/// table's expiry index stays consistent.
#[derive(Debug, Clone)]
pub struct PitEntry {
    id: EntryId,
    name: Name,
    route: FibRoute,
    created_at: Timestamp,
    pub(crate) expire_at: Timestamp,
    /// Requesting faces and the last nonce each sent
    incoming: BTreeMap<FaceId, Option<u32>>,
    outgoing: BTreeSet<FaceId>,
    nonces: FnvHashSet<u32>,
    retransmissions: u32,
}

impl PitEntry {
    pub(crate) fn new(
        id: EntryId,
        interest: &Interest,
        route: FibRoute,
        created_at: Timestamp,
        expire_at: Timestamp,
    ) -> Self {
        let mut entry = Self {
            id,
            name: interest.name.clone(),
            route,
            created_at,
            expire_at,
            incoming: BTreeMap::new(),
            outgoing: BTreeSet::new(),
            nonces: FnvHashSet::default(),
            retransmissions: 0,
        };
        entry.add_incoming(interest.incoming_face, interest.nonce);
        entry
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The FIB route resolved when the entry was created.
    pub fn route(&self) -> &FibRoute {
        &self.route
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expire_at(&self) -> Timestamp {
        self.expire_at
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at <= now
    }

    pub fn incoming_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.incoming.keys().copied()
    }

    pub fn outgoing_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.outgoing.iter().copied()
    }

    pub fn retransmissions(&self) -> u32 {
        self.retransmissions
    }

    /// Whether `nonce` was already seen on this entry.
    pub fn has_nonce(&self, nonce: u32) -> bool {
        self.nonces.contains(&nonce)
    }

    /// Records a requesting face. Returns `true` if the face is new.
    pub fn add_incoming(&mut self, face: FaceId, nonce: Option<u32>) -> bool {
        if let Some(n) = nonce {
            self.nonces.insert(n);
        }
        self.incoming.insert(face, nonce).is_none()
    }

    pub fn remove_incoming(&mut self, face: FaceId) -> bool {
        self.incoming.remove(&face).is_some()
    }

    /// Records a face the Interest was forwarded on. Forwarding again on a
    /// known face counts as a retransmission.
    pub fn add_outgoing(&mut self, face: FaceId) {
        if !self.outgoing.insert(face) {
            self.retransmissions += 1;
        }
    }
}

impl fmt::Display for PitEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces = |it: &mut dyn Iterator<Item = FaceId>| {
            it.map(|face| face.to_string()).collect::<Vec<_>>().join(",")
        };
        write!(
            f,
            "expires={} in=[{}] out=[{}] retx={} route={}",
            self.expire_at,
            faces(&mut self.incoming_faces()),
            faces(&mut self.outgoing_faces()),
            self.retransmissions,
            self.route.prefix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> PitEntry {
        let interest = Interest::new(Name::parse("/a/b").unwrap(), FaceId(1)).with_nonce(42);
        let route = FibRoute::new(Name::new(), vec![FaceId(9)]);
        let id = EntryId(NodeHandle {
            index: 3,
            generation: 7,
        });
        PitEntry::new(
            id,
            &interest,
            route,
            Timestamp::from_millis(0),
            Timestamp::from_millis(4_000),
        )
    }

    #[test]
    fn test_new_entry_records_requester() {
        let e = entry();
        assert_eq!(e.incoming_faces().collect::<Vec<_>>(), vec![FaceId(1)]);
        assert!(e.has_nonce(42));
        assert!(!e.has_nonce(43));
        assert!(!e.is_expired(Timestamp::from_millis(3_999)));
        assert!(e.is_expired(Timestamp::from_millis(4_000)));
    }

    #[test]
    fn test_faces_and_retransmissions() {
        let mut e = entry();
        assert!(!e.add_incoming(FaceId(1), Some(43)));
        assert!(e.add_incoming(FaceId(2), None));
        assert!(e.has_nonce(43));

        e.add_outgoing(FaceId(9));
        e.add_outgoing(FaceId(9));
        assert_eq!(e.retransmissions(), 1);
        assert!(e.remove_incoming(FaceId(2)));
        assert_eq!(
            e.to_string(),
            "expires=4000ms in=[1] out=[9] retx=1 route=/"
        );
    }
}
