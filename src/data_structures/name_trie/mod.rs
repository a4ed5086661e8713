// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Name Trie Implementation
//!
//! This module provides a hierarchical index keyed by [`Name`]. Each node
//! corresponds to one name component and holds at most one payload.
//!
//! Key features:
//! * Exact descent (full path must exist) and longest-prefix descent
//! * Stable [`NodeHandle`]s for O(1) removal, backed by a slab arena
//! * Pruning of payload-free, childless nodes on removal
//! * Deterministic pre-order traversal, siblings sorted by component bytes
//!
//! The trie itself performs no locking; callers that share it across threads
//! serialize mutations externally.

mod error;
mod node;

use std::collections::BTreeMap;
use std::ops::Bound;

use slab::Slab;

use crate::name::{Name, NameComponent};

pub use error::NameTrieError;
pub use node::NodeHandle;
use node::TrieNode;

/// Result type for name trie operations
pub type NameTrieResult<T> = Result<T, NameTrieError>;

/// Configuration options for the name trie
#[derive(Debug, Clone)]
pub struct NameTrieConfig {
    /// Maximum number of components accepted on insertion
    pub max_depth: usize,
}

impl Default for NameTrieConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// A hierarchical, component-keyed trie with at most one payload per node.
#[derive(Debug)]
pub struct NameTrie<T> {
    /// Arena of nodes; indices stay stable until a node is pruned
    nodes: Slab<TrieNode<T>>,

    /// Slab index of the root node
    root: usize,

    /// Number of nodes that carry a payload
    len: usize,

    /// Next generation stamp to hand out
    next_generation: u64,

    config: NameTrieConfig,
}

impl<T> NameTrie<T> {
    /// Creates a new trie holding only the root node.
    pub fn new() -> Self {
        Self::with_config(NameTrieConfig::default())
    }

    /// Creates a new trie with the specified configuration.
    pub fn with_config(config: NameTrieConfig) -> Self {
        let mut nodes = Slab::new();
        let root = nodes.insert(TrieNode::root(0));
        Self {
            nodes,
            root,
            len: 0,
            next_generation: 1,
            config,
        }
    }

    /// Number of payload-carrying nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no node carries a payload.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of nodes, including the root and payload-free interior nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Handle of the root node (the empty name).
    pub fn root(&self) -> NodeHandle {
        self.handle_at(self.root)
    }

    /// Checks that `name` fits within the configured maximum depth.
    pub fn check_depth(&self, name: &Name) -> NameTrieResult<()> {
        if name.len() > self.config.max_depth {
            return Err(NameTrieError::NameTooLong {
                name: name.to_string(),
                max_depth: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// Descends along `name`, creating one node per missing component.
    ///
    /// Returns the terminal node and whether it is free to receive a payload.
    /// An existing payload is never overwritten: in that case `false` is
    /// returned and the caller aggregates onto the existing payload.
    ///
    /// Nodes created here stay in the trie until a payload is attached and
    /// later erased, or until [`prune`](Self::prune) is called.
    pub fn insert(&mut self, name: &Name) -> NameTrieResult<(NodeHandle, bool)> {
        let index = self.materialize(name)?;
        let is_new = self.nodes[index].payload.is_none();
        Ok((self.handle_at(index), is_new))
    }

    /// Inserts `name` and, if its terminal node is free, attaches the payload
    /// produced by `make`. `make` receives the final handle of the node so the
    /// payload can keep a reference back to it.
    ///
    /// Returns the handle of the terminal node and whether a payload was attached.
    pub fn insert_with<F>(&mut self, name: &Name, make: F) -> NameTrieResult<(NodeHandle, bool)>
    where
        F: FnOnce(NodeHandle) -> T,
    {
        let index = self.materialize(name)?;
        if self.nodes[index].payload.is_some() {
            return Ok((self.handle_at(index), false));
        }
        let handle = self.attach(index, make);
        Ok((handle, true))
    }

    /// Attaches a payload to a payload-free node returned by [`insert`](Self::insert).
    ///
    /// The node is re-stamped, so the returned handle supersedes the one passed in.
    pub fn set_payload(&mut self, handle: NodeHandle, payload: T) -> NameTrieResult<NodeHandle> {
        let node = self
            .node(handle)
            .ok_or(NameTrieError::InvalidHandle(handle))?;
        if node.payload.is_some() {
            return Err(NameTrieError::Occupied(handle));
        }
        Ok(self.attach(handle.index, |_| payload))
    }

    /// Walks `name` component by component.
    ///
    /// Returns `None` unless every component resolves to an existing child.
    /// The returned node may carry no payload.
    pub fn exact_descend(&self, name: &Name) -> Option<NodeHandle> {
        let mut current = self.root;
        for component in name.components() {
            current = *self.nodes[current].children.get(component)?;
        }
        Some(self.handle_at(current))
    }

    /// Walks `name` while matching children exist and returns the deepest
    /// visited node that carries a payload. The root is considered too.
    pub fn longest_prefix_descend(&self, name: &Name) -> Option<NodeHandle> {
        let mut current = self.root;
        let mut best = self.nodes[current].payload.as_ref().map(|_| current);
        for component in name.components() {
            match self.nodes[current].children.get(component) {
                Some(&child) => {
                    current = child;
                    if self.nodes[current].payload.is_some() {
                        best = Some(current);
                    }
                }
                None => break,
            }
        }
        best.map(|index| self.handle_at(index))
    }

    /// Removes the payload at `handle` and prunes the ancestor chain.
    ///
    /// `handle` is stale afterwards even when its node survives as an
    /// interior node.
    ///
    /// Pruning walks upward removing every node that has become childless and
    /// payload-free, stopping at the first ancestor that still has children or
    /// a payload, or at the root.
    pub fn erase(&mut self, handle: NodeHandle) -> NameTrieResult<T> {
        let payload = self
            .nodes
            .get_mut(handle.index)
            .filter(|n| n.generation == handle.generation)
            .and_then(|n| n.payload.take())
            .ok_or(NameTrieError::InvalidHandle(handle))?;
        self.len -= 1;
        // A node kept for its children must not stay reachable through `handle`.
        let generation = self.stamp();
        self.nodes[handle.index].generation = generation;
        self.prune_from(handle.index);
        Ok(payload)
    }

    /// Prunes a payload-free node left behind by [`insert`](Self::insert).
    /// Does nothing if the node is live or still has children.
    pub fn prune(&mut self, handle: NodeHandle) {
        if self.node(handle).is_some() {
            self.prune_from(handle.index);
        }
    }

    /// Returns the payload at `handle`, if the handle is current.
    pub fn payload(&self, handle: NodeHandle) -> Option<&T> {
        self.node(handle).and_then(|n| n.payload.as_ref())
    }

    /// Returns the payload at `handle` mutably, if the handle is current.
    pub fn payload_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        self.nodes
            .get_mut(handle.index)
            .filter(|n| n.generation == handle.generation)
            .and_then(|n| n.payload.as_mut())
    }

    /// Reconstructs the name whose path ends at `handle`.
    pub fn name_of(&self, handle: NodeHandle) -> Option<Name> {
        self.node(handle)?;
        let mut components: Vec<&NameComponent> = Vec::new();
        let mut current = handle.index;
        while let Some(parent) = self.nodes[current].parent {
            if let Some(component) = &self.nodes[current].component {
                components.push(component);
            }
            current = parent;
        }
        Some(Name::from_components(components.into_iter().rev().cloned()))
    }

    /// Pre-order traversal over every node, siblings in component order.
    /// Callers filter for payload-carrying nodes.
    pub fn traverse(&self) -> Traverse<'_, T> {
        Traverse {
            trie: self,
            stack: vec![self.root],
        }
    }

    /// Iterates over payload-carrying nodes in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &T)> + '_ {
        self.traverse()
            .filter_map(move |h| self.payload(h).map(|p| (h, p)))
    }

    /// First payload-carrying node in traversal order.
    pub fn first(&self) -> Option<NodeHandle> {
        self.scan_from(Some(self.root))
    }

    /// Next payload-carrying node after `handle` in traversal order.
    ///
    /// Resumes from the node itself, so each step is bounded by the node
    /// count. Returns `None` at the end or if `handle` is stale.
    pub fn next_after(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.node(handle)?;
        self.scan_from(self.successor(handle.index))
    }

    /// Drops every node except a fresh root. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        let generation = self.stamp();
        self.root = self.nodes.insert(TrieNode::root(generation));
        self.len = 0;
    }

    fn node(&self, handle: NodeHandle) -> Option<&TrieNode<T>> {
        self.nodes
            .get(handle.index)
            .filter(|n| n.generation == handle.generation)
    }

    fn handle_at(&self, index: usize) -> NodeHandle {
        NodeHandle {
            index,
            generation: self.nodes[index].generation,
        }
    }

    fn stamp(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn materialize(&mut self, name: &Name) -> NameTrieResult<usize> {
        self.check_depth(name)?;

        let mut current = self.root;
        for component in name.components() {
            current = match self.nodes[current].children.get(component) {
                Some(&child) => child,
                None => {
                    let generation = self.stamp();
                    let child = self
                        .nodes
                        .insert(TrieNode::child(component.clone(), current, generation));
                    self.nodes[current]
                        .children
                        .insert(component.clone(), child);
                    child
                }
            };
        }
        Ok(current)
    }

    fn attach<F>(&mut self, index: usize, make: F) -> NodeHandle
    where
        F: FnOnce(NodeHandle) -> T,
    {
        let generation = self.stamp();
        let handle = NodeHandle { index, generation };
        let node = &mut self.nodes[index];
        node.generation = generation;
        node.payload = Some(make(handle));
        self.len += 1;
        handle
    }

    fn prune_from(&mut self, mut index: usize) {
        while index != self.root && self.nodes[index].is_garbage() {
            let node = self.nodes.remove(index);
            match (node.parent, node.component) {
                (Some(parent), Some(component)) => {
                    self.nodes[parent].children.remove(&component);
                    index = parent;
                }
                _ => break,
            }
        }
    }

    /// Pre-order successor of `index`: first child, else the next sibling of
    /// the nearest ancestor that has one.
    fn successor(&self, index: usize) -> Option<usize> {
        if let Some(&child) = self.nodes[index].children.values().next() {
            return Some(child);
        }
        let mut current = index;
        loop {
            let node = &self.nodes[current];
            let (parent, component) = match (node.parent, node.component.as_ref()) {
                (Some(p), Some(c)) => (p, c),
                _ => return None,
            };
            let siblings: &BTreeMap<NameComponent, usize> = &self.nodes[parent].children;
            if let Some((_, &next)) = siblings
                .range::<NameComponent, _>((Bound::Excluded(component), Bound::Unbounded))
                .next()
            {
                return Some(next);
            }
            current = parent;
        }
    }

    fn scan_from(&self, mut index: Option<usize>) -> Option<NodeHandle> {
        while let Some(i) = index {
            if self.nodes[i].payload.is_some() {
                return Some(self.handle_at(i));
            }
            index = self.successor(i);
        }
        None
    }
}

impl<T> Default for NameTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over trie node handles.
#[derive(Debug)]
pub struct Traverse<'a, T> {
    trie: &'a NameTrie<T>,
    stack: Vec<usize>,
}

impl<T> Iterator for Traverse<'_, T> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        self.stack
            .extend(self.trie.nodes[index].children.values().rev().copied());
        Some(self.trie.handle_at(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    fn put(trie: &mut NameTrie<String>, uri: &str) -> NodeHandle {
        let (handle, is_new) = trie.insert_with(&name(uri), |_| uri.to_string()).unwrap();
        assert!(is_new);
        handle
    }

    #[test]
    fn test_trie_basic_operations() {
        let mut trie = NameTrie::new();
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);

        let h = put(&mut trie, "/a/b");
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.payload(h), Some(&"/a/b".to_string()));
        assert_eq!(trie.name_of(h), Some(name("/a/b")));

        // Aggregation: second insert neither overwrites nor creates.
        let (again, is_new) = trie.insert_with(&name("/a/b"), |_| "other".to_string()).unwrap();
        assert!(!is_new);
        assert_eq!(again, h);
        assert_eq!(trie.payload(h), Some(&"/a/b".to_string()));

        assert_eq!(trie.erase(h).unwrap(), "/a/b");
        assert!(trie.is_empty());
        assert_eq!(trie.node_count(), 1);
        assert_eq!(trie.erase(h), Err(NameTrieError::InvalidHandle(h)));
    }

    #[test]
    fn test_insert_then_set_payload() {
        let mut trie = NameTrie::new();
        let (h, is_new) = trie.insert(&name("/x/y")).unwrap();
        assert!(is_new);
        assert_eq!(trie.payload(h), None);

        let attached = trie.set_payload(h, 7u32).unwrap();
        assert_ne!(attached, h);
        assert_eq!(trie.payload(attached), Some(&7));
        assert_eq!(trie.payload(h), None);
        assert_eq!(
            trie.set_payload(attached, 8),
            Err(NameTrieError::Occupied(attached))
        );
    }

    #[test]
    fn test_prune_unused_path() {
        let mut trie: NameTrie<u8> = NameTrie::new();
        let (h, _) = trie.insert(&name("/p/q/r")).unwrap();
        assert_eq!(trie.node_count(), 4);
        trie.prune(h);
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_exact_descend_requires_full_path() {
        let mut trie = NameTrie::new();
        put(&mut trie, "/a");
        put(&mut trie, "/a/b/c");

        assert!(trie.exact_descend(&name("/a/b/x")).is_none());
        // Interior node exists but carries no payload.
        let interior = trie.exact_descend(&name("/a/b")).unwrap();
        assert!(trie.payload(interior).is_none());
        assert!(trie.exact_descend(&name("/a/b/c")).is_some());
    }

    #[test]
    fn test_longest_prefix_descend() {
        let mut trie = NameTrie::new();
        let a = put(&mut trie, "/a");
        let abc = put(&mut trie, "/a/b/c");

        assert_eq!(trie.longest_prefix_descend(&name("/a/b/c/d")), Some(abc));
        // /a/b is only an interior node, so /a wins.
        assert_eq!(trie.longest_prefix_descend(&name("/a/b/z")), Some(a));
        assert_eq!(trie.longest_prefix_descend(&name("/z")), None);

        let root = put(&mut trie, "/");
        assert_eq!(trie.longest_prefix_descend(&name("/z")), Some(root));
    }

    #[test]
    fn test_erase_stops_at_shared_ancestor() {
        let mut trie = NameTrie::new();
        put(&mut trie, "/a/b/c");
        let abd = put(&mut trie, "/a/b/d/e");
        assert_eq!(trie.node_count(), 6);

        trie.erase(abd).unwrap();
        // /a/b/d and /a/b/d/e pruned, /a/b kept for /a/b/c.
        assert_eq!(trie.node_count(), 4);
        assert!(trie.exact_descend(&name("/a/b/c")).is_some());
        assert!(trie.exact_descend(&name("/a/b/d")).is_none());
    }

    #[test]
    fn test_erase_keeps_node_with_children() {
        let mut trie = NameTrie::new();
        let ab = put(&mut trie, "/a/b");
        put(&mut trie, "/a/b/c");
        trie.erase(ab).unwrap();
        assert_eq!(trie.node_count(), 4);
        let interior = trie.exact_descend(&name("/a/b")).unwrap();
        assert!(trie.payload(interior).is_none());

        // The surviving node no longer answers to the erased handle.
        assert_ne!(interior, ab);
        assert_eq!(trie.next_after(ab), None);
        assert_eq!(trie.name_of(ab), None);
        assert_eq!(
            trie.set_payload(ab, "again".to_string()),
            Err(NameTrieError::InvalidHandle(ab))
        );
        assert!(trie.set_payload(interior, "again".to_string()).is_ok());
    }

    #[test]
    fn test_reused_slot_invalidates_old_handle() {
        let mut trie = NameTrie::new();
        let old = put(&mut trie, "/a");
        trie.erase(old).unwrap();
        let new = put(&mut trie, "/a");
        assert_eq!(old.index, new.index);
        assert!(trie.payload(old).is_none());
        assert_eq!(trie.erase(old), Err(NameTrieError::InvalidHandle(old)));
        assert!(trie.payload(new).is_some());
    }

    #[test]
    fn test_traversal_is_sorted_preorder() {
        let mut trie = NameTrie::new();
        for uri in ["/b", "/a/z", "/a", "/c/d", "/a/m"] {
            put(&mut trie, uri);
        }
        let order: Vec<&str> = trie.iter().map(|(_, p)| p.as_str()).collect();
        assert_eq!(order, vec!["/a", "/a/m", "/a/z", "/b", "/c/d"]);

        let mut stepped = Vec::new();
        let mut cursor = trie.first();
        while let Some(h) = cursor {
            stepped.push(trie.payload(h).unwrap().clone());
            cursor = trie.next_after(h);
        }
        assert_eq!(stepped, order);
        assert_eq!(trie.traverse().count(), trie.node_count());
    }

    #[test]
    fn test_max_depth_enforced() {
        let mut trie: NameTrie<()> = NameTrie::with_config(NameTrieConfig { max_depth: 2 });
        assert!(matches!(
            trie.insert(&name("/a/b/c")),
            Err(NameTrieError::NameTooLong { max_depth: 2, .. })
        ));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut trie = NameTrie::new();
        let h = put(&mut trie, "/a");
        trie.clear();
        assert!(trie.is_empty());
        assert!(trie.payload(h).is_none());
        assert_eq!(trie.node_count(), 1);
    }
}
