//! Node implementation for the name trie.
//!
//! Nodes live in a slab arena owned by the trie. Structural links are slab
//! indices: children are owned through the trie's arena, the parent link is a
//! plain back-index and never keeps a node alive.

use std::collections::BTreeMap;
use std::fmt;

use crate::name::NameComponent;

/// A stable reference to a trie node.
///
/// The handle pairs the slab index with the generation stamped on the node
/// when it was allocated or last had a payload attached. A handle whose
/// generation no longer matches is stale and every lookup through it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle {
    pub(crate) index: usize,
    pub(crate) generation: u64,
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// A node in the name trie.
#[derive(Debug)]
pub(crate) struct TrieNode<T> {
    /// Component on the edge from the parent; `None` only at the root.
    pub(crate) component: Option<NameComponent>,

    /// Children keyed by component, ordered by component bytes.
    pub(crate) children: BTreeMap<NameComponent, usize>,

    /// Slab index of the parent; `None` only at the root.
    pub(crate) parent: Option<usize>,

    /// Payload for the name ending exactly at this node.
    pub(crate) payload: Option<T>,

    pub(crate) generation: u64,
}

impl<T> TrieNode<T> {
    pub(crate) fn root(generation: u64) -> Self {
        Self {
            component: None,
            children: BTreeMap::new(),
            parent: None,
            payload: None,
            generation,
        }
    }

    pub(crate) fn child(component: NameComponent, parent: usize, generation: u64) -> Self {
        Self {
            component: Some(component),
            children: BTreeMap::new(),
            parent: Some(parent),
            payload: None,
            generation,
        }
    }

    /// A node with neither payload nor children must not outlive a removal.
    pub(crate) fn is_garbage(&self) -> bool {
        self.payload.is_none() && self.children.is_empty()
    }
}
