//! Data structures backing the Pending Interest Table.
//!
//! - [`NameTrie`]: component-keyed arena trie with stable node handles
//! - [`ExpiryQueue`]: min-ordered deadline index with lazy invalidation

pub mod expiry_queue;
pub mod name_trie;

// Re-export common data structures
pub use expiry_queue::ExpiryQueue;
pub use name_trie::{NameTrie, NameTrieConfig, NameTrieError, NameTrieResult, NodeHandle};
