// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the name trie.
//!
//! This module defines the error types that can occur during name trie operations.

use super::NodeHandle;

/// Errors that can occur in name trie operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NameTrieError {
    /// Error when a name exceeds the maximum depth allowed.
    #[error("Name '{name}' exceeds maximum trie depth of {max_depth}")]
    NameTooLong {
        /// The offending name, in URI form.
        name: String,
        /// The maximum allowed depth.
        max_depth: usize,
    },

    /// The handle refers to a node that was pruned, re-stamped, or never
    /// carried a payload.
    #[error("Invalid or stale trie handle {0}")]
    InvalidHandle(NodeHandle),

    /// Attempted to attach a payload to a node that already carries one.
    #[error("Trie node {0} already carries a payload")]
    Occupied(NodeHandle),
}
