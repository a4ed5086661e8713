// Copyright (c) 2025 CCNx PIT Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the Pending Interest Table.
//!
//! A missing FIB route is deliberately absent here: it is a configuration
//! invariant violation and aborts the operation with a panic.

use super::entry::EntryId;
use crate::data_structures::name_trie::NameTrieError;

/// Errors that can occur in PIT operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PitError {
    /// The table is at its configured bound and the eviction policy refused
    /// to select a victim.
    #[error("PIT is at capacity ({max_size} entries) and the eviction policy refused a victim")]
    CapacityExceeded {
        /// The configured bound.
        max_size: usize,
    },

    /// The entry handle refers to an entry that was already erased.
    #[error("Invalid or stale PIT entry handle {0}")]
    InvalidHandle(EntryId),

    /// The underlying trie rejected the name.
    #[error("Name index error: {0}")]
    Trie(#[from] NameTrieError),
}

/// Result type for PIT operations.
pub type PitResult<T> = Result<T, PitError>;
