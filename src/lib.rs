//! CCNx Pending Interest Table Library
//!
//! This library contains the Pending Interest Table of a CCNx forwarder: the
//! hierarchical name type, the name-keyed trie the table is built on, the
//! table itself with its eviction and expiry machinery, and a trace replay
//! driver used by the `ccnx-pit` binary.
//!
//! # Architecture
//!
//! The crate is designed with the following principles in mind:
//! - Strict component boundaries
//! - Dependency injection for testability (clock, FIB, observer)
//! - Stable handles instead of references into the trie
//! - Comprehensive error handling and propagation

pub mod clock;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod name;
pub mod pit;
pub mod trace;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for the CCNx PIT.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
