//! Error module for the CCNx PIT crate.
//!
//! This module provides the crate-level error type. Each component defines
//! its own error enum next to its code (names, trie, table, trace replay);
//! [`CcnxError`] gathers them for callers that cross component boundaries,
//! such as the command-line driver.

use thiserror::Error;

use crate::data_structures::name_trie::NameTrieError;
use crate::name::NameError;
use crate::pit::PitError;
use crate::trace::TraceError;

pub mod config;

/// Result type alias used at component boundaries.
pub type CcnxResult<T> = Result<T, CcnxError>;

/// Core error enum for the CCNx PIT crate.
#[derive(Error, Debug)]
pub enum CcnxError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by the Pending Interest Table.
    #[error("PIT error: {0}")]
    Pit(#[from] PitError),

    /// Errors raised by a name trie outside the PIT, e.g. the FIB.
    #[error("Name index error: {0}")]
    Trie(#[from] NameTrieError),

    /// Malformed names.
    #[error("Name error: {0}")]
    Name(#[from] NameError),

    /// Errors replaying an event trace.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}
