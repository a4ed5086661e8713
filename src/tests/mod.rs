//! Test modules for the CCNx PIT.
//!
//! This module contains the cross-component tests:
//! - Configuration loading and validation
//! - Lookup, erase and expiry scenarios against a full table
//! - Property-based tests using proptest
//! - Test fixtures and utilities
//!
//! Component unit tests live next to their code.

pub mod pit_table_tests;
pub mod property_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{component_strategy, name, name_strategy, TableFixture};
