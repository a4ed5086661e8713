//! Scenario tests for the Pending Interest Table.
//!
//! These exercise the table end to end through [`TableFixture`], covering
//! hierarchical lookups, erase with pruning and time-based expiry.

use super::test_utils::{name, TableFixture};
use crate::clock::Timestamp;
use crate::config::TableConfig;
use crate::pit::{EvictionKind, PitError};
use std::time::Duration;

/// Insert `/a`, `/a/b`, `/a/b/c`, then erase `/a/b` in the middle.
#[test]
fn test_nested_prefixes_scenario() {
    let mut fx = TableFixture::new();
    let a = fx.insert(&name("/a")).unwrap();
    let ab = fx.insert(&name("/a/b")).unwrap();
    let abc = fx.insert(&name("/a/b/c")).unwrap();

    let by_content = |fx: &TableFixture, uri: &str| fx.table.lookup_by_content(&name(uri)).map(|e| e.id());
    let by_interest = |fx: &TableFixture, uri: &str| fx.table.lookup_by_interest(&name(uri)).map(|e| e.id());

    assert_eq!(by_content(&fx, "/a/b/c/d"), Some(abc));
    assert_eq!(by_interest(&fx, "/a/b"), Some(ab));
    assert_eq!(by_interest(&fx, "/a/b/x"), None);

    let erased = fx.table.erase(ab).unwrap();
    assert_eq!(erased.name(), &name("/a/b"));

    assert_eq!(by_content(&fx, "/a/b/c/d"), Some(abc));
    assert_eq!(by_interest(&fx, "/a/b"), None);
    assert_eq!(by_interest(&fx, "/a"), Some(a));
    // /a/b stays as an interior node because /a/b/c still hangs below it.
    assert_eq!(by_content(&fx, "/a/b/z"), Some(a));
    assert_eq!(fx.table.len(), 2);
}

/// Entries at t1 < now < t2: a sweep at `now` removes exactly the t1 entry.
#[test]
fn test_sweep_between_deadlines_scenario() {
    let mut fx = TableFixture::new();
    let early = fx
        .insert_with_lifetime(&name("/t1"), Duration::from_millis(100))
        .unwrap();
    let late = fx
        .insert_with_lifetime(&name("/t2"), Duration::from_millis(300))
        .unwrap();

    let now = Timestamp::from_millis(200);
    assert_eq!(fx.table.sweep_expired(now), 1);
    assert!(fx.table.get(early).is_none());
    assert!(fx.table.get(late).is_some());

    // A second sweep at the same time is a no-op.
    assert_eq!(fx.table.sweep_expired(now), 0);
    assert_eq!(fx.table.len(), 1);
}

/// Exact match needs the full path: a live prefix entry does not count.
#[test]
fn test_interest_lookup_requires_full_path() {
    let mut fx = TableFixture::new();
    fx.insert(&name("/video")).unwrap();

    assert!(fx.table.lookup_by_interest(&name("/video/a.mpg")).is_none());
    assert!(fx.table.lookup_by_content(&name("/video/a.mpg")).is_some());
    assert!(fx.table.lookup_by_content(&name("/audio")).is_none());
}

/// Erasing the only entry on a path prunes the path back to the root.
#[test]
fn test_erase_restores_node_count() {
    let mut fx = TableFixture::new();
    fx.insert(&name("/x")).unwrap();
    let before = fx.table.node_count();

    let deep = fx.insert(&name("/x/y/z/w")).unwrap();
    assert_eq!(fx.table.node_count(), before + 3);

    fx.table.erase(deep).unwrap();
    assert_eq!(fx.table.node_count(), before);
    assert!(fx.table.lookup_by_interest(&name("/x/y/z/w")).is_none());
    assert!(fx.table.lookup_by_content(&name("/x/y/z/w")).is_some());
}

/// A handle from an erased entry never resolves to its replacement.
#[test]
fn test_recreated_entry_does_not_alias_old_handle() {
    let mut fx = TableFixture::new();
    let first = fx.insert(&name("/a/b")).unwrap();
    fx.table.erase(first).unwrap();
    let second = fx.insert(&name("/a/b")).unwrap();

    assert_ne!(first, second);
    assert!(fx.table.get(first).is_none());
    assert_eq!(fx.table.erase(first).unwrap_err(), PitError::InvalidHandle(first));
    assert!(fx.table.get(second).is_some());
}

/// Refreshing an entry moves its deadline past a sweep that would have removed it.
#[test]
fn test_refresh_extends_expiry() {
    let mut fx = TableFixture::new();
    let id = fx
        .insert_with_lifetime(&name("/live"), Duration::from_millis(100))
        .unwrap();

    fx.clock.advance(Duration::from_millis(90));
    let expire_at = fx.table.refresh(id, Some(Duration::from_millis(100))).unwrap();
    assert_eq!(expire_at, Timestamp::from_millis(190));

    fx.clock.advance(Duration::from_millis(20));
    assert_eq!(fx.table.sweep_due(), 0);

    fx.clock.advance(Duration::from_millis(80));
    assert_eq!(fx.table.sweep_due(), 1);
    assert!(fx.table.is_empty());
}

/// The bound holds across a mix of inserts under the default FIFO policy.
#[test]
fn test_bounded_table_evicts_oldest() {
    let config = TableConfig {
        max_size: 2,
        ..TableConfig::default()
    };
    let mut fx = TableFixture::with_config(&config);
    let first = fx.insert(&name("/1")).unwrap();
    fx.insert(&name("/2")).unwrap();
    fx.insert(&name("/3")).unwrap();

    assert_eq!(fx.table.len(), 2);
    assert!(fx.table.get(first).is_none());
    let names: Vec<String> = fx.table.iter().map(|e| e.name().to_string()).collect();
    assert_eq!(names, vec!["/2", "/3"]);
}

/// Persistent tables refuse instead of evicting, and shrinking below the
/// current size fails without changing the bound.
#[test]
fn test_persistent_table_refuses() {
    let config = TableConfig {
        max_size: 1,
        eviction: EvictionKind::Persistent,
        ..TableConfig::default()
    };
    let mut fx = TableFixture::with_config(&config);
    fx.insert(&name("/kept")).unwrap();

    assert_eq!(
        fx.insert(&name("/new")).unwrap_err(),
        PitError::CapacityExceeded { max_size: 1 }
    );
    // The refused name left no nodes behind.
    assert_eq!(fx.table.node_count(), 2);

    fx.table.set_max_size(0).unwrap();
    fx.insert(&name("/new")).unwrap();
    assert_eq!(
        fx.table.set_max_size(1).unwrap_err(),
        PitError::CapacityExceeded { max_size: 1 }
    );
    assert_eq!(fx.table.max_size(), 0);
}

/// Print lists entries in sorted trie order.
#[test]
fn test_print_is_sorted() {
    let mut fx = TableFixture::new();
    for uri in ["/b", "/a/z", "/a", "/a/c"] {
        fx.insert(&name(uri)).unwrap();
    }

    let mut out = Vec::new();
    fx.table.print(&mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();
    let names: Vec<&str> = printed
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(names, vec!["/a", "/a/c", "/a/z", "/b"]);
    assert_eq!(printed, fx.table.to_string());
}
