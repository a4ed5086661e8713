//! Property-based tests for the table and its trie.
//!
//! Names are drawn from a small component alphabet so that generated sets
//! share prefixes and exercise the hierarchical lookups.

use super::test_utils::{name_strategy, TableFixture};
use crate::config::TableConfig;
use crate::data_structures::name_trie::NameTrie;
use crate::name::Name;
use crate::pit::EvictionKind;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// One step of a random workload.
#[derive(Debug, Clone)]
enum Op {
    Insert(Name),
    EraseNth(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => name_strategy().prop_map(Op::Insert),
        1 => any::<usize>().prop_map(Op::EraseNth),
    ]
}

fn eviction_strategy() -> impl Strategy<Value = EvictionKind> {
    prop_oneof![
        Just(EvictionKind::Fifo),
        Just(EvictionKind::NearestExpiry),
        Just(EvictionKind::Persistent),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Insert then exact lookup finds the inserted entry.
    #[test]
    fn prop_insert_then_lookup_by_interest(names in proptest::collection::vec(name_strategy(), 1..20)) {
        let mut fx = TableFixture::new();
        for n in &names {
            let id = fx.insert(n).unwrap();
            prop_assert_eq!(fx.table.lookup_by_interest(n).map(|e| e.id()), Some(id));
        }
    }

    /// Content lookup agrees with a brute-force longest-prefix scan.
    #[test]
    fn prop_lookup_by_content_is_longest_prefix(
        names in proptest::collection::vec(name_strategy(), 0..20),
        query in name_strategy(),
    ) {
        let mut fx = TableFixture::new();
        for n in &names {
            fx.insert(n).unwrap();
        }

        let expected = names
            .iter()
            .filter(|n| n.is_prefix_of(&query))
            .max_by_key(|n| n.len());
        let found = fx.table.lookup_by_content(&query).map(|e| e.name());
        prop_assert_eq!(found, expected);
    }

    /// Creating the same name twice adds exactly one entry.
    #[test]
    fn prop_duplicate_create_counts_once(names in proptest::collection::vec(name_strategy(), 0..20), extra in name_strategy()) {
        let mut fx = TableFixture::new();
        for n in &names {
            fx.insert(n).unwrap();
        }
        let before = fx.table.len();
        let first = fx.insert(&extra).unwrap();
        let after_first = fx.table.len();
        let second = fx.insert(&extra).unwrap();

        prop_assert_eq!(first, second);
        prop_assert!(after_first == before || after_first == before + 1);
        prop_assert_eq!(fx.table.len(), after_first);
        let distinct: BTreeSet<&Name> = names.iter().chain(std::iter::once(&extra)).collect();
        prop_assert_eq!(fx.table.len(), distinct.len());
    }

    /// Erasing every entry leaves only the root node and misses on every lookup.
    #[test]
    fn prop_erase_all_prunes_to_root(names in proptest::collection::vec(name_strategy(), 0..20)) {
        let mut fx = TableFixture::new();
        let ids: BTreeSet<_> = names.iter().map(|n| fx.insert(n).unwrap()).collect();
        for id in ids {
            fx.table.erase(id).unwrap();
        }
        prop_assert!(fx.table.is_empty());
        prop_assert_eq!(fx.table.node_count(), 1);
        for n in &names {
            prop_assert!(fx.table.lookup_by_interest(n).is_none());
            prop_assert!(fx.table.lookup_by_content(n).is_none());
        }
    }

    /// The bound is never exceeded; an unbounded table never refuses or drops entries.
    #[test]
    fn prop_bound_never_exceeded(
        max_size in 0usize..6,
        eviction in eviction_strategy(),
        ops in proptest::collection::vec(op_strategy(), 0..60),
    ) {
        let config = TableConfig { max_size, eviction, ..TableConfig::default() };
        let mut fx = TableFixture::with_config(&config);
        let mut kept = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(n) => {
                    let result = fx.insert(&n);
                    if max_size == 0 {
                        prop_assert!(result.is_ok());
                    }
                    if let Ok(id) = result {
                        kept.insert(id);
                    }
                }
                Op::EraseNth(k) => {
                    let live: Vec<_> = fx.table.iter().map(|e| e.id()).collect();
                    if !live.is_empty() {
                        let id = live[k % live.len()];
                        fx.table.erase(id).unwrap();
                        kept.remove(&id);
                    }
                }
            }
            if max_size > 0 {
                prop_assert!(fx.table.len() <= max_size);
            } else {
                for id in &kept {
                    prop_assert!(fx.table.get(*id).is_some());
                }
                prop_assert_eq!(fx.table.len(), kept.len());
            }
            prop_assert_eq!(fx.table.policy().len(), fx.table.len());
        }
    }

    /// begin/next visits every live entry once, in sorted order, within node_count steps.
    #[test]
    fn prop_traversal_visits_each_entry_once(
        names in proptest::collection::vec(name_strategy(), 0..25),
        erase_every in 2usize..5,
    ) {
        let mut fx = TableFixture::new();
        let ids: Vec<_> = names.iter().map(|n| fx.insert(n).unwrap()).collect();
        for id in ids.iter().step_by(erase_every) {
            let _ = fx.table.erase(*id);
        }

        let mut visited = Vec::new();
        let mut cursor = fx.table.begin();
        while let Some(entry) = cursor {
            visited.push(entry.name().clone());
            prop_assert!(visited.len() <= fx.table.node_count());
            cursor = fx.table.next(entry.id());
        }

        prop_assert_eq!(visited.len(), fx.table.len());
        let mut sorted = visited.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(visited, sorted);
    }

    /// The trie alone agrees with an ordered set model, including walk order.
    #[test]
    fn prop_trie_matches_set_model(names in proptest::collection::vec(name_strategy(), 0..30)) {
        let mut trie: NameTrie<Name> = NameTrie::new();
        let mut model = BTreeSet::new();
        for n in &names {
            let (handle, is_new) = trie.insert_with(n, |_| n.clone()).unwrap();
            prop_assert_eq!(is_new, model.insert(n.clone()));
            prop_assert_eq!(trie.payload(handle), Some(n));
        }
        prop_assert_eq!(trie.len(), model.len());
        let walked: Vec<&Name> = trie.iter().map(|(_, n)| n).collect();
        let expected: Vec<&Name> = model.iter().collect();
        prop_assert_eq!(walked, expected);
    }
}
