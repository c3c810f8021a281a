//! Property-based tests for the red/black tree.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rb_tree::{RbTree, SetOutcome};

// =============================================================================
// Test helpers
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Add(u16),
    Remove(u16),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..200).prop_map(Op::Add),
        2 => (0u16..200).prop_map(Op::Remove),
    ]
}

/// Reference multiset: key -> multiplicity.
fn model_add(model: &mut BTreeMap<u16, usize>, key: u16) {
    *model.entry(key).or_default() += 1;
}

fn model_remove(model: &mut BTreeMap<u16, usize>, key: u16) -> bool {
    match model.get_mut(&key) {
        Some(n) => {
            *n -= 1;
            if *n == 0 {
                model.remove(&key);
            }
            true
        }
        None => false,
    }
}

fn expand(model: &BTreeMap<u16, usize>) -> Vec<u16> {
    model
        .iter()
        .flat_map(|(k, n)| std::iter::repeat(*k).take(*n))
        .collect()
}

// =============================================================================
// Invariants, membership and size accounting
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every add/remove leaves a valid red/black tree that agrees with a set.
    #[test]
    fn set_ops_preserve_invariants(ops in prop::collection::vec(arbitrary_op(), 1..300)) {
        let mut tree = RbTree::new();
        let mut model = BTreeMap::new();
        let mut accepted = 0usize;
        let mut removed = 0usize;

        for op in &ops {
            match *op {
                Op::Add(k) => {
                    let fresh = !model.contains_key(&k);
                    prop_assert_eq!(tree.add(k).is_ok(), fresh);
                    if fresh {
                        model_add(&mut model, k);
                        accepted += 1;
                    }
                }
                Op::Remove(k) => {
                    let present = model_remove(&mut model, k);
                    prop_assert_eq!(tree.remove(&k).is_some(), present);
                    if present {
                        removed += 1;
                    }
                }
            }
            prop_assert!(tree.audit().is_ok(), "audit failed after {:?}: {:?}", op, tree.audit());
        }

        prop_assert_eq!(tree.len(), accepted - removed);
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expand(&model));
        for k in 0u16..200 {
            prop_assert_eq!(tree.contains(&k), model.contains_key(&k));
        }
    }

    /// Same as above with duplicates allowed.
    #[test]
    fn multiset_ops_preserve_invariants(ops in prop::collection::vec(arbitrary_op(), 1..300)) {
        let mut tree = RbTree::multiset();
        let mut model = BTreeMap::new();

        for op in &ops {
            match *op {
                Op::Add(k) => {
                    prop_assert!(tree.add(k).is_ok());
                    model_add(&mut model, k);
                }
                Op::Remove(k) => {
                    let present = model_remove(&mut model, k);
                    prop_assert_eq!(tree.remove(&k).is_some(), present);
                }
            }
            prop_assert!(tree.audit().is_ok());
        }

        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expand(&model));
        prop_assert_eq!(tree.len(), model.values().sum::<usize>());
    }

    /// Removing through a cursor and then stepping on visits exactly what a
    /// walk without the removed element would have visited.
    #[test]
    fn cursor_removal_skips_nothing(
        keys in prop::collection::btree_set(0u32..1000, 1..120),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<u32> = keys.into_iter().collect();
        let victim = keys[pick.index(keys.len())];
        let mut tree: RbTree<u32> = keys.iter().copied().collect();

        let mut visited = Vec::new();
        {
            let mut cursor = tree.begin_mut();
            while let Some(v) = cursor.get().copied() {
                if v == victim {
                    prop_assert_eq!(cursor.set(None), SetOutcome::Removed(()));
                } else {
                    visited.push(v);
                    cursor.move_next();
                }
            }
        }

        let expected: Vec<u32> = keys.iter().copied().filter(|&k| k != victim).collect();
        prop_assert_eq!(visited, expected.clone());
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
        prop_assert!(tree.audit().is_ok());
    }

    /// Inserting N keys and removing them all in another order returns the
    /// tree to the state of a fresh one.
    #[test]
    fn round_trip_returns_to_empty(
        keys in prop::collection::vec(any::<u32>(), 0..200).prop_shuffle(),
        order in prop::collection::vec(any::<prop::sample::Index>(), 200),
    ) {
        let mut tree: RbTree<u32> = RbTree::multiset();
        for &k in &keys {
            prop_assert!(tree.add(k).is_ok());
        }

        let mut pending = keys.clone();
        let mut i = 0;
        while !pending.is_empty() {
            let at = order[i % order.len()].index(pending.len());
            let k = pending.swap_remove(at);
            let released: Option<()> = tree.remove(&k);
            prop_assert!(released.is_some());
            i += 1;
        }

        let fresh: RbTree<u32> = RbTree::multiset();
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), fresh.height());
        prop_assert_eq!(tree.black_height(), fresh.black_height());
        prop_assert_eq!(tree.audit(), fresh.audit());
        prop_assert_eq!(tree.arena_slots(), fresh.arena_slots());
        prop_assert_eq!(tree.vacant_slots(), fresh.vacant_slots());
        prop_assert!(tree.begin().is_end());
    }
}
