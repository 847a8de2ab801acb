//! Property-based invariant tests for the selection container.
//!
//! These verify the membership invariants that must hold for **any** items
//! and operation order:
//!
//! 1. After `select_group([x])`, `x` is selected.
//! 2. After `select_group([x])` then `unselect_group([x])`, `x` is not.
//! 3. Toggling an unselected item twice returns it to unselected.
//! 4. For distinct ids, one `select_group(items)` from empty produces the
//!    same membership as toggling each item once from empty.
//! 5. `unselect_all` empties the set no matter what came before.
//! 6. Two values sharing an id collapse to one entry holding the last value.
//! 7. The container agrees with a plain ordered-map model under any
//!    interleaving of the four write operations.

use pickset::{ItemKey, SelectionScope};
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct TestItem {
    id: String,
    payload: u32,
}

fn scope() -> SelectionScope<TestItem> {
    SelectionScope::new(|item: &TestItem| item.id.clone())
}

// ── Strategies ──────────────────────────────────────────────────────────

/// Items drawn from a small id space so collisions and re-selects happen.
fn item() -> impl Strategy<Value = TestItem> {
    (0u32..40, any::<u32>()).prop_map(|(id, payload)| TestItem {
        id: id.to_string(),
        payload,
    })
}

fn items(max: usize) -> impl Strategy<Value = Vec<TestItem>> {
    proptest::collection::vec(item(), 0..max)
}

/// Items with pairwise-distinct ids.
fn distinct_items(max: usize) -> impl Strategy<Value = Vec<TestItem>> {
    proptest::collection::hash_set(0u32..200, 0..max).prop_map(|ids| {
        ids.into_iter()
            .map(|id| TestItem {
                id: id.to_string(),
                payload: id,
            })
            .collect()
    })
}

#[derive(Clone, Debug)]
enum Op {
    SelectGroup(Vec<TestItem>),
    UnselectGroup(Vec<TestItem>),
    Toggle(TestItem),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        items(8).prop_map(Op::SelectGroup),
        items(8).prop_map(Op::UnselectGroup),
        item().prop_map(Op::Toggle),
        Just(Op::Clear),
    ]
}

proptest! {
    // 1. Select makes a member.
    #[test]
    fn select_group_establishes_membership(x in item(), prior in items(20)) {
        let scope = scope();
        scope.select_group(prior);
        scope.select_group(vec![x.clone()]);
        prop_assert!(scope.is_selected(&x));
    }

    // 2. Unselect removes.
    #[test]
    fn unselect_group_removes_membership(x in item(), prior in items(20)) {
        let scope = scope();
        scope.select_group(prior);
        scope.select_group(vec![x.clone()]);
        scope.unselect_group(vec![&x]);
        prop_assert!(!scope.is_selected(&x));
    }

    // 3. Toggle is an involution from unselected.
    #[test]
    fn toggle_twice_is_identity(x in item()) {
        let scope = scope();
        scope.select_single(x.clone());
        prop_assert!(scope.is_selected(&x));
        scope.select_single(x.clone());
        prop_assert!(!scope.is_selected(&x));
    }

    // 4. Batch select equals sequential toggles from empty, for distinct ids.
    #[test]
    fn batch_select_matches_sequential_singles(items in distinct_items(20)) {
        let batch = scope();
        batch.select_group(items.clone());

        let sequential = scope();
        for item in &items {
            sequential.select_single(item.clone());
        }

        let batch_keys: Vec<ItemKey> = batch.snapshot().keys().cloned().collect();
        let seq_keys: Vec<ItemKey> = sequential.snapshot().keys().cloned().collect();
        prop_assert_eq!(batch_keys, seq_keys);
    }

    // 5. Clear always empties.
    #[test]
    fn unselect_all_clears_everything(prior in items(30)) {
        let scope = scope();
        scope.select_group(prior.clone());
        scope.unselect_all();
        prop_assert!(scope.get_selected().is_empty());
        for item in &prior {
            prop_assert!(!scope.is_selected(item));
        }
    }

    // 6. Same id collapses to one entry holding the last value.
    #[test]
    fn same_id_overwrites_not_duplicates(id in 0u32..40, first in any::<u32>(), second in any::<u32>()) {
        let scope = scope();
        let a = TestItem { id: id.to_string(), payload: first };
        let b = TestItem { id: id.to_string(), payload: second };

        scope.select_group(vec![a]);
        scope.select_group(vec![b.clone()]);

        let selected = scope.get_selected();
        prop_assert_eq!(selected.len(), 1);
        prop_assert_eq!(&selected[0], &b);
    }

    // 7. Model equivalence under arbitrary operation interleavings.
    #[test]
    fn container_agrees_with_ordered_map_model(ops in proptest::collection::vec(op(), 0..30)) {
        let scope = scope();
        let mut model: indexmap::IndexMap<String, TestItem> = indexmap::IndexMap::new();

        for op in ops {
            match op {
                Op::SelectGroup(items) => {
                    scope.select_group(items.clone());
                    for item in items {
                        model.insert(item.id.clone(), item);
                    }
                }
                Op::UnselectGroup(items) => {
                    scope.unselect_group(items.iter());
                    for item in &items {
                        model.shift_remove(&item.id);
                    }
                }
                Op::Toggle(item) => {
                    scope.select_single(item.clone());
                    if model.shift_remove(&item.id).is_none() {
                        model.insert(item.id.clone(), item);
                    }
                }
                Op::Clear => {
                    scope.unselect_all();
                    model.clear();
                }
            }
        }

        let got = scope.get_selected();
        let want: Vec<TestItem> = model.into_values().collect();
        prop_assert_eq!(got, want);
    }
}
