//! Property-based tests for structural hashing and deep equality.

use std::collections::HashMap;

use lambars_collections::hash::hash_value;
use lambars_collections::prelude::*;
use proptest::prelude::*;

fn entries_strategy() -> impl Strategy<Value = HashMap<String, i64>> {
    prop::collection::hash_map("[a-z]{1,4}", any::<i64>(), 0..16)
}

// =============================================================================
// Consistency
// =============================================================================

proptest! {
    /// Equal collections hash equal, whatever order they were built in.
    #[test]
    fn prop_unordered_build_order_is_irrelevant(elements in prop::collection::vec(any::<i64>(), 0..32)) {
        let forward = Collection::set_of(elements.iter().copied());
        let backward = Collection::set_of(elements.iter().rev().copied());
        prop_assert!(forward.equals(&backward));
        prop_assert_eq!(forward.hash_code(), backward.hash_code());
    }

    /// Maps built from the same entries in any order are equal and hash equal.
    #[test]
    fn prop_map_build_order_is_irrelevant(entries in entries_strategy()) {
        let forward: Vec<_> = entries.iter().map(|(key, value)| (key.as_str(), *value)).collect();
        let backward: Vec<_> = forward.iter().rev().copied().collect();
        let left = Collection::map_of(forward);
        let right = Collection::map_of(backward);
        prop_assert!(left.equals(&right));
        prop_assert_eq!(left.hash_code(), right.hash_code());
    }

    /// Ordered collections are order-sensitive.
    #[test]
    fn prop_list_reversal_breaks_equality(elements in prop::collection::vec(any::<i64>(), 2..32)) {
        let forward = Collection::list_of(elements.iter().copied());
        let backward = Collection::list_of(elements.iter().rev().copied());
        let palindrome = elements.iter().eq(elements.iter().rev());
        prop_assert_eq!(forward.equals(&backward), palindrome);
    }

    /// Realized and lazy indexed collections with the same values are equal.
    #[test]
    fn prop_list_equals_sequence(elements in prop::collection::vec(any::<i64>(), 0..32)) {
        let realized = Collection::list_of(elements.iter().copied());
        let lazy = Collection::seq_of(elements.iter().copied());
        prop_assert!(realized.equals(&lazy));
        prop_assert_eq!(realized.hash_code(), lazy.hash_code());
    }

    /// Integral floats are equal to, and hash like, integers.
    #[test]
    fn prop_integral_float_hashes_like_integer(integer in -(1i64 << 52)..(1i64 << 52)) {
        #[allow(clippy::cast_precision_loss)]
        let float = Value::from(integer as f64);
        prop_assert_eq!(&Value::from(integer), &float);
        prop_assert_eq!(hash_value(&Value::from(integer)), hash_value(&float));
    }

    /// Memoized hashes do not change.
    #[test]
    fn prop_hash_is_stable(elements in prop::collection::vec(any::<i64>(), 0..32)) {
        let list = Collection::list_of(elements.iter().copied());
        let first = list.hash_code();
        prop_assert_eq!(first, list.hash_code());
        prop_assert_eq!(first, Collection::list_of(elements).hash_code());
    }

    /// Equality is symmetric across capabilities and orderedness.
    #[test]
    fn prop_equality_is_symmetric(elements in prop::collection::vec(0i64..4, 0..8)) {
        let candidates = [
            Collection::list_of(elements.iter().copied()),
            Collection::stack_of(elements.iter().copied()),
            Collection::set_of(elements.iter().copied()),
            Collection::ordered_set_of(elements.iter().copied()),
            Collection::seq_of(elements.iter().copied()),
        ];
        for left in &candidates {
            for right in &candidates {
                prop_assert_eq!(left.equals(right), right.equals(left));
                if left.equals(right) {
                    prop_assert_eq!(left.hash_code(), right.hash_code());
                }
            }
        }
    }
}

// =============================================================================
// Fixed cases
// =============================================================================

#[test]
fn test_ordered_and_unordered_empty_hash_differently() {
    assert_ne!(ordered_map! {}.hash_code(), map! {}.hash_code());
    assert_ne!(ordered_set![].hash_code(), set![].hash_code());
}

#[test]
fn test_nested_equality_is_deep() {
    let left = map! { "a" => list![set![1, 2], map! { "b" => 3 }] };
    let right = map! { "a" => list![set![2, 1], map! { "b" => 3.0 }] };
    assert!(left.equals(&right));
    assert_eq!(left.hash_code(), right.hash_code());
}
