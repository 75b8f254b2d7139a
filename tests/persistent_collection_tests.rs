//! Integration tests for the realized collection types and their mutators.

use lambars_collections::prelude::*;
use rstest::rstest;

// =============================================================================
// Persistence
// =============================================================================

#[rstest]
fn test_mutators_leave_original_untouched() {
    let original = list![1, 2, 3];
    let pushed = original.push(4).unwrap();
    let popped = original.pop().unwrap();
    let replaced = original.set(0, 9).unwrap();
    assert_eq!(original.to_string(), "List [ 1, 2, 3 ]");
    assert_eq!(pushed.to_string(), "List [ 1, 2, 3, 4 ]");
    assert_eq!(popped.to_string(), "List [ 1, 2 ]");
    assert_eq!(replaced.to_string(), "List [ 9, 2, 3 ]");
}

#[rstest]
fn test_unchanged_mutations_return_same_handle() {
    let scores = map! { "a" => 1 };
    assert!(scores.set("a", 1).unwrap().ptr_eq(&scores));
    assert!(scores.remove("zzz").unwrap().ptr_eq(&scores));
    let members = set![1, 2];
    assert!(members.add(1).unwrap().ptr_eq(&members));
    let empty = list![];
    assert!(empty.pop().unwrap().ptr_eq(&empty));
    assert!(empty.clear().unwrap().ptr_eq(&empty));
}

// =============================================================================
// Lists and stacks
// =============================================================================

#[rstest]
#[case(0, "List [ 0, 1, 2 ]")]
#[case(1, "List [ 1, 0, 2 ]")]
#[case(-1, "List [ 1, 0, 2 ]")]
#[case(7, "List [ 1, 2, 0 ]")]
fn test_list_insert(#[case] index: i64, #[case] expected: &str) {
    assert_eq!(list![1, 2].insert(index, 0).unwrap().to_string(), expected);
}

#[rstest]
fn test_list_negative_indices() {
    let letters = list!["a", "b", "c"];
    assert_eq!(letters.get(-1), Some(Value::from("c")));
    assert_eq!(letters.get(-4), None);
    assert_eq!(letters.get("1"), Some(Value::from("b")));
    assert_eq!(letters.get("01"), None);
    assert!(letters.has(-3));
}

#[rstest]
fn test_stack_order() {
    let pile = stack![].push(1).unwrap().push(2).unwrap();
    assert_eq!(pile.peek(), Some(Value::from(2)));
    assert_eq!(pile.to_string(), "Stack [ 2, 1 ]");
    assert_eq!(pile.pop().unwrap().peek(), Some(Value::from(1)));
    assert!(pile.set(0, 3).is_err());
}

// =============================================================================
// Maps and sets
// =============================================================================

#[rstest]
fn test_ordered_map_keeps_insertion_order() {
    let scores = ordered_map! { "z" => 1, "a" => 2 }.set("m", 3).unwrap();
    assert_eq!(scores.to_string(), r#"OrderedMap { "z": 1, "a": 2, "m": 3 }"#);
    let rewritten = scores.set("z", 9).unwrap();
    assert_eq!(rewritten.keys().next(), Some(Value::from("z")));
    let removed = scores.remove("a").unwrap();
    assert_eq!(removed.join(",").unwrap(), "1,3");
}

#[rstest]
fn test_map_update() {
    let counters = map! { "hits" => 1 };
    let bumped = counters
        .update("hits", |current| Value::from(current.and_then(|value| value.as_int()).unwrap_or(0) + 1))
        .unwrap();
    assert_eq!(bumped.get("hits"), Some(Value::from(2)));
    let created = counters
        .update("misses", |current| current.unwrap_or_else(|| Value::from(0)))
        .unwrap();
    assert_eq!(created.get("misses"), Some(Value::from(0)));
}

#[rstest]
fn test_set_algebra() {
    let evens = set![2, 4, 6];
    let union = evens.union([set![1, 2]]).unwrap();
    assert_eq!(union.count().unwrap(), 4);
    let common = evens.intersect([set![4, 6, 8]]).unwrap();
    assert!(common.equals(&set![4, 6]));
    let remaining = evens.subtract([set![2]]).unwrap();
    assert!(remaining.equals(&set![4, 6]));
    assert!(list![1].union([set![2]]).is_err());
}

#[rstest]
fn test_ordered_set_order() {
    let members = ordered_set!["c", "a"].add("b").unwrap();
    assert_eq!(members.join("").unwrap(), "cab");
    assert_eq!(members.remove("a").unwrap().join("").unwrap(), "cb");
}

#[rstest]
#[case(stack![1], "set")]
#[case(set![1], "set")]
#[case(seq![1], "set")]
fn test_set_unsupported(#[case] collection: Collection, #[case] operation: &str) {
    let error = collection.set(0, 1).unwrap_err();
    assert!(matches!(error, CollectionError::Unsupported { operation: found, .. } if found == operation));
}

// =============================================================================
// Merging
// =============================================================================

#[rstest]
fn test_merge_later_sources_win() {
    let merged = map! { "a" => 1, "b" => 2 }
        .merge([map! { "b" => 3 }, map! { "c" => 4 }])
        .unwrap();
    assert!(merged.equals(&map! { "a" => 1, "b" => 3, "c" => 4 }));
}

#[rstest]
fn test_merge_accepts_native_objects_and_pairs() {
    let merged = map! {}
        .merge([
            Value::object([("a", 1)]),
            Value::array([Value::array([Value::from("b"), Value::from(2)])]),
        ])
        .unwrap();
    assert_eq!(merged.get("a"), Some(Value::from(1)));
    assert_eq!(merged.get("b"), Some(Value::from(2)));
}

#[rstest]
fn test_merge_rejects_primitives() {
    let error = map! {}.merge([5]).unwrap_err();
    assert!(matches!(error, CollectionError::InvalidSource { .. }));
}

#[rstest]
fn test_merge_with_resolves_conflicts() {
    let summed = map! { "a" => 1 }
        .merge_with(
            |old, new, _| Value::from(old.as_int().unwrap_or(0) + new.as_int().unwrap_or(0)),
            [map! { "a" => 2, "b" => 5 }],
        )
        .unwrap();
    assert_eq!(summed.get("a"), Some(Value::from(3)));
    assert_eq!(summed.get("b"), Some(Value::from(5)));
}

#[rstest]
fn test_merge_deep() {
    let base = map! { "config" => map! { "port" => 80, "host" => "a" } };
    let merged = base
        .merge_deep([map! { "config" => map! { "port" => 8080 } }])
        .unwrap();
    assert_eq!(merged.get_in(["config", "host"]).unwrap(), Some(Value::from("a")));
    assert_eq!(merged.get_in(["config", "port"]).unwrap(), Some(Value::from(8080)));
}

#[rstest]
fn test_merge_list_appends() {
    let merged = list![1].merge([list![2, 3]]).unwrap();
    assert_eq!(merged.join(",").unwrap(), "1,2,3");
}

#[rstest]
fn test_merge_nothing_returns_self() {
    let scores = map! { "a" => 1 };
    assert!(scores.merge(Vec::<Value>::new()).unwrap().ptr_eq(&scores));
    assert!(scores.merge([map! { "a" => 1 }]).unwrap().ptr_eq(&scores));
}

#[rstest]
fn test_merge_refuses_infinite_source() {
    let naturals = Collection::range(0, None, 1);
    for target in [map! {}, list![1], set![1], ordered_map! { "a" => 1 }] {
        assert!(matches!(
            target.merge([naturals.clone()]),
            Err(CollectionError::InfiniteCollection { operation: "merge" })
        ));
    }
    assert!(map! {}.merge_deep([naturals]).is_err());
}

#[rstest]
fn test_set_algebra_refuses_infinite_operand() {
    let naturals = Collection::range(0, None, 1).to_set_seq();
    let members = set![1, 2];
    assert!(matches!(
        members.union([naturals.clone()]),
        Err(CollectionError::InfiniteCollection { operation: "union" })
    ));
    assert!(matches!(
        members.intersect([naturals.clone()]),
        Err(CollectionError::InfiniteCollection { operation: "intersect" })
    ));
    assert!(matches!(
        members.subtract([naturals]),
        Err(CollectionError::InfiniteCollection { operation: "subtract" })
    ));
}
