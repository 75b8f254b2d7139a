//! Integration tests for the lazy operation engine.
//!
//! Pipelines over finite and infinite sources, slicing edge cases, and the
//! reification of results into concrete collection types.

use std::cell::Cell;
use std::rc::Rc;

use lambars_collections::prelude::*;
use rstest::rstest;

fn int(value: &Value) -> i64 {
    value.as_int().unwrap_or_default()
}

fn joined(collection: &Collection) -> String {
    collection.join(",").unwrap()
}

// =============================================================================
// Sources
// =============================================================================

#[rstest]
#[case(0, Some(5), 1, "0,1,2,3,4")]
#[case(5, Some(0), 1, "5,4,3,2,1")]
#[case(0, Some(10), 3, "0,3,6,9")]
#[case(3, Some(3), 1, "")]
#[case(0, Some(4), 0, "0,1,2,3")]
fn test_range(#[case] start: i64, #[case] end: Option<i64>, #[case] step: i64, #[case] expected: &str) {
    assert_eq!(joined(&Collection::range(start, end, step)), expected);
}

#[rstest]
fn test_infinite_sources() {
    let naturals = Collection::range(0, None, 1);
    assert_eq!(naturals.size(), Size::Infinite);
    assert_eq!(naturals.get(1000), Some(Value::from(1000)));
    assert_eq!(naturals.take(3).size(), Size::Known(3));
    assert_eq!(Collection::repeat("x", None).take(2).join("").unwrap(), "xx");
    assert_eq!(Collection::repeat("x", Some(3)).count().unwrap(), 3);
}

#[rstest]
fn test_infinite_guards() {
    let naturals = Collection::range(0, None, 1);
    assert_eq!(
        naturals.count().unwrap_err().to_string(),
        "Cannot perform `count` with an infinite size."
    );
    assert!(matches!(
        naturals.reduce(0, |sum, value, _| sum + int(value)),
        Err(CollectionError::InfiniteCollection { operation: "reduce" })
    ));
    assert!(naturals.to_list().is_err());
    assert!(naturals.sort().is_err());
    assert!(naturals.group_by(|value, _| value.clone()).is_err());
    assert_eq!(naturals.last(), None);
    assert!(!naturals.is_empty());
}

#[rstest]
fn test_double_reverse_of_infinite_restores_source() {
    let naturals = Collection::range(0, None, 1);
    let restored = naturals.reverse().reverse();
    assert!(restored.ptr_eq(&naturals));
    assert_eq!(joined(&restored.take(3)), "0,1,2");
    assert_eq!(joined(&seq![1, 2, 3].reverse().reverse()), "1,2,3");
}

#[rstest]
fn test_reversed_infinite_is_empty() {
    let reversed = Collection::range(0, None, 1).reverse();
    assert_eq!(reversed.get(0), None);
    assert_eq!(reversed.first(), None);
    assert!(!reversed.has(5));
    assert_eq!(joined(&reversed.take(3)), "");
}

#[rstest]
fn test_reversed_filter_of_infinite_is_empty() {
    let evens = Collection::range(0, None, 1).filter(|value, _| int(value) % 2 == 0);
    assert_eq!(evens.reverse().first(), None);
    assert_eq!(evens.reverse().get(0), None);
    assert_eq!(joined(&evens.take(2)), "0,2");
}

#[rstest]
fn test_from_fn_restarts_each_traversal() {
    let generated = Collection::from_fn(|| (1..=3).map(Value::from));
    assert_eq!(joined(&generated), "1,2,3");
    assert_eq!(joined(&generated.reverse()), "3,2,1");
}

// =============================================================================
// Laziness
// =============================================================================

#[rstest]
fn test_every_traversal_recomputes() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let mapped = seq![1, 2, 3].map(move |value, _| {
        counter.set(counter.get() + 1);
        value.clone()
    });
    let _ = mapped.count().unwrap();
    let _ = mapped.count().unwrap();
    assert_eq!(calls.get(), 0, "count of a known-size map does not call the mapper");
    let _ = mapped.join(",").unwrap();
    let _ = mapped.join(",").unwrap();
    assert_eq!(calls.get(), 6);
}

#[rstest]
fn test_infinite_pipeline() {
    let result = Collection::range(1, None, 1)
        .skip(2)
        .filter(|value, _| int(value) % 3 == 0)
        .map(|value, _| Value::from(int(value) * 10))
        .take(4);
    assert_eq!(joined(&result), "30,60,90,120");
}

#[rstest]
fn test_reification_follows_concrete_type() {
    assert_eq!(list![1, 2].reverse().collection_type(), CollectionType::List);
    assert_eq!(stack![1, 2].filter(|_, _| true).collection_type(), CollectionType::Stack);
    assert_eq!(ordered_map! { "a" => 1 }.reverse().collection_type(), CollectionType::OrderedMap);
    assert_eq!(seq![1].reverse().collection_type(), CollectionType::Seq);
}

// =============================================================================
// Slicing
// =============================================================================

#[rstest]
#[case(0, None, "1,2,3,4,5")]
#[case(1, Some(3), "2,3")]
#[case(-2, None, "4,5")]
#[case(0, Some(-1), "1,2,3,4")]
#[case(-10, Some(2), "1,2")]
#[case(3, Some(1), "")]
#[case(9, None, "")]
fn test_slice_bounds(#[case] begin: i64, #[case] end: Option<i64>, #[case] expected: &str) {
    let numbers = list![1, 2, 3, 4, 5];
    assert_eq!(joined(&numbers.slice(begin, end)), expected);
    assert_eq!(joined(&numbers.to_seq().slice(begin, end)), expected);
}

#[rstest]
fn test_slice_of_unknown_size_with_negative_bound() {
    let unknown = seq![1, 2, 3, 4].filter(|value, _| int(value) > 1);
    assert_eq!(unknown.size(), Size::Unknown);
    assert_eq!(joined(&unknown.slice(-2, None)), "3,4");
}

#[rstest]
fn test_slice_of_infinite() {
    let naturals = Collection::range(0, None, 1);
    assert_eq!(joined(&naturals.slice(2, Some(5))), "2,3,4");
    assert!(naturals.slice(-3, Some(5)).is_empty());
    assert_eq!(naturals.slice(1, Some(-1)).size(), Size::Infinite);
}

#[rstest]
fn test_positional_helpers() {
    let numbers = list![1, 2, 3, 4];
    assert_eq!(joined(&numbers.rest()), "2,3,4");
    assert_eq!(joined(&numbers.butlast()), "1,2,3");
    assert_eq!(joined(&numbers.take_last(2)), "3,4");
    assert_eq!(joined(&numbers.skip_last(3)), "1");
    assert!(numbers.slice(0, None).ptr_eq(&numbers));
}

#[rstest]
fn test_slice_keyed_keeps_keys() {
    let scores = ordered_map! { "a" => 1, "b" => 2, "c" => 3 };
    let middle = scores.slice(1, Some(2));
    assert_eq!(middle.get("b"), Some(Value::from(2)));
    assert!(!middle.has("a"));
}

// =============================================================================
// Combination
// =============================================================================

#[rstest]
fn test_concat_kinds() {
    assert_eq!(joined(&list![1].concat([list![2, 3]])), "1,2,3");
    let keyed = ordered_map! { "a" => 1 }.concat([map! { "a" => 5 }]);
    assert_eq!(keyed.get("a"), Some(Value::from(5)));
    let members = set![1].concat([set![1, 2]]);
    assert_eq!(members.count().unwrap(), 2);
    let unchanged = list![1];
    assert!(unchanged.concat(Vec::<Value>::new()).ptr_eq(&unchanged));
}

#[rstest]
fn test_concat_infinite_tail() {
    let endless = seq![-1].concat([Collection::range(0, None, 1)]);
    assert_eq!(endless.size(), Size::Infinite);
    assert_eq!(joined(&endless.take(3)), "-1,0,1");
    let evens = seq![-1].concat([Collection::range(0, None, 1).filter(|value, _| int(value) % 2 == 0)]);
    assert_eq!(evens.get(3), Some(Value::from(4)));
}

#[rstest]
fn test_zip_variants() {
    let letters = list!["a", "b", "c"];
    let numbers = list![1, 2];
    assert_eq!(letters.zip([numbers.clone()]).count().unwrap(), 2);
    assert_eq!(letters.zip_all([numbers.clone()]).count().unwrap(), 3);
    let last = letters.zip_all([numbers.clone()]).last().unwrap();
    assert_eq!(last, Value::array([Value::from("c"), Value::Undefined]));
    let summed = numbers.zip_with(
        |row| Value::from(row.iter().map(int).sum::<i64>()),
        [list![10, 20]],
    );
    assert_eq!(joined(&summed), "11,22");
}

#[rstest]
fn test_zip_with_infinite() {
    let indexed = list!["x", "y"].zip([Collection::range(0, None, 1)]);
    assert_eq!(indexed.size(), Size::Known(2));
}

#[rstest]
fn test_interleave() {
    let mixed = seq![1, 2, 3].interleave([seq!["a", "b", "c"], seq![true, false, true]]);
    assert_eq!(mixed.size(), Size::Known(9));
    assert_eq!(mixed.get(4), Some(Value::from("b")));
}

#[rstest]
fn test_flatten_and_flat_map() {
    let nested = list![list![1, list![2]], 3];
    assert_eq!(joined(&nested.flatten(None)), "1,2,3");
    assert_eq!(nested.flatten(Some(1)).count().unwrap(), 3);
    let doubled = list![1, 2].flat_map(|value, _| Value::from(list![value.clone(), 0]));
    assert_eq!(joined(&doubled), "1,0,2,0");
}

// =============================================================================
// Ordering and grouping
// =============================================================================

#[rstest]
fn test_sort_is_stable() {
    let words = list!["bb", "a", "cc", "d"];
    let by_length = words.sort_by(|value, _| Value::from(value.as_str().map_or(0, str::len))).unwrap();
    assert_eq!(by_length.join(" ").unwrap(), "a d bb cc");
}

#[rstest]
fn test_sort_promotes_unordered() {
    let sorted = set![3, 1, 2].sort().unwrap();
    assert_eq!(sorted.collection_type(), CollectionType::OrderedSet);
    assert_eq!(joined(&sorted), "1,2,3");
    let by_value = map! { "x" => 2, "y" => 1 }.sort().unwrap();
    assert_eq!(by_value.collection_type(), CollectionType::OrderedMap);
    assert_eq!(by_value.keys().next(), Some(Value::from("y")));
}

#[rstest]
fn test_sort_with_comparator() {
    let descending = list![1, 3, 2].sort_with(|left, right| int(right).cmp(&int(left))).unwrap();
    assert_eq!(joined(&descending), "3,2,1");
}

#[rstest]
fn test_group_by_visits_once() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let groups = list![1, 2, 3, 4, 5]
        .group_by(move |value, _| {
            counter.set(counter.get() + 1);
            Value::from(int(value) % 3)
        })
        .unwrap();
    assert_eq!(calls.get(), 5);
    assert_eq!(groups.count().unwrap(), 3);
    let ones = groups.get(1).and_then(Value::into_collection).unwrap();
    assert_eq!(ones.collection_type(), CollectionType::List);
    assert_eq!(joined(&ones), "1,4");
}

#[rstest]
fn test_count_by() {
    let counts = map! { "a" => 1, "b" => 2, "c" => 1 }
        .count_by(|value, _| value.clone())
        .unwrap();
    assert_eq!(counts.collection_type(), CollectionType::Map);
    assert_eq!(counts.get(1), Some(Value::from(2)));
    assert_eq!(counts.get(2), Some(Value::from(1)));
}

// =============================================================================
// Views
// =============================================================================

#[rstest]
fn test_key_value_entry_views() {
    let scores = ordered_map! { "a" => 1, "b" => 2 };
    assert_eq!(joined(&scores.key_seq()), "a,b");
    assert_eq!(joined(&scores.value_seq()), "1,2");
    let restored = scores.entry_seq().from_entry_seq().to_ordered_map().unwrap();
    assert!(restored.equals(&scores));
}

#[rstest]
fn test_flip_and_map_keys() {
    let scores = ordered_map! { "a" => 1, "b" => 2 };
    assert_eq!(scores.flip().get(2), Some(Value::from("b")));
    let upper = scores.map_keys(|key, _| Value::from(key.as_str().unwrap_or_default().to_uppercase()));
    assert_eq!(upper.get("A"), Some(Value::from(1)));
    let swapped = scores.map_entries(|key, value| (value.clone(), key.clone()));
    assert_eq!(swapped.get(1), Some(Value::from("a")));
}
