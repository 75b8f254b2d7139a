//! Integration tests for the deep path engine.
//!
//! Covers reads, gap-filling writes, identity preservation, no-op removals
//! and the key path error messages.

use lambars_collections::path;
use lambars_collections::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn nested() -> Collection {
    map! { "a" => map! { "b" => map! { "c" => 10 } } }
}

fn as_map(value: Value) -> Collection {
    value.into_collection().expect("expected a collection")
}

// =============================================================================
// Reads
// =============================================================================

#[rstest]
fn test_get_in_reads_leaf(nested: Collection) {
    assert_eq!(nested.get_in(["a", "b", "c"]).unwrap(), Some(Value::from(10)));
}

#[rstest]
fn test_get_in_missing_key_is_none(nested: Collection) {
    assert_eq!(nested.get_in(["a", "b", "z"]).unwrap(), None);
    assert_eq!(nested.get_in(["q", "r", "s"]).unwrap(), None);
}

#[rstest]
fn test_get_in_or_default(nested: Collection) {
    assert_eq!(nested.get_in_or(["a", "x"], "fallback").unwrap(), Value::from("fallback"));
    assert_eq!(nested.get_in_or(["a", "b", "c"], 0).unwrap(), Value::from(10));
}

#[rstest]
fn test_has_in(nested: Collection) {
    assert!(nested.has_in(["a", "b", "c"]).unwrap());
    assert!(nested.has_in(["a", "b", "c", "d"]).is_err());
    assert!(!nested.has_in(["a", "c"]).unwrap());
}

#[rstest]
fn test_get_in_accepts_collection_paths(nested: Collection) {
    assert_eq!(nested.get_in(list!["a", "b", "c"]).unwrap(), Some(Value::from(10)));
    assert_eq!(nested.get_in(seq!["a", "b"]).unwrap().map(as_map).map(|inner| inner.has("c")), Some(true));
}

#[rstest]
fn test_get_in_through_indices() {
    let root = map! { "rows" => list![list![1, 2], list![3, 4]] };
    let path: KeyPath = KeyPath::new().child("rows").child(-1).child(0);
    assert_eq!(root.get_in(path).unwrap(), Some(Value::from(3)));
    assert_eq!(root.get_at("rows.0.1").unwrap(), Some(Value::from(2)));
    assert_eq!(root.get_at("rows.9.1").unwrap(), None);
}

// =============================================================================
// Errors
// =============================================================================

#[rstest]
#[case(Value::Undefined, "Invalid keyPath: expected Ordered Iterable or Array: undefined")]
#[case(
    Value::object([("a", 1)]),
    "Invalid keyPath: expected Ordered Iterable or Array: [object Object]"
)]
#[case(Value::from("a.b"), "Invalid keyPath: expected Ordered Iterable or Array: a.b")]
fn test_invalid_key_paths(nested: Collection, #[case] path: Value, #[case] message: &str) {
    let error = nested.get_in(path).unwrap_err();
    assert!(matches!(error, CollectionError::InvalidKeyPath { .. }));
    assert_eq!(error.to_string(), message);
}

#[rstest]
fn test_reading_through_number_names_prefix() {
    let root = map! { "a" => map! { "b" => 5 } };
    let error = root.get_in(["a", "b", "c"]).unwrap_err();
    assert_eq!(
        error.to_string(),
        r#"Invalid keyPath: Value at ["a","b"] does not have a .get() method: 5"#
    );
}

#[rstest]
fn test_reading_through_native_object_is_not_readable() {
    let root = map! { "a" => Value::object([("b", 1)]) };
    assert!(matches!(
        root.get_in(["a", "b"]),
        Err(CollectionError::NotReadable { .. })
    ));
}

// =============================================================================
// Writes
// =============================================================================

#[rstest]
fn test_update_in_doubles(nested: Collection) {
    let doubled = nested
        .update_in(["a", "b", "c"], |value| {
            value.and_then(|value| value.as_int()).map(|value| Value::from(value * 2))
        })
        .unwrap();
    assert_eq!(doubled, Value::from(map! { "a" => map! { "b" => map! { "c" => 20 } } }));
    assert_eq!(nested.get_in(["a", "b", "c"]).unwrap(), Some(Value::from(10)));
}

#[rstest]
fn test_update_in_or_fills_gaps(nested: Collection) {
    let filled = nested
        .update_in_or(["a", "q", "z"], map! {}, |value| {
            Value::from(as_map(value).set("d", 20).unwrap())
        })
        .unwrap();
    let expected = map! {
        "a" => map! {
            "b" => map! { "c" => 10 },
            "q" => map! { "z" => map! { "d" => 20 } },
        },
    };
    assert_eq!(filled, Value::from(expected));
    let sibling_before = nested.get_in(["a", "b"]).unwrap().unwrap();
    let sibling_after = path::get_in(&filled, ["a", "b"]).unwrap().unwrap();
    assert!(sibling_before.is_identical(&sibling_after));
}

#[rstest]
fn test_update_in_or_default_short_circuit(nested: Collection) {
    let fallback = Value::from(map! {});
    let result = nested
        .update_in_or(["x", "y"], fallback.clone(), |value| value)
        .unwrap();
    assert!(result.is_identical(&Value::from(&nested)));
}

#[rstest]
fn test_update_in_identity_preserves_root(nested: Collection) {
    let result = nested.update_in(["a", "b", "c"], |value| value).unwrap();
    assert!(result.is_identical(&Value::from(&nested)));
    let result = nested.update_in(["a", "b"], |value| value).unwrap();
    assert!(result.is_identical(&Value::from(&nested)));
}

#[rstest]
fn test_set_in_fabricates_maps() {
    let written = map! {}.set_in(["a", "b"], 1).unwrap();
    let inner = path::get_in(&written, ["a"]).unwrap().map(as_map).unwrap();
    assert_eq!(inner.collection_type(), CollectionType::Map);
    assert_eq!(inner.get("b"), Some(Value::from(1)));
}

#[rstest]
fn test_set_in_same_value_is_identity(nested: Collection) {
    let result = nested.set_in(["a", "b", "c"], 10).unwrap();
    assert!(result.is_identical(&Value::from(&nested)));
}

#[rstest]
fn test_set_in_pads_lists() {
    let root = map! { "items" => list![1] };
    let written = root.set_at("items.3", 4).unwrap();
    let items = path::get_in(&written, ["items"]).unwrap().map(as_map).unwrap();
    assert_eq!(items.to_string(), "List [ 1, undefined, undefined, 4 ]");
}

#[rstest]
fn test_remove_in_missing_is_identity(nested: Collection) {
    let result = nested.remove_in(["a", "x", "y"]).unwrap();
    assert!(result.is_identical(&Value::from(&nested)));
    assert!(!nested.has_in(["a", "x"]).unwrap());
}

#[rstest]
fn test_remove_in_existing(nested: Collection) {
    let result = nested.remove_in(["a", "b", "c"]).unwrap();
    assert_eq!(
        path::get_in(&result, ["a", "b"]).unwrap(),
        Some(Value::from(map! {}))
    );
}

#[rstest]
fn test_merge_in_missing_is_identity(nested: Collection) {
    let result = nested.merge_in(["z"], [map! { "k" => 1 }]).unwrap();
    assert!(result.is_identical(&Value::from(&nested)));
}

#[rstest]
fn test_merge_in_existing(nested: Collection) {
    let result = nested.merge_in(["a", "b"], [map! { "d" => 1 }]).unwrap();
    assert_eq!(path::get_in(&result, ["a", "b", "c"]).unwrap(), Some(Value::from(10)));
    assert_eq!(path::get_in(&result, ["a", "b", "d"]).unwrap(), Some(Value::from(1)));
}

// =============================================================================
// Empty path
// =============================================================================

#[rstest]
fn test_empty_path_semantics(nested: Collection) {
    let empty = KeyPath::new();
    assert_eq!(nested.get_in(&empty).unwrap(), Some(Value::from(&nested)));
    assert_eq!(nested.set_in(&empty, 5).unwrap(), Value::from(5));
    assert_eq!(nested.remove_in(&empty).unwrap(), Value::Undefined);
    assert_eq!(nested.update_in(&empty, |_| None).unwrap(), Value::Undefined);
    let replaced = nested.update_in(&empty, |_| Some(Value::from(list![1]))).unwrap();
    assert_eq!(replaced, Value::from(list![1]));
}

#[rstest]
fn test_empty_dotted_path_is_root(nested: Collection) {
    assert_eq!(nested.get_at("").unwrap(), Some(Value::from(&nested)));
}
