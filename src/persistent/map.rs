//! Map and ordered map bodies.

use super::{KeyedTrie, OrderedEntries};
use crate::collection::{Body, Collection};
use crate::value::Value;

pub(super) fn set(original: &Collection, trie: &KeyedTrie, key: Value, value: Value) -> Collection {
    if trie.get(&key).is_some_and(|existing| existing.is_identical(&value)) {
        return original.clone();
    }
    Collection::from_body(Body::Map(trie.update(key, value)))
}

pub(super) fn remove(original: &Collection, trie: &KeyedTrie, key: &Value) -> Collection {
    if trie.contains_key(key) {
        Collection::from_body(Body::Map(trie.without(key)))
    } else {
        original.clone()
    }
}

pub(super) fn set_ordered(
    original: &Collection,
    entries: &OrderedEntries,
    key: Value,
    value: Value,
) -> Collection {
    if entries.get(&key).is_some_and(|existing| existing.is_identical(&value)) {
        return original.clone();
    }
    Collection::from_body(Body::OrderedMap(entries.insert(key, value)))
}

pub(super) fn remove_ordered(original: &Collection, entries: &OrderedEntries, key: &Value) -> Collection {
    if entries.contains(key) {
        Collection::from_body(Body::OrderedMap(entries.remove(key)))
    } else {
        original.clone()
    }
}
