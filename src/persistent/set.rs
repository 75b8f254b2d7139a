//! Set and ordered set bodies.

use super::{OrderedEntries, SetTrie};
use crate::collection::{Body, Collection};
use crate::value::Value;

pub(super) fn add(original: &Collection, trie: &SetTrie, value: Value) -> Collection {
    if trie.contains(&value) {
        original.clone()
    } else {
        Collection::from_body(Body::Set(trie.update(value)))
    }
}

pub(super) fn remove(original: &Collection, trie: &SetTrie, value: &Value) -> Collection {
    if trie.contains(value) {
        Collection::from_body(Body::Set(trie.without(value)))
    } else {
        original.clone()
    }
}

pub(super) fn add_ordered(original: &Collection, entries: &OrderedEntries, value: Value) -> Collection {
    if entries.contains(&value) {
        original.clone()
    } else {
        Collection::from_body(Body::OrderedSet(entries.insert(value.clone(), value)))
    }
}

pub(super) fn remove_ordered(original: &Collection, entries: &OrderedEntries, value: &Value) -> Collection {
    if entries.contains(value) {
        Collection::from_body(Body::OrderedSet(entries.remove(value)))
    } else {
        original.clone()
    }
}
