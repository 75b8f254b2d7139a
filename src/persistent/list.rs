//! List and stack bodies.

use super::IndexedTrie;
use crate::collection::{Body, Collection};
use crate::value::Value;

fn list(vector: IndexedTrie) -> Collection {
    Collection::from_body(Body::List(vector))
}

fn stack(vector: IndexedTrie) -> Collection {
    Collection::from_body(Body::Stack(vector))
}

fn signed_length(vector: &IndexedTrie) -> i64 {
    i64::try_from(vector.len()).unwrap_or(i64::MAX)
}

/// Stores `value` at `key`, padding with `Undefined` on either side.
///
/// A negative index reaching before the start grows the list at the front:
/// setting `-3` on `[1, 2]` gives `[value, 1, 2]`.
pub(super) fn set(original: &Collection, vector: &IndexedTrie, key: &Value, value: Value) -> Collection {
    let Some(index) = key.as_index() else {
        return original.clone();
    };
    let resolved = if index < 0 {
        index.saturating_add(signed_length(vector))
    } else {
        index
    };

    if resolved < 0 {
        let padding = usize::try_from(resolved.unsigned_abs()).unwrap_or(usize::MAX);
        let mut grown = vector.clone();
        for _ in 1..padding {
            grown.push_front(Value::Undefined);
        }
        grown.push_front(value);
        return list(grown);
    }

    let Ok(resolved) = usize::try_from(resolved) else {
        return original.clone();
    };
    match vector.get(resolved) {
        Some(existing) if existing.is_identical(&value) => original.clone(),
        Some(_) => list(vector.update(resolved, value)),
        None => {
            let mut grown = vector.clone();
            while grown.len() < resolved {
                grown.push_back(Value::Undefined);
            }
            grown.push_back(value);
            list(grown)
        }
    }
}

/// Removes the element at `key`, shifting later elements down.
pub(super) fn remove(original: &Collection, vector: &IndexedTrie, key: &Value) -> Collection {
    match original.resolve_index(key) {
        Some(index) if index < vector.len() => {
            let mut shrunk = vector.clone();
            shrunk.remove(index);
            list(shrunk)
        }
        _ => original.clone(),
    }
}

/// Inserts before `index`, clamped to the list bounds.
pub(super) fn insert(vector: &IndexedTrie, index: i64, value: Value) -> Collection {
    let length = signed_length(vector);
    let resolved = if index < 0 {
        index.saturating_add(length).max(0)
    } else {
        index.min(length)
    };
    let mut grown = vector.clone();
    grown.insert(usize::try_from(resolved).unwrap_or(0), value);
    list(grown)
}

pub(super) fn push_back(vector: &IndexedTrie, value: Value) -> Collection {
    let mut grown = vector.clone();
    grown.push_back(value);
    list(grown)
}

pub(super) fn push_front(vector: &IndexedTrie, value: Value) -> Collection {
    let mut grown = vector.clone();
    grown.push_front(value);
    stack(grown)
}

pub(super) fn pop_back(original: &Collection, vector: &IndexedTrie) -> Collection {
    if vector.is_empty() {
        return original.clone();
    }
    let mut shrunk = vector.clone();
    shrunk.pop_back();
    list(shrunk)
}

pub(super) fn pop_front(original: &Collection, vector: &IndexedTrie) -> Collection {
    if vector.is_empty() {
        return original.clone();
    }
    let mut shrunk = vector.clone();
    shrunk.pop_front();
    stack(shrunk)
}
