//! Insertion-ordered entries backing `OrderedMap` and `OrderedSet`.
//!
//! Keys map to slot positions in a trie; slots hold the entries in insertion
//! order. Removal leaves a hole so the other positions stay valid, and the
//! slots are compacted once holes outnumber live entries.

use super::TrieHasher;
use crate::value::Value;

const COMPACTION_THRESHOLD: usize = 32;

#[derive(Clone, Default)]
pub(crate) struct OrderedEntries {
    positions: im::HashMap<Value, usize, TrieHasher>,
    slots: im::Vector<Option<(Value, Value)>>,
}

impl OrderedEntries {
    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn get(&self, key: &Value) -> Option<&Value> {
        let position = *self.positions.get(key)?;
        self.slots
            .get(position)
            .and_then(Option::as_ref)
            .map(|(_, value)| value)
    }

    pub(crate) fn contains(&self, key: &Value) -> bool {
        self.positions.contains_key(key)
    }

    /// Stores an entry. A key that is already present keeps its slot.
    pub(crate) fn insert(&self, key: Value, value: Value) -> Self {
        match self.positions.get(&key) {
            Some(&position) => Self {
                positions: self.positions.clone(),
                slots: self.slots.update(position, Some((key, value))),
            },
            None => {
                let mut slots = self.slots.clone();
                let position = slots.len();
                slots.push_back(Some((key.clone(), value)));
                Self {
                    positions: self.positions.update(key, position),
                    slots,
                }
            }
        }
    }

    pub(crate) fn remove(&self, key: &Value) -> Self {
        let Some(&position) = self.positions.get(key) else {
            return self.clone();
        };
        let removed = Self {
            positions: self.positions.without(key),
            slots: self.slots.update(position, None),
        };
        if removed.slots.len() > COMPACTION_THRESHOLD && removed.len() * 2 < removed.slots.len() {
            removed.iter().cloned().collect()
        } else {
            removed
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(Value, Value)> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

impl FromIterator<(Value, Value)> for OrderedEntries {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iterable: I) -> Self {
        iterable
            .into_iter()
            .fold(Self::default(), |entries, (key, value)| entries.insert(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn entries_of(keys: &[i32]) -> OrderedEntries {
        keys.iter()
            .map(|&key| (Value::from(key), Value::from(key * 10)))
            .collect()
    }

    fn keys_of(entries: &OrderedEntries) -> Vec<Value> {
        entries.iter().map(|(key, _)| key.clone()).collect()
    }

    #[rstest]
    fn test_insertion_order_is_kept() {
        let entries = entries_of(&[3, 1, 2]);
        assert_eq!(keys_of(&entries), vec![Value::from(3), Value::from(1), Value::from(2)]);
    }

    #[rstest]
    fn test_reinsert_keeps_slot() {
        let entries = entries_of(&[1, 2]).insert(Value::from(1), Value::from("one"));
        assert_eq!(keys_of(&entries), vec![Value::from(1), Value::from(2)]);
        assert_eq!(entries.get(&Value::from(1)), Some(&Value::from("one")));
    }

    #[rstest]
    fn test_remove_then_reinsert_moves_to_end() {
        let entries = entries_of(&[1, 2, 3])
            .remove(&Value::from(1))
            .insert(Value::from(1), Value::from(0));
        assert_eq!(keys_of(&entries), vec![Value::from(2), Value::from(3), Value::from(1)]);
        assert_eq!(entries.len(), 3);
    }

    #[rstest]
    fn test_compaction_preserves_order() {
        let keys: Vec<i32> = (0..100).collect();
        let mut entries = entries_of(&keys);
        for key in 0..90 {
            entries = entries.remove(&Value::from(key));
        }
        let expected: Vec<Value> = (90..100).map(Value::from).collect();
        assert_eq!(keys_of(&entries), expected);
        assert!(entries.slots.len() < 100);
    }
}
