//! Grouping and counting by a derived key.

use std::collections::HashMap;

use crate::collection::{ensure_finite, Collection, CollectionType, Kind, Traverse};
use crate::error::CollectionError;
use crate::value::Value;

/// Entries bucketed by group key, groups in order of first appearance.
struct Groups {
    positions: HashMap<Value, usize>,
    buckets: Vec<(Value, Vec<(Value, Value)>)>,
}

impl Groups {
    fn collect<F>(source: &Collection, grouper: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value,
    {
        let mut groups = Self {
            positions: HashMap::new(),
            buckets: Vec::new(),
        };
        for (key, value) in source.iterate(false) {
            let group = grouper(&value, &key);
            let position = *groups.positions.entry(group.clone()).or_insert_with(|| {
                groups.buckets.push((group, Vec::new()));
                groups.buckets.len() - 1
            });
            groups.buckets[position].1.push((key, value));
        }
        groups
    }
}

fn grouped_type(source: &Collection) -> CollectionType {
    if source.is_ordered() {
        CollectionType::OrderedMap
    } else {
        CollectionType::Map
    }
}

impl Collection {
    /// Partitions the entries by `grouper(value, key)`.
    ///
    /// Each group is a collection of the same concrete type as this one,
    /// holding the group's entries in traversal order. The result is an
    /// `OrderedMap` when this collection is ordered and a `Map` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, CollectionType, Query, Value};
    ///
    /// let parity = list![1, 2, 3, 4, 5]
    ///     .group_by(|value, _| Value::from(value.as_int().unwrap() % 2 == 0))
    ///     .unwrap();
    /// assert_eq!(parity.collection_type(), CollectionType::OrderedMap);
    /// let odd = parity.get(false).unwrap().into_collection().unwrap();
    /// assert_eq!(odd.join(",").unwrap(), "1,3,5");
    /// ```
    pub fn group_by<F>(&self, grouper: F) -> Result<Self, CollectionError>
    where
        F: Fn(&Value, &Value) -> Value,
    {
        ensure_finite(self.size(), "group_by")?;
        let groups = Groups::collect(self, grouper);
        let entries = groups
            .buckets
            .into_iter()
            .map(|(group, entries)| (group, Value::Collection(self.bucket(entries))));
        Ok(Self::keyed_seq_of(entries).build(grouped_type(self)))
    }

    /// Counts the entries per `grouper(value, key)`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn count_by<F>(&self, grouper: F) -> Result<Self, CollectionError>
    where
        F: Fn(&Value, &Value) -> Value,
    {
        ensure_finite(self.size(), "count_by")?;
        let groups = Groups::collect(self, grouper);
        let entries = groups
            .buckets
            .into_iter()
            .map(|(group, entries)| (group, Value::from(entries.len())));
        Ok(Self::keyed_seq_of(entries).build(grouped_type(self)))
    }

    fn bucket(&self, entries: Vec<(Value, Value)>) -> Self {
        let bucket = match self.kind() {
            Kind::Keyed => Self::keyed_seq_of(entries),
            Kind::Indexed => Self::seq_of(entries.into_iter().map(|(_, value)| value)),
            Kind::Set => Self::set_seq_of(entries.into_iter().map(|(_, value)| value)),
        };
        self.reify(bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Query;
    use crate::{map, seq, set};
    use rstest::rstest;

    fn first_letter(value: &Value) -> Value {
        Value::from(value.as_str().and_then(|text| text.get(..1)).unwrap_or_default())
    }

    #[rstest]
    fn test_group_by_keeps_first_appearance_order() {
        let words = seq!["bee", "ant", "bat", "cow", "ape"];
        let groups = words.group_by(|value, _| first_letter(value)).unwrap();
        let keys: Vec<String> = groups.keys().map(|key| key.to_string()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        let bees = groups.get("b").and_then(Value::into_collection).unwrap();
        assert!(bees.is_lazy());
        assert_eq!(bees.join(",").unwrap(), "bee,bat");
    }

    #[rstest]
    fn test_group_by_keyed_keeps_keys_and_type() {
        let scores = map! { "ann" => 3, "bob" => 8, "cat" => 5 };
        let groups = scores
            .group_by(|value, _| Value::from(value.as_int().unwrap_or_default() >= 5))
            .unwrap();
        assert_eq!(groups.collection_type(), CollectionType::Map);
        let high = groups.get(true).and_then(Value::into_collection).unwrap();
        assert_eq!(high.collection_type(), CollectionType::Map);
        assert!(high.has("bob") && high.has("cat") && !high.has("ann"));
    }

    #[rstest]
    fn test_group_by_set_buckets_are_sets() {
        let groups = set![1, 2, 3, 4].group_by(|value, _| Value::from(value.as_int().unwrap_or_default() % 2)).unwrap();
        let even = groups.get(0).and_then(Value::into_collection).unwrap();
        assert_eq!(even.collection_type(), CollectionType::Set);
        assert!(even.has(2) && even.has(4));
    }

    #[rstest]
    fn test_count_by() {
        let counts = seq!["bee", "ant", "bat"].count_by(|value, _| first_letter(value)).unwrap();
        assert_eq!(counts.get("b"), Some(Value::from(2)));
        assert_eq!(counts.get("a"), Some(Value::from(1)));
    }

    #[rstest]
    fn test_group_by_infinite_fails() {
        let error = Collection::repeat(1, None).count_by(|value, _| value.clone()).unwrap_err();
        assert_eq!(error, CollectionError::InfiniteCollection { operation: "count_by" });
    }
}
