//! Sorting.
//!
//! Sorts are stable, so entries that compare equal keep their traversal order.
//! Sorting a `Map` or `Set` produces its ordered counterpart.

use std::cmp::Ordering;

use super::{Comparator, Mapper};
use crate::collection::{ensure_finite, renumber, scan, Collection, CollectionType, Entries, Kind, Size, Traverse};
use crate::error::CollectionError;
use crate::persistent::ReferenceCounter;
use crate::value::Value;

/// Ranks values of different types for [`default_comparator`].
const fn rank(value: &Value) -> u8 {
    match value {
        Value::Int(_) | Value::Float(_) => 0,
        Value::Str(_) => 1,
        Value::Null => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
        Value::Collection(_) => 6,
        Value::Undefined => 7,
    }
}

/// The ordering used by `sort`, `max` and `min` when no comparator is given.
///
/// Numbers compare numerically and strings lexicographically, by code unit.
/// Values of different types are ranked numbers first, then strings, `null`,
/// booleans, native arrays, native objects, collections and `undefined` last.
/// Values of the same non-scalar type compare equal.
///
/// # Examples
///
/// ```rust
/// use std::cmp::Ordering;
/// use lambars_collections::{default_comparator, Value};
///
/// assert_eq!(default_comparator(&Value::from(2), &Value::from(10)), Ordering::Less);
/// assert_eq!(default_comparator(&Value::from("b"), &Value::from("a")), Ordering::Greater);
/// assert_eq!(default_comparator(&Value::Undefined, &Value::from(1)), Ordering::Greater);
/// ```
#[must_use]
pub fn default_comparator(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Int(left), Value::Int(right)) => left.cmp(right),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let (Some(left), Some(right)) = (left.as_f64(), right.as_f64()) else {
                return Ordering::Equal;
            };
            left.total_cmp(&right)
        }
        (Value::Str(left), Value::Str(right)) => left.encode_utf16().cmp(right.encode_utf16()),
        (Value::Bool(left), Value::Bool(right)) => left.cmp(right),
        _ => rank(left).cmp(&rank(right)),
    }
}

pub(crate) struct Sorted {
    source: Collection,
    comparator: Comparator,
    mapper: Option<Mapper>,
}

impl Sorted {
    fn sorted(&self) -> Vec<(Value, Value)> {
        let mut entries: Vec<(Value, Value)> = self.source.iterate(false).collect();
        match &self.mapper {
            None => entries.sort_by(|left, right| (self.comparator)(&left.1, &right.1)),
            Some(mapper) => {
                let mut keyed: Vec<(Value, (Value, Value))> = entries
                    .into_iter()
                    .map(|(key, value)| (mapper(&value, &key), (key, value)))
                    .collect();
                keyed.sort_by(|left, right| (self.comparator)(&left.0, &right.0));
                entries = keyed.into_iter().map(|(_, entry)| entry).collect();
            }
        }
        entries
    }
}

impl Traverse for Sorted {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        true
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let mut entries = self.sorted();
        if reverse {
            entries.reverse();
        }
        if self.source.kind().is_indexed() {
            let length = entries.len();
            renumber(Box::new(entries.into_iter().map(|(_, value)| value)), reverse, || length)
        } else {
            Box::new(entries.into_iter())
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        if self.source.kind().is_indexed() {
            return scan(self, key);
        }
        self.source.lookup(key)
    }
}

impl Collection {
    /// Sorts by value with [`default_comparator`].
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query};
    ///
    /// let sorted = list![3, "b", 1, "a"].sort().unwrap();
    /// assert_eq!(sorted.join(",").unwrap(), "1,3,a,b");
    /// ```
    pub fn sort(&self) -> Result<Self, CollectionError> {
        self.sorted_with(ReferenceCounter::new(default_comparator), None)
    }

    /// Sorts by value with `comparator`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn sort_with<C>(&self, comparator: C) -> Result<Self, CollectionError>
    where
        C: Fn(&Value, &Value) -> Ordering + 'static,
    {
        self.sorted_with(ReferenceCounter::new(comparator), None)
    }

    /// Sorts by `mapper(value, key)` with [`default_comparator`].
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn sort_by<F>(&self, mapper: F) -> Result<Self, CollectionError>
    where
        F: Fn(&Value, &Value) -> Value + 'static,
    {
        self.sorted_with(
            ReferenceCounter::new(default_comparator),
            Some(ReferenceCounter::new(mapper)),
        )
    }

    /// Sorts by `mapper(value, key)` with `comparator`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn sort_by_with<F, C>(&self, mapper: F, comparator: C) -> Result<Self, CollectionError>
    where
        F: Fn(&Value, &Value) -> Value + 'static,
        C: Fn(&Value, &Value) -> Ordering + 'static,
    {
        self.sorted_with(
            ReferenceCounter::new(comparator),
            Some(ReferenceCounter::new(mapper)),
        )
    }

    fn sorted_with(&self, comparator: Comparator, mapper: Option<Mapper>) -> Result<Self, CollectionError> {
        ensure_finite(self.size(), "sort")?;
        let sorted = Self::from_sequence(Sorted {
            source: self.clone(),
            comparator,
            mapper,
        });
        Ok(match self.collection_type() {
            CollectionType::Map => sorted.build(CollectionType::OrderedMap),
            CollectionType::Set => sorted.build(CollectionType::OrderedSet),
            _ => self.reify(sorted),
        })
    }
}
