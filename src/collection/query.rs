//! Derived operations available on every [`Traverse`] implementation.
//!
//! Each operation is expressed only through the traversal primitive and the
//! capability queries, with a few capability-specific fast paths (indexed
//! `first`/`last`, set membership for `includes`).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::ControlFlow;

use super::protocol::{ensure_finite, Entries, IterMode, Kind, Size, Traverse};
use crate::error::CollectionError;
use crate::lazy::default_comparator;
use crate::persistent::ReferenceCounter;
use crate::value::Value;

/// Operations derived from [`Traverse`].
///
/// Blanket-implemented for every `Traverse` type, so a custom sequence gets
/// all of them for free. Callbacks receive `(value, key)`.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{list, Query, Value};
///
/// let numbers = list![3, 1, 2];
/// assert_eq!(numbers.max(), Some(Value::from(3)));
/// assert!(numbers.some(|value, _| value == &Value::from(1)));
/// assert_eq!(numbers.join("-").unwrap(), "3-1-2");
/// ```
pub trait Query: Traverse {
    /// The size, when known without traversal.
    #[inline]
    fn known_size(&self) -> Option<usize> {
        self.size().known()
    }

    /// Visits entries until `visitor` breaks.
    ///
    /// Returns the number of entries visited, the stopping one included.
    fn traverse<F>(&self, reverse: bool, mut visitor: F) -> usize
    where
        F: FnMut(&Value, &Value) -> ControlFlow<()>,
    {
        let mut visited = 0;
        for (key, value) in self.iterate(reverse) {
            visited += 1;
            if visitor(&value, &key).is_break() {
                break;
            }
        }
        visited
    }

    /// Iterates keys, values or `[key, value]` arrays.
    fn iter_mode(&self, mode: IterMode, reverse: bool) -> Box<dyn Iterator<Item = Value>> {
        let entries = self.iterate(reverse);
        match mode {
            IterMode::Keys => Box::new(entries.map(|(key, _)| key)),
            IterMode::Values => Box::new(entries.map(|(_, value)| value)),
            IterMode::Entries => Box::new(entries.map(|(key, value)| Value::array([key, value]))),
        }
    }

    /// The keys in traversal order.
    fn keys(&self) -> Box<dyn Iterator<Item = Value>> {
        self.iter_mode(IterMode::Keys, false)
    }

    /// The values in traversal order.
    fn values(&self) -> Box<dyn Iterator<Item = Value>> {
        self.iter_mode(IterMode::Values, false)
    }

    /// The `(key, value)` entries in traversal order.
    fn entries(&self) -> Entries {
        self.iterate(false)
    }

    /// Calls `side_effect` for every entry.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn for_each<F>(&self, mut side_effect: F) -> Result<usize, CollectionError>
    where
        F: FnMut(&Value, &Value),
    {
        ensure_finite(self.size(), "for_each")?;
        Ok(self.traverse(false, |value, key| {
            side_effect(value, key);
            ControlFlow::Continue(())
        }))
    }

    /// Calls `side_effect` until it returns `false`.
    ///
    /// Returns the number of entries visited, the stopping one included.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn for_each_while<F>(&self, mut side_effect: F) -> Result<usize, CollectionError>
    where
        F: FnMut(&Value, &Value) -> bool,
    {
        ensure_finite(self.size(), "for_each_while")?;
        Ok(self.traverse(false, |value, key| {
            if side_effect(value, key) {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        }))
    }

    /// Folds from the first entry.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn reduce<B, F>(&self, initial: B, mut reducer: F) -> Result<B, CollectionError>
    where
        F: FnMut(B, &Value, &Value) -> B,
    {
        ensure_finite(self.size(), "reduce")?;
        Ok(self
            .iterate(false)
            .fold(initial, |accumulator, (key, value)| reducer(accumulator, &value, &key)))
    }

    /// Folds from the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn reduce_right<B, F>(&self, initial: B, mut reducer: F) -> Result<B, CollectionError>
    where
        F: FnMut(B, &Value, &Value) -> B,
    {
        ensure_finite(self.size(), "reduce_right")?;
        Ok(self
            .iterate(true)
            .fold(initial, |accumulator, (key, value)| reducer(accumulator, &value, &key)))
    }

    /// Returns `true` when every entry satisfies `predicate`. Stops at the first failure.
    fn every<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.iterate(false).all(|(key, value)| predicate(&value, &key))
    }

    /// Returns `true` when some entry satisfies `predicate`.
    fn some<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        !self.every(|value, key| !predicate(value, key))
    }

    /// The first entry satisfying `predicate`.
    fn find_entry<P>(&self, mut predicate: P) -> Option<(Value, Value)>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.iterate(false).find(|(key, value)| predicate(value, key))
    }

    /// The first value satisfying `predicate`.
    fn find<P>(&self, predicate: P) -> Option<Value>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.find_entry(predicate).map(|(_, value)| value)
    }

    /// The key of the first entry satisfying `predicate`.
    fn find_key<P>(&self, predicate: P) -> Option<Value>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.find_entry(predicate).map(|(key, _)| key)
    }

    /// The last entry satisfying `predicate`.
    fn find_last_entry<P>(&self, mut predicate: P) -> Option<(Value, Value)>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.iterate(true).find(|(key, value)| predicate(value, key))
    }

    /// The last value satisfying `predicate`.
    fn find_last<P>(&self, predicate: P) -> Option<Value>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.find_last_entry(predicate).map(|(_, value)| value)
    }

    /// The key of the last entry satisfying `predicate`.
    fn find_last_key<P>(&self, predicate: P) -> Option<Value>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.find_last_entry(predicate).map(|(key, _)| key)
    }

    /// The key of the first entry whose value equals `search`.
    fn key_of(&self, search: &Value) -> Option<Value> {
        self.find_key(|value, _| value == search)
    }

    /// The key of the last entry whose value equals `search`.
    fn last_key_of(&self, search: &Value) -> Option<Value> {
        self.find_last_key(|value, _| value == search)
    }

    /// The first value.
    fn first(&self) -> Option<Value> {
        match (self.kind(), self.size()) {
            (_, Size::Known(0)) => None,
            (Kind::Indexed, Size::Known(_)) => self.lookup(&Value::Int(0)),
            _ => self.iterate(false).next().map(|(_, value)| value),
        }
    }

    /// The last value. Infinite sequences have none.
    fn last(&self) -> Option<Value> {
        match (self.kind(), self.size()) {
            (_, Size::Infinite) => None,
            (Kind::Indexed, Size::Known(length)) => length
                .checked_sub(1)
                .and_then(|index| self.lookup(&Value::from(index))),
            _ => self.iterate(true).next().map(|(_, value)| value),
        }
    }

    /// The greatest value under the default ordering.
    fn max(&self) -> Option<Value> {
        self.max_with(default_comparator)
    }

    /// The greatest value under `comparator`. The first of equal values wins.
    fn max_with<C>(&self, mut comparator: C) -> Option<Value>
    where
        C: FnMut(&Value, &Value) -> Ordering,
    {
        self.values().reduce(|best, candidate| {
            if comparator(&candidate, &best) == Ordering::Greater {
                candidate
            } else {
                best
            }
        })
    }

    /// The value whose `mapper(value, key)` is greatest.
    fn max_by<M>(&self, mapper: M) -> Option<Value>
    where
        M: FnMut(&Value, &Value) -> Value,
    {
        extreme_by(self, mapper, Ordering::Greater)
    }

    /// The least value under the default ordering.
    fn min(&self) -> Option<Value> {
        self.min_with(default_comparator)
    }

    /// The least value under `comparator`. The first of equal values wins.
    fn min_with<C>(&self, mut comparator: C) -> Option<Value>
    where
        C: FnMut(&Value, &Value) -> Ordering,
    {
        self.values().reduce(|best, candidate| {
            if comparator(&candidate, &best) == Ordering::Less {
                candidate
            } else {
                best
            }
        })
    }

    /// The value whose `mapper(value, key)` is least.
    fn min_by<M>(&self, mapper: M) -> Option<Value>
    where
        M: FnMut(&Value, &Value) -> Value,
    {
        extreme_by(self, mapper, Ordering::Less)
    }

    /// The number of entries.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn count(&self) -> Result<usize, CollectionError> {
        ensure_finite(self.size(), "count")?;
        Ok(match self.size() {
            Size::Known(count) => count,
            _ => self.iterate(false).count(),
        })
    }

    /// The number of entries satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn count_where<P>(&self, mut predicate: P) -> Result<usize, CollectionError>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        ensure_finite(self.size(), "count_where")?;
        Ok(self
            .iterate(false)
            .filter(|(key, value)| predicate(value, key))
            .count())
    }

    /// Returns `true` when there are no entries.
    fn is_empty(&self) -> bool {
        match self.size() {
            Size::Known(count) => count == 0,
            Size::Infinite => false,
            Size::Unknown => self.iterate(false).next().is_none(),
        }
    }

    /// Returns `true` when some value equals `value`.
    fn includes<V: Into<Value>>(&self, value: V) -> bool {
        let search = value.into();
        match self.kind() {
            Kind::Set => self.lookup(&search).is_some(),
            Kind::Keyed | Kind::Indexed => self.some(|value, _| value == &search),
        }
    }

    /// Joins the values' display forms. `Undefined` and `Null` render empty.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn join(&self, separator: &str) -> Result<String, CollectionError> {
        ensure_finite(self.size(), "join")?;
        let mut joined = String::new();
        for (index, (_, value)) in self.iterate(false).enumerate() {
            if index > 0 {
                joined.push_str(separator);
            }
            if !matches!(value, Value::Undefined | Value::Null) {
                joined.push_str(&value.to_string());
            }
        }
        Ok(joined)
    }

    /// The values as a vector; keyed collections yield `[key, value]` arrays.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn to_array(&self) -> Result<Vec<Value>, CollectionError> {
        ensure_finite(self.size(), "to_array")?;
        let keyed = self.kind().is_keyed();
        Ok(self
            .iterate(false)
            .map(|(key, value)| if keyed { Value::array([key, value]) } else { value })
            .collect())
    }

    /// The entries as object properties, keyed by the keys' display form.
    ///
    /// A repeated property keeps its first position and takes the last value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] on infinite sequences.
    fn to_object(&self) -> Result<Vec<(String, Value)>, CollectionError> {
        ensure_finite(self.size(), "to_object")?;
        Ok(build_object(self.iterate(false)))
    }

    /// Deeply converts to native values: keyed collections become objects,
    /// everything else arrays.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] when this or a nested
    /// collection is infinite.
    fn to_js(&self) -> Result<Value, CollectionError> {
        ensure_finite(self.size(), "to_js")?;
        if self.kind().is_keyed() {
            let entries = self
                .iterate(false)
                .map(|(key, value)| value.to_js().map(|value| (key, value)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Object(ReferenceCounter::from(build_object(entries.into_iter()))))
        } else {
            self.values()
                .map(|value| value.to_js())
                .collect::<Result<Vec<_>, _>>()
                .map(Value::from)
        }
    }
}

impl<T: Traverse + ?Sized> Query for T {}

fn extreme_by<T, M>(sequence: &T, mut mapper: M, wanted: Ordering) -> Option<Value>
where
    T: Traverse + ?Sized,
    M: FnMut(&Value, &Value) -> Value,
{
    sequence
        .iterate(false)
        .map(|(key, value)| (mapper(&value, &key), value))
        .reduce(|best, candidate| {
            if default_comparator(&candidate.0, &best.0) == wanted {
                candidate
            } else {
                best
            }
        })
        .map(|(_, value)| value)
}

fn build_object<I>(entries: I) -> Vec<(String, Value)>
where
    I: Iterator<Item = (Value, Value)>,
{
    let mut object = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for (key, value) in entries {
        let name = key.to_string();
        match positions.get(&name) {
            Some(&position) => object[position] = (name, value),
            None => {
                positions.insert(name.clone(), object.len());
                object.push((name, value));
            }
        }
    }
    object
}
