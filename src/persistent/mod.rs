//! Realized persistent collections.
//!
//! The tries themselves come from the `im` crate; this module wraps them in
//! the [`Collection`] handle and implements the mutators:
//!
//! - `List`: indexed, backed by an RRB vector
//! - `Stack`: indexed, top of the stack at position `0`
//! - `Map` / `Set`: hash array mapped tries
//! - `OrderedMap` / `OrderedSet`: a trie of positions over an insertion-ordered slot vector
//!
//! Every mutator returns the original handle when the content is unchanged,
//! so "nothing happened" can be detected with [`Collection::ptr_eq`].
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{list, map, Value};
//!
//! let numbers = list![1, 2, 3];
//! let pushed = numbers.push(4).unwrap();
//! assert_eq!(numbers.get(3), None);           // Original unchanged
//! assert_eq!(pushed.get(3), Some(Value::from(4)));
//!
//! let scores = map! { "a" => 1 };
//! let same = scores.set("a", 1).unwrap();
//! assert!(same.ptr_eq(&scores));               // Identical value, same handle
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// Collections are single-threaded values, so this is always `std::rc::Rc`.
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

// =============================================================================
// Trie Hasher
// =============================================================================

/// Hasher used by the keyed and set tries.
///
/// With the `fxhash` feature enabled this is `FxHasher`, which is faster for
/// the small integer hashes values produce. Otherwise the deterministic std
/// hasher is used so iteration order is stable across runs.
#[cfg(feature = "fxhash")]
pub(crate) type TrieHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

#[cfg(not(feature = "fxhash"))]
pub(crate) type TrieHasher = std::hash::BuildHasherDefault<std::hash::DefaultHasher>;

pub(crate) type IndexedTrie = im::Vector<Value>;
pub(crate) type KeyedTrie = im::HashMap<Value, Value, TrieHasher>;
pub(crate) type SetTrie = im::HashSet<Value, TrieHasher>;

mod list;
mod map;
mod merge;
mod ordered;
mod set;

pub(crate) use merge::{entry_of, merge_into, Merger};
pub(crate) use ordered::OrderedEntries;

use crate::collection::{ensure_finite, Body, Collection, CollectionType, Kind, Query, Traverse};
use crate::error::CollectionError;
use crate::value::Value;

// =============================================================================
// Constructors
// =============================================================================

impl Collection {
    /// Creates an empty collection of the given type.
    ///
    /// An empty `Seq` is an empty indexed sequence.
    pub fn empty(collection_type: CollectionType) -> Self {
        match collection_type {
            CollectionType::List => Self::from_body(Body::List(IndexedTrie::new())),
            CollectionType::Stack => Self::from_body(Body::Stack(IndexedTrie::new())),
            CollectionType::Map => Self::from_body(Body::Map(KeyedTrie::default())),
            CollectionType::OrderedMap => Self::from_body(Body::OrderedMap(OrderedEntries::default())),
            CollectionType::Set => Self::from_body(Body::Set(SetTrie::default())),
            CollectionType::OrderedSet => Self::from_body(Body::OrderedSet(OrderedEntries::default())),
            CollectionType::Seq => Self::seq_of(std::iter::empty::<Value>()),
        }
    }

    /// Creates a list from values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{Collection, Query};
    ///
    /// let list = Collection::list_of([1, 2, 3]);
    /// assert_eq!(list.count().unwrap(), 3);
    /// ```
    pub fn list_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_body(Body::List(values.into_iter().map(Into::into).collect()))
    }

    /// Creates a stack from values; the first value is the top.
    pub fn stack_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_body(Body::Stack(values.into_iter().map(Into::into).collect()))
    }

    /// Creates a map from entries. A repeated key takes the last value.
    pub fn map_of<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::from_body(Body::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// Creates an insertion-ordered map from entries.
    pub fn ordered_map_of<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::from_body(Body::OrderedMap(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }

    /// Creates a set from values.
    pub fn set_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_body(Body::Set(values.into_iter().map(Into::into).collect()))
    }

    /// Creates an insertion-ordered set from values.
    pub fn ordered_set_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_body(Body::OrderedSet(
            values
                .into_iter()
                .map(|value| {
                    let value = value.into();
                    (value.clone(), value)
                })
                .collect(),
        ))
    }
}

// =============================================================================
// Mutators
// =============================================================================

impl Collection {
    /// Whether this collection supports keyed writes.
    pub fn supports_set(&self) -> bool {
        self.collection_type().is_settable()
    }

    /// Returns a collection with `value` stored under `key`.
    ///
    /// Lists pad with `Undefined` when `key` lies beyond the end and ignore
    /// keys that are not indices. Storing an identical value returns `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for stacks, sets and sequences.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Value};
    ///
    /// let padded = list![1].set(3, 4).unwrap();
    /// assert_eq!(padded.to_string(), "List [ 1, undefined, undefined, 4 ]");
    /// ```
    pub fn set<K: Into<Value>, V: Into<Value>>(&self, key: K, value: V) -> Result<Self, CollectionError> {
        self.set_entry(key.into(), value.into())
    }

    pub(crate) fn set_entry(&self, key: Value, value: Value) -> Result<Self, CollectionError> {
        match self.body() {
            Body::List(vector) => Ok(list::set(self, vector, &key, value)),
            Body::Map(trie) => Ok(map::set(self, trie, key, value)),
            Body::OrderedMap(entries) => Ok(map::set_ordered(self, entries, key, value)),
            _ => Err(self.unsupported("set")),
        }
    }

    /// Returns a collection without `key`; sets remove the value itself.
    ///
    /// Removing an absent key returns `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for stacks and sequences.
    pub fn remove<K: Into<Value>>(&self, key: K) -> Result<Self, CollectionError> {
        self.remove_entry(&key.into())
    }

    pub(crate) fn remove_entry(&self, key: &Value) -> Result<Self, CollectionError> {
        match self.body() {
            Body::List(vector) => Ok(list::remove(self, vector, key)),
            Body::Map(trie) => Ok(map::remove(self, trie, key)),
            Body::OrderedMap(entries) => Ok(map::remove_ordered(self, entries, key)),
            Body::Set(trie) => Ok(set::remove(self, trie, key)),
            Body::OrderedSet(entries) => Ok(set::remove_ordered(self, entries, key)),
            _ => Err(self.unsupported("remove")),
        }
    }

    /// Replaces the value under `key` with `updater(current)`.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::set`].
    pub fn update<K, F>(&self, key: K, updater: F) -> Result<Self, CollectionError>
    where
        K: Into<Value>,
        F: FnOnce(Option<Value>) -> Value,
    {
        let key = key.into();
        let current = self.get_value(&key);
        self.set_entry(key, updater(current))
    }

    /// Appends to a list, or pushes onto the top of a stack.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for other types.
    pub fn push<V: Into<Value>>(&self, value: V) -> Result<Self, CollectionError> {
        match self.body() {
            Body::List(vector) => Ok(list::push_back(vector, value.into())),
            Body::Stack(vector) => Ok(list::push_front(vector, value.into())),
            _ => Err(self.unsupported("push")),
        }
    }

    /// Drops the last list element, or the top of a stack.
    ///
    /// Popping an empty collection returns `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for other types.
    pub fn pop(&self) -> Result<Self, CollectionError> {
        match self.body() {
            Body::List(vector) => Ok(list::pop_back(self, vector)),
            Body::Stack(vector) => Ok(list::pop_front(self, vector)),
            _ => Err(self.unsupported("pop")),
        }
    }

    /// The top of a stack, or the first element of any other collection.
    pub fn peek(&self) -> Option<Value> {
        self.first()
    }

    /// Inserts `value` before `index` in a list, shifting the rest.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for other types.
    pub fn insert<V: Into<Value>>(&self, index: i64, value: V) -> Result<Self, CollectionError> {
        match self.body() {
            Body::List(vector) => Ok(list::insert(vector, index, value.into())),
            _ => Err(self.unsupported("insert")),
        }
    }

    /// Adds a value to a set. Adding a member returns `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for other types.
    pub fn add<V: Into<Value>>(&self, value: V) -> Result<Self, CollectionError> {
        match self.body() {
            Body::Set(trie) => Ok(set::add(self, trie, value.into())),
            Body::OrderedSet(entries) => Ok(set::add_ordered(self, entries, value.into())),
            _ => Err(self.unsupported("add")),
        }
    }

    /// An empty collection of the same type. Clearing an empty one returns `self`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for sequences.
    pub fn clear(&self) -> Result<Self, CollectionError> {
        match self.collection_type() {
            CollectionType::Seq => Err(self.unsupported("clear")),
            _ if self.is_empty() => Ok(self.clone()),
            collection_type => Ok(Self::empty(collection_type)),
        }
    }

    /// Shallow merge.
    ///
    /// Keyed targets take every entry of every source, later sources winning.
    /// Indexed targets append the sources' values. Sets take the union.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidSource`] when a source is a primitive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{map, Value};
    ///
    /// let merged = map! { "a" => 1, "b" => 2 }
    ///     .merge([Value::from(map! { "b" => 3, "c" => 4 })])
    ///     .unwrap();
    /// assert!(merged.equals(&map! { "a" => 1, "b" => 3, "c" => 4 }));
    /// ```
    pub fn merge<I, V>(&self, sources: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        merge_into(self, collect_sources(sources), &Merger::Replace)
    }

    /// Shallow merge resolving conflicts with `merger(old, new, key)`.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::merge`].
    pub fn merge_with<F, I, V>(&self, merger: F, sources: I) -> Result<Self, CollectionError>
    where
        F: Fn(&Value, &Value, &Value) -> Value,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        merge_into(self, collect_sources(sources), &Merger::With(&merger))
    }

    /// Deep merge: nested collections of compatible kinds are merged
    /// recursively, anything else is replaced.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::merge`].
    pub fn merge_deep<I, V>(&self, sources: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        merge_into(self, collect_sources(sources), &Merger::Deep(None))
    }

    /// Deep merge resolving non-mergeable conflicts with `merger(old, new, key)`.
    ///
    /// # Errors
    ///
    /// Same as [`Collection::merge`].
    pub fn merge_deep_with<F, I, V>(&self, merger: F, sources: I) -> Result<Self, CollectionError>
    where
        F: Fn(&Value, &Value, &Value) -> Value,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        merge_into(self, collect_sources(sources), &Merger::Deep(Some(&merger)))
    }

    /// Adds every value of every collection to a set.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for non-set targets, and
    /// [`CollectionError::InfiniteCollection`] when another collection is
    /// infinite.
    pub fn union<I>(&self, others: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = Self>,
    {
        others.into_iter().try_fold(self.clone(), |accumulator, other| {
            ensure_finite(other.size(), "union")?;
            other
                .values()
                .try_fold(accumulator, |accumulator, value| accumulator.add(value))
        })
    }

    /// Keeps the values present in every other collection.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for non-set targets, and
    /// [`CollectionError::InfiniteCollection`] for an infinite collection.
    pub fn intersect<I>(&self, others: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = Self>,
    {
        let others: Vec<Self> = others.into_iter().collect();
        for other in &others {
            ensure_finite(other.size(), "intersect")?;
        }
        self.retain_members("intersect", |value| others.iter().all(|other| other.includes(value)))
    }

    /// Drops the values present in any other collection.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for non-set targets, and
    /// [`CollectionError::InfiniteCollection`] for an infinite collection.
    pub fn subtract<I>(&self, others: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = Self>,
    {
        let others: Vec<Self> = others.into_iter().collect();
        for other in &others {
            ensure_finite(other.size(), "subtract")?;
        }
        self.retain_members("subtract", |value| !others.iter().any(|other| other.includes(value)))
    }

    fn retain_members<P>(&self, operation: &'static str, mut keep: P) -> Result<Self, CollectionError>
    where
        P: FnMut(&Value) -> bool,
    {
        if self.kind() != Kind::Set || self.is_lazy() {
            return Err(self.unsupported(operation));
        }
        self.values()
            .filter(|value| !keep(value))
            .try_fold(self.clone(), |accumulator, value| accumulator.remove_entry(&value))
    }
}

fn collect_sources<I, V>(sources: I) -> Vec<Value>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    sources.into_iter().map(Into::into).collect()
}
