//! The collection handle and the generic layer shared by every concrete type.
//!
//! A [`Collection`] is a cheap-to-clone handle to an immutable node. The node
//! holds either a realized structure (list, stack, map, ordered map, set,
//! ordered set) or a lazy sequence, together with two memo cells: the
//! structural hash and the materialized entries.
//!
//! All collections implement [`Traverse`], and through it the derived
//! operations of [`Query`], [`IndexedQuery`] and [`SetQuery`].
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{list, map, Query, Value};
//!
//! let numbers = list![1, 2, 3];
//! assert_eq!(numbers.get(-1), Some(Value::from(3)));
//! assert_eq!(numbers.reduce(0, |sum, value, _| sum + value.as_int().unwrap()).unwrap(), 6);
//!
//! let scores = map! { "alice" => 10, "bob" => 7 };
//! assert_eq!(scores.get("bob"), Some(Value::from(7)));
//! assert!(!scores.has("carol"));
//! ```

mod convert;
mod indexed;
mod keyed;
mod protocol;
mod query;
mod set;

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

pub use indexed::IndexedQuery;
pub use protocol::{Entries, IterMode, Kind, Size, Traverse};
pub use query::Query;
pub use set::SetQuery;

pub(crate) use protocol::{ensure_finite, length_of, position_of, renumber, scan};

use crate::error::CollectionError;
use crate::hash;
use crate::persistent::{IndexedTrie, KeyedTrie, OrderedEntries, ReferenceCounter, SetTrie};
use crate::value::Value;

/// The concrete type behind a [`Collection`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    /// Indexed, settable, grows at the back.
    List,
    /// Indexed, grows at the front.
    Stack,
    /// Keyed, unordered, settable.
    Map,
    /// Keyed, insertion ordered, settable.
    OrderedMap,
    /// Unordered set.
    Set,
    /// Insertion ordered set.
    OrderedSet,
    /// A lazy sequence.
    Seq,
}

impl CollectionType {
    /// The display name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Stack => "Stack",
            Self::Map => "Map",
            Self::OrderedMap => "OrderedMap",
            Self::Set => "Set",
            Self::OrderedSet => "OrderedSet",
            Self::Seq => "Seq",
        }
    }

    /// Whether values of this type support `set` and `remove` by key.
    pub const fn is_settable(self) -> bool {
        matches!(self, Self::List | Self::Map | Self::OrderedMap)
    }
}

pub(crate) enum Body {
    List(IndexedTrie),
    Stack(IndexedTrie),
    Map(KeyedTrie),
    OrderedMap(OrderedEntries),
    Set(SetTrie),
    OrderedSet(OrderedEntries),
    Seq(Box<dyn Traverse>),
}

struct Node {
    body: Body,
    hash: OnceCell<i32>,
    entries: OnceCell<ReferenceCounter<[(Value, Value)]>>,
    /// Set on a reversed view: the collection it reverses.
    reverse_of: Option<Collection>,
}

/// A persistent collection or lazy sequence.
///
/// Cloning is O(1) and shares the underlying node. Mutators return a new
/// handle, or the same handle when nothing changed.
#[derive(Clone)]
pub struct Collection {
    node: ReferenceCounter<Node>,
}

static_assertions::assert_not_impl_any!(Collection: Send, Sync);
static_assertions::assert_impl_all!(Value: Clone, Eq, Hash);

impl Collection {
    pub(crate) fn from_body(body: Body) -> Self {
        Self {
            node: ReferenceCounter::new(Node {
                body,
                hash: OnceCell::new(),
                entries: OnceCell::new(),
                reverse_of: None,
            }),
        }
    }

    /// Wraps a reversed view of `source`, remembering `source` so that
    /// reversing again returns it.
    pub(crate) fn from_reversal<T: Traverse + 'static>(sequence: T, source: Self) -> Self {
        Self {
            node: ReferenceCounter::new(Node {
                body: Body::Seq(Box::new(sequence)),
                hash: OnceCell::new(),
                entries: OnceCell::new(),
                reverse_of: Some(source),
            }),
        }
    }

    /// The collection this one is a reversed view of, if any.
    pub(crate) fn reverse_of(&self) -> Option<&Self> {
        self.node.reverse_of.as_ref()
    }

    /// Wraps any [`Traverse`] implementation as a lazy sequence.
    pub fn from_sequence<T: Traverse + 'static>(sequence: T) -> Self {
        Self::from_body(Body::Seq(Box::new(sequence)))
    }

    #[inline]
    pub(crate) fn body(&self) -> &Body {
        &self.node.body
    }

    /// The concrete type of this collection.
    pub fn collection_type(&self) -> CollectionType {
        match &self.node.body {
            Body::List(_) => CollectionType::List,
            Body::Stack(_) => CollectionType::Stack,
            Body::Map(_) => CollectionType::Map,
            Body::OrderedMap(_) => CollectionType::OrderedMap,
            Body::Set(_) => CollectionType::Set,
            Body::OrderedSet(_) => CollectionType::OrderedSet,
            Body::Seq(_) => CollectionType::Seq,
        }
    }

    /// Returns `true` for lazy sequences.
    #[inline]
    pub fn is_lazy(&self) -> bool {
        matches!(self.node.body, Body::Seq(_))
    }

    /// Returns `true` when both handles share the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ReferenceCounter::ptr_eq(&self.node, &other.node)
    }

    /// The entries of a realized collection, materialized once per instance.
    pub(crate) fn cached_entries(&self) -> ReferenceCounter<[(Value, Value)]> {
        ReferenceCounter::clone(self.node.entries.get_or_init(|| {
            let entries: Vec<(Value, Value)> = match &self.node.body {
                Body::List(vector) | Body::Stack(vector) => vector
                    .iter()
                    .enumerate()
                    .map(|(index, value)| (Value::from(index), value.clone()))
                    .collect(),
                Body::Map(trie) => trie
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
                Body::OrderedMap(entries) | Body::OrderedSet(entries) => {
                    entries.iter().cloned().collect()
                }
                Body::Set(trie) => trie.iter().map(|value| (value.clone(), value.clone())).collect(),
                Body::Seq(sequence) => sequence.iterate(false).collect(),
            };
            ReferenceCounter::from(entries)
        }))
    }

    /// The entries cache, if some traversal already populated it.
    pub(crate) fn populated_entries(&self) -> Option<ReferenceCounter<[(Value, Value)]>> {
        self.node.entries.get().cloned()
    }

    pub(crate) fn cached_hash(&self) -> Option<i32> {
        self.node.hash.get().copied()
    }

    /// The structural hash, computed on first use and memoized.
    ///
    /// Equal collections always have equal hashes.
    pub fn hash_code(&self) -> i32 {
        *self.node.hash.get_or_init(|| {
            tracing::trace!(
                collection = self.collection_type().name(),
                "computing structural hash"
            );
            hash::hash_collection(self)
        })
    }

    /// Deep, capability-aware value equality.
    ///
    /// Collections are equal when they have the same kind, the same
    /// orderedness, the same size and the same entries. Order matters only for
    /// ordered collections, and keys are ignored for sets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{map, ordered_map, set};
    ///
    /// assert!(map! { "a" => 1, "b" => 2 }.equals(&map! { "b" => 2, "a" => 1 }));
    /// assert!(!map! { "a" => 1 }.equals(&ordered_map! { "a" => 1 }));
    /// assert!(set![1, 2].equals(&set![2, 1]));
    /// ```
    pub fn equals(&self, other: &Self) -> bool {
        hash::deep_equal(self, other)
    }

    /// Reads the value stored under `key`.
    ///
    /// Indexed collections accept negative indices, counted from the end, and
    /// canonical numeric strings. Sets return the probe when it is a member.
    pub fn get<K: Into<Value>>(&self, key: K) -> Option<Value> {
        self.get_value(&key.into())
    }

    /// Reads the value stored under `key`, or `default` when absent.
    pub fn get_or<K: Into<Value>, D: Into<Value>>(&self, key: K, default: D) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Returns `true` when `key` is present.
    pub fn has<K: Into<Value>>(&self, key: K) -> bool {
        let key = key.into();
        match self.kind() {
            Kind::Indexed => self.resolve_index(&key).is_some_and(|index| match self.size() {
                Size::Known(_) => true,
                _ => self.lookup(&Value::from(index)).is_some(),
            }),
            Kind::Keyed | Kind::Set => self.lookup(&key).is_some(),
        }
    }

    pub(crate) fn get_value(&self, key: &Value) -> Option<Value> {
        match self.kind() {
            Kind::Indexed => self
                .resolve_index(key)
                .and_then(|index| self.lookup(&Value::from(index))),
            Kind::Keyed | Kind::Set => self.lookup(key),
        }
    }

    /// Resolves an index key, wrapping negative values and rejecting indices
    /// beyond a known size.
    pub(crate) fn resolve_index(&self, key: &Value) -> Option<usize> {
        let index = key.as_index()?;
        if index >= 0 {
            let index = usize::try_from(index).ok()?;
            return match self.size() {
                Size::Known(length) if index >= length => None,
                _ => Some(index),
            };
        }
        let length = match self.size() {
            Size::Known(length) => length,
            Size::Unknown => self.iterate(false).count(),
            Size::Infinite => return None,
        };
        let offset = usize::try_from(index.unsigned_abs()).ok()?;
        length.checked_sub(offset)
    }

    pub(crate) fn unsupported(&self, operation: &'static str) -> CollectionError {
        CollectionError::Unsupported {
            operation,
            collection: self.collection_type().name(),
        }
    }
}

fn vector_entries(vector: IndexedTrie, reverse: bool) -> Entries {
    let length = vector.len();
    let positions: Box<dyn Iterator<Item = usize>> = if reverse {
        Box::new((0..length).rev())
    } else {
        Box::new(0..length)
    };
    Box::new(positions.filter_map(move |index| {
        vector
            .get(index)
            .map(|value| (Value::from(index), value.clone()))
    }))
}

pub(crate) fn shared_entries(entries: ReferenceCounter<[(Value, Value)]>, reverse: bool) -> Entries {
    let length = entries.len();
    let positions: Box<dyn Iterator<Item = usize>> = if reverse {
        Box::new((0..length).rev())
    } else {
        Box::new(0..length)
    };
    Box::new(positions.map(move |index| entries[index].clone()))
}

// =============================================================================
// Traverse Implementation
// =============================================================================

impl Traverse for Collection {
    fn kind(&self) -> Kind {
        match self.body() {
            Body::List(_) | Body::Stack(_) => Kind::Indexed,
            Body::Map(_) | Body::OrderedMap(_) => Kind::Keyed,
            Body::Set(_) | Body::OrderedSet(_) => Kind::Set,
            Body::Seq(sequence) => sequence.kind(),
        }
    }

    fn is_ordered(&self) -> bool {
        match self.body() {
            Body::Map(_) | Body::Set(_) => false,
            Body::Seq(sequence) => sequence.is_ordered(),
            _ => true,
        }
    }

    fn size(&self) -> Size {
        match self.body() {
            Body::List(vector) | Body::Stack(vector) => Size::Known(vector.len()),
            Body::Map(trie) => Size::Known(trie.len()),
            Body::OrderedMap(entries) | Body::OrderedSet(entries) => Size::Known(entries.len()),
            Body::Set(trie) => Size::Known(trie.len()),
            Body::Seq(sequence) => sequence.size(),
        }
    }

    fn iterate(&self, reverse: bool) -> Entries {
        match self.body() {
            Body::List(vector) | Body::Stack(vector) => vector_entries(vector.clone(), reverse),
            Body::Seq(sequence) if reverse && sequence.size().is_infinite() => {
                Box::new(std::iter::empty())
            }
            Body::Seq(sequence) => sequence.iterate(reverse),
            _ => shared_entries(self.cached_entries(), reverse),
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        match self.body() {
            Body::List(vector) | Body::Stack(vector) => {
                position_of(key).and_then(|index| vector.get(index).cloned())
            }
            Body::Map(trie) => trie.get(key).cloned(),
            Body::OrderedMap(entries) => entries.get(key).cloned(),
            Body::Set(trie) => trie.contains(key).then(|| key.clone()),
            Body::OrderedSet(entries) => entries.contains(key).then(|| key.clone()),
            Body::Seq(sequence) => sequence.lookup(key),
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Collection {}

impl Hash for Collection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.collection_type().name();
        let kind = self.kind();
        let (open, close) = if kind.is_indexed() { ("[", "]") } else { ("{", "}") };
        if self.size().is_infinite() {
            return write!(formatter, "{name} {open} ... {close}");
        }
        write!(formatter, "{name} {open}")?;
        let mut is_first = true;
        for (key, value) in self.iterate(false) {
            write!(formatter, "{}", if is_first { " " } else { ", " })?;
            is_first = false;
            if kind.is_keyed() {
                write!(formatter, "{}: ", key.quote())?;
            }
            write!(formatter, "{}", value.quote())?;
        }
        if !is_first {
            write!(formatter, " ")?;
        }
        write!(formatter, "{close}")
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, formatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{list, map, ordered_map, ordered_set, set, stack};
    use rstest::rstest;

    #[rstest]
    #[case(list![], "List []")]
    #[case(list![1, 2], "List [ 1, 2 ]")]
    #[case(list!["a"], "List [ \"a\" ]")]
    #[case(map! { "a" => 1 }, "Map { \"a\": 1 }")]
    #[case(set![1], "Set { 1 }")]
    #[case(stack![3, 2], "Stack [ 3, 2 ]")]
    #[case(Collection::range(0, None, 1), "Seq [ ... ]")]
    fn test_display(#[case] collection: Collection, #[case] expected: &str) {
        assert_eq!(collection.to_string(), expected);
    }

    #[rstest]
    #[case(0, Some(Value::from("a")))]
    #[case(2, Some(Value::from("c")))]
    #[case(3, None)]
    #[case(-1, Some(Value::from("c")))]
    #[case(-3, Some(Value::from("a")))]
    #[case(-4, None)]
    fn test_indexed_get_wraps_negative_indices(#[case] index: i64, #[case] expected: Option<Value>) {
        let letters = list!["a", "b", "c"];
        assert_eq!(letters.get(index), expected);
    }

    #[rstest]
    fn test_indexed_get_accepts_numeric_strings() {
        let letters = list!["a", "b"];
        assert_eq!(letters.get("1"), Some(Value::from("b")));
        assert_eq!(letters.get("x"), None);
    }

    #[rstest]
    fn test_set_get_returns_member() {
        let numbers = set![1, 2];
        assert_eq!(numbers.get(2), Some(Value::from(2)));
        assert_eq!(numbers.get(3), None);
        assert!(numbers.has(1));
    }

    #[rstest]
    fn test_get_or_default() {
        let scores = map! { "a" => 1 };
        assert_eq!(scores.get_or("b", 0), Value::from(0));
        assert_eq!(scores.get_or("a", 0), Value::from(1));
    }

    #[rstest]
    fn test_kind_and_orderedness() {
        assert_eq!(list![1].kind(), Kind::Indexed);
        assert_eq!(map! { 1 => 2 }.kind(), Kind::Keyed);
        assert_eq!(set![1].kind(), Kind::Set);
        assert!(!map! { 1 => 2 }.is_ordered());
        assert!(ordered_map! { 1 => 2 }.is_ordered());
        assert!(ordered_set![1].is_ordered());
    }

    #[rstest]
    fn test_clone_shares_node() {
        let original = list![1, 2, 3];
        let copy = original.clone();
        assert!(original.ptr_eq(&copy));
        assert!(!original.ptr_eq(&list![1, 2, 3]));
    }

    #[rstest]
    fn test_hash_code_is_memoized() {
        let numbers = list![1, 2, 3];
        assert_eq!(numbers.cached_hash(), None);
        let hash = numbers.hash_code();
        assert_eq!(numbers.cached_hash(), Some(hash));
    }

    #[rstest]
    fn test_reverse_iteration_yields_true_positions() {
        let keys: Vec<_> = list!["a", "b", "c"]
            .iterate(true)
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, vec![Value::from(2), Value::from(1), Value::from(0)]);
    }
}
