//! The lazy operation engine.
//!
//! Every transformation builds a descriptor holding its source handle and its
//! closures; nothing is computed until the result is traversed, and every
//! traversal recomputes from the source. Descriptors compose, so
//! `range(0, None, 1).map(..).filter(..).take(3)` only ever pulls as many
//! source elements as the three results need.
//!
//! # Reification
//!
//! Called on a realized collection, an operation returns a realized collection
//! of the same concrete type: mapping a `List` yields a `List`, filtering a
//! `Map` yields a `Map`. Called on a `Seq`, it returns the lazy descriptor.
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{list, Collection, CollectionType, Query, Value};
//!
//! let evens = Collection::range(0, None, 1)
//!     .filter(|value, _| value.as_int().unwrap() % 2 == 0)
//!     .take(3);
//! assert_eq!(evens.join(",").unwrap(), "0,2,4");
//!
//! let doubled = list![1, 2, 3].map(|value, _| Value::from(value.as_int().unwrap() * 2));
//! assert_eq!(doubled.collection_type(), CollectionType::List);
//! ```

mod concat;
mod group;
mod slice;
mod sort;
mod source;
mod transform;
mod view;
mod zip;

use std::cmp::Ordering;

pub use sort::default_comparator;

pub(crate) use source::EntryArraySource;
pub(crate) use transform::{Flattened, Interposed};
pub(crate) use view::{EntryView, Flipped, FromEntries, KeyView, MappedEntries, MappedKeys, Retagged};

use crate::collection::{Collection, CollectionType, Size, Traverse};
use crate::persistent::ReferenceCounter;
use crate::value::Value;
use transform::{Bound, Filtered, Mapped, Reversed, WhileBounded};

pub(crate) type Mapper = ReferenceCounter<dyn Fn(&Value, &Value) -> Value>;
pub(crate) type Predicate = ReferenceCounter<dyn Fn(&Value, &Value) -> bool>;
pub(crate) type Comparator = ReferenceCounter<dyn Fn(&Value, &Value) -> Ordering>;
pub(crate) type Zipper = ReferenceCounter<dyn Fn(&[Value]) -> Value>;
pub(crate) type EntryMapper = ReferenceCounter<dyn Fn(&Value, &Value) -> (Value, Value)>;

impl Collection {
    /// Rebuilds `result` in this collection's concrete type.
    ///
    /// Sequences stay lazy, and so does a result whose capability differs
    /// from this collection's.
    pub(crate) fn reify(&self, result: Self) -> Self {
        match self.collection_type() {
            CollectionType::Seq => result,
            _ if result.kind() != self.kind() => result,
            target => result.build(target),
        }
    }

    /// Transforms every value with `mapper(value, key)`.
    pub fn map<F>(&self, mapper: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + 'static,
    {
        self.reify(self.map_lazy(ReferenceCounter::new(mapper)))
    }

    pub(crate) fn map_lazy(&self, mapper: Mapper) -> Self {
        Self::from_sequence(Mapped {
            source: self.clone(),
            mapper,
        })
    }

    /// Keeps the entries satisfying `predicate(value, key)`.
    ///
    /// Indexed results are renumbered; keyed and set results keep their keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, map, Query, Value};
    ///
    /// let odd = list![1, 2, 3].filter(|value, _| value.as_int().unwrap() % 2 == 1);
    /// assert_eq!(odd.get(1), Some(Value::from(3)));
    ///
    /// let small = map! { "a" => 1, "b" => 5 }.filter(|value, _| value.as_int().unwrap() < 3);
    /// assert!(small.has("a") && !small.has("b"));
    /// ```
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + 'static,
    {
        self.reify(Self::from_sequence(Filtered {
            source: self.clone(),
            predicate: ReferenceCounter::new(predicate),
            keep: true,
        }))
    }

    /// Drops the entries satisfying `predicate(value, key)`.
    pub fn filter_not<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + 'static,
    {
        self.reify(Self::from_sequence(Filtered {
            source: self.clone(),
            predicate: ReferenceCounter::new(predicate),
            keep: false,
        }))
    }

    /// Reverses the traversal order.
    pub fn reverse(&self) -> Self {
        self.reify(self.reverse_lazy())
    }

    pub(crate) fn reverse_lazy(&self) -> Self {
        if let Some(source) = self.reverse_of() {
            return source.clone();
        }
        Self::from_reversal(
            Reversed {
                source: self.clone(),
            },
            self.clone(),
        )
    }

    /// Keeps the leading entries satisfying `predicate`.
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + 'static,
    {
        self.while_bounded(ReferenceCounter::new(predicate), Bound::Take, false)
    }

    /// Keeps the leading entries until one satisfies `predicate`.
    pub fn take_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + 'static,
    {
        self.while_bounded(ReferenceCounter::new(predicate), Bound::Take, true)
    }

    /// Drops the leading entries satisfying `predicate`.
    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + 'static,
    {
        self.while_bounded(ReferenceCounter::new(predicate), Bound::Skip, false)
    }

    /// Drops the leading entries until one satisfies `predicate`.
    pub fn skip_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Value, &Value) -> bool + 'static,
    {
        self.while_bounded(ReferenceCounter::new(predicate), Bound::Skip, true)
    }

    fn while_bounded(&self, predicate: Predicate, bound: Bound, negate: bool) -> Self {
        self.reify(Self::from_sequence(WhileBounded {
            source: self.clone(),
            predicate,
            bound,
            negate,
        }))
    }

    /// Flattens nested collections, `depth` levels deep; `None` flattens
    /// every level and `Some(0)` flattens nothing.
    ///
    /// Keyed results keep the inner keys; indexed results are renumbered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query};
    ///
    /// let nested = list![1, list![2, list![3]]];
    /// assert_eq!(nested.flatten(None).join(",").unwrap(), "1,2,3");
    /// assert_eq!(nested.flatten(Some(1)).count().unwrap(), 3);
    /// ```
    pub fn flatten(&self, depth: Option<usize>) -> Self {
        if depth == Some(0) {
            return self.clone();
        }
        self.reify(Self::from_sequence(Flattened {
            source: self.clone(),
            depth,
            size: Size::Unknown,
        }))
    }

    /// Maps every value to a collection and flattens one level.
    pub fn flat_map<F>(&self, mapper: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + 'static,
    {
        let mapped = self.map_lazy(ReferenceCounter::new(mapper));
        self.reify(Self::from_sequence(Flattened {
            source: mapped,
            depth: Some(1),
            size: Size::Unknown,
        }))
    }
}
