//! Conversions between concrete collection types and lazy views.
//!
//! The `to_*` conversions into realized types traverse the source once and
//! fail on infinite sequences. The `*_seq` conversions are lazy views that
//! reflect the source on every traversal.

use super::{ensure_finite, Collection, CollectionType, Kind, Traverse};
use crate::error::CollectionError;
use crate::lazy::{EntryArraySource, EntryView, FromEntries, KeyView, Retagged};
use crate::value::Value;

impl Collection {
    /// Builds a realized collection of `target` type from this collection's
    /// entries, or a lazy view when `target` is `Seq`.
    ///
    /// Indexed and set targets take the values; keyed targets take the entries,
    /// a repeated key keeping its first position and taking the last value.
    pub(crate) fn build(&self, target: CollectionType) -> Self {
        if self.collection_type() == target {
            return self.clone();
        }
        let values = || self.iterate(false).map(|(_, value)| value);
        match target {
            CollectionType::List => Self::list_of(values()),
            CollectionType::Stack => Self::stack_of(values()),
            CollectionType::Map => Self::map_of(self.iterate(false)),
            CollectionType::OrderedMap => Self::ordered_map_of(self.iterate(false)),
            CollectionType::Set => Self::set_of(values()),
            CollectionType::OrderedSet => Self::ordered_set_of(values()),
            CollectionType::Seq => self.retagged(self.kind()),
        }
    }

    fn realized(&self, target: CollectionType, operation: &'static str) -> Result<Self, CollectionError> {
        ensure_finite(self.size(), operation)?;
        Ok(self.build(target))
    }

    fn retagged(&self, kind: Kind) -> Self {
        if self.is_lazy() && self.kind() == kind {
            return self.clone();
        }
        Self::from_sequence(Retagged {
            source: self.clone(),
            kind,
        })
    }

    /// Converts to a `List` of the values.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{map, CollectionType, Value};
    ///
    /// let values = map! { "a" => 1 }.to_list().unwrap();
    /// assert_eq!(values.collection_type(), CollectionType::List);
    /// assert_eq!(values.get(0), Some(Value::from(1)));
    /// ```
    pub fn to_list(&self) -> Result<Self, CollectionError> {
        self.realized(CollectionType::List, "to_list")
    }

    /// Converts to a `Stack` of the values, the first value on top.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn to_stack(&self) -> Result<Self, CollectionError> {
        self.realized(CollectionType::Stack, "to_stack")
    }

    /// Converts to a `Map` of the entries. Indexed sources are keyed by
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn to_map(&self) -> Result<Self, CollectionError> {
        self.realized(CollectionType::Map, "to_map")
    }

    /// Converts to an `OrderedMap` of the entries.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn to_ordered_map(&self) -> Result<Self, CollectionError> {
        self.realized(CollectionType::OrderedMap, "to_ordered_map")
    }

    /// Converts to a `Set` of the values.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn to_set(&self) -> Result<Self, CollectionError> {
        self.realized(CollectionType::Set, "to_set")
    }

    /// Converts to an `OrderedSet` of the values.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] for an infinite
    /// sequence.
    pub fn to_ordered_set(&self) -> Result<Self, CollectionError> {
        self.realized(CollectionType::OrderedSet, "to_ordered_set")
    }

    /// A lazy view with the same capability.
    pub fn to_seq(&self) -> Self {
        self.retagged(self.kind())
    }

    /// A lazy keyed view; indexed sources are keyed by position.
    pub fn to_keyed_seq(&self) -> Self {
        self.retagged(Kind::Keyed)
    }

    /// A lazy indexed view of the values.
    pub fn to_indexed_seq(&self) -> Self {
        self.retagged(Kind::Indexed)
    }

    /// A lazy set view of the values.
    pub fn to_set_seq(&self) -> Self {
        self.retagged(Kind::Set)
    }

    /// A lazy indexed view of the keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{ordered_map, Query};
    ///
    /// let keys = ordered_map! { "x" => 1, "y" => 2 }.key_seq();
    /// assert_eq!(keys.join(",").unwrap(), "x,y");
    /// ```
    pub fn key_seq(&self) -> Self {
        Self::from_sequence(KeyView { source: self.clone() })
    }

    /// A lazy indexed view of the values.
    pub fn value_seq(&self) -> Self {
        self.to_indexed_seq()
    }

    /// A lazy indexed view of `[key, value]` native arrays.
    pub fn entry_seq(&self) -> Self {
        match self.populated_entries() {
            Some(entries) if !self.is_lazy() => Self::from_sequence(EntryArraySource { entries }),
            _ => Self::from_sequence(EntryView { source: self.clone() }),
        }
    }

    /// Reads this collection's values as `[key, value]` pairs into a lazy
    /// keyed sequence. Values that are not pairs are skipped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{ordered_map, Query};
    ///
    /// let original = ordered_map! { "a" => 1, "b" => 2 };
    /// let restored = original.entry_seq().from_entry_seq();
    /// assert!(restored.to_ordered_map().unwrap().equals(&original));
    /// ```
    #[allow(clippy::wrong_self_convention)]
    pub fn from_entry_seq(&self) -> Self {
        Self::from_sequence(FromEntries { source: self.clone() })
    }
}

impl From<Collection> for Vec<Value> {
    fn from(collection: Collection) -> Self {
        collection.iterate(false).map(|(_, value)| value).collect()
    }
}
