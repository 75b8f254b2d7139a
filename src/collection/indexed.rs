//! Positional operations.

use super::protocol::{length_of, Kind, Size, Traverse};
use super::query::Query;
use super::Collection;
use crate::error::CollectionError;
use crate::lazy::Interposed;
use crate::value::Value;

/// Searches by position.
///
/// Positions count entries in traversal order; for indexed collections they
/// are the indices.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{list, IndexedQuery, Value};
///
/// let letters = list!["a", "b", "a"];
/// assert_eq!(letters.index_of(&Value::from("a")), Some(0));
/// assert_eq!(letters.last_index_of(&Value::from("a")), Some(2));
/// assert_eq!(letters.index_of(&Value::from("z")), None);
/// ```
pub trait IndexedQuery: Query {
    /// The position of the first value equal to `search`.
    fn index_of(&self, search: &Value) -> Option<usize> {
        self.find_index(|value, _| value == search)
    }

    /// The position of the last value equal to `search`.
    fn last_index_of(&self, search: &Value) -> Option<usize> {
        self.find_last_index(|value, _| value == search)
    }

    /// The position of the first entry satisfying `predicate(value, key)`.
    fn find_index<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        self.iterate(false)
            .position(|(key, value)| predicate(&value, &key))
    }

    /// The position of the last entry satisfying `predicate(value, key)`.
    ///
    /// Infinite sequences have no last entry, so this is `None` for them.
    fn find_last_index<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&Value, &Value) -> bool,
    {
        if self.size().is_infinite() {
            return None;
        }
        if self.kind() == Kind::Indexed {
            return self
                .iterate(true)
                .find(|(key, value)| predicate(value, key))
                .and_then(|(key, _)| key.as_index())
                .and_then(|index| usize::try_from(index).ok());
        }
        let offset = self
            .iterate(true)
            .position(|(key, value)| predicate(&value, &key))?;
        length_of(self).checked_sub(offset + 1)
    }
}

impl<T: Query + ?Sized> IndexedQuery for T {}

impl Collection {
    /// Removes `remove_count` values at `index` and inserts `values` in their
    /// place. A negative `index` counts from the end.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unsupported`] for keyed and set collections.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query};
    ///
    /// let letters = list!["a", "b", "c", "d"];
    /// let spliced = letters.splice(1, 2, ["x"]).unwrap();
    /// assert_eq!(spliced.join("").unwrap(), "axd");
    /// assert_eq!(letters.splice(-1, 1, Vec::<&str>::new()).unwrap().join("").unwrap(), "abc");
    /// ```
    pub fn splice<I, V>(&self, index: i64, remove_count: usize, values: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.kind() != Kind::Indexed {
            return Err(self.unsupported("splice"));
        }
        let inserted = Self::seq_of(values);
        if remove_count == 0 && inserted.size() == Size::Known(0) {
            return Ok(self.clone());
        }
        let start = self.splice_start(index);
        let resume = start.saturating_add(i64::try_from(remove_count).unwrap_or(i64::MAX));
        let source = self.to_seq();
        let spliced = source
            .slice(0, Some(start))
            .concat([inserted, source.slice(resume, None)]);
        Ok(self.reify(spliced))
    }

    fn splice_start(&self, index: i64) -> i64 {
        if index >= 0 {
            return index;
        }
        match self.size() {
            Size::Infinite => 0,
            _ => {
                let length = i64::try_from(length_of(self)).unwrap_or(i64::MAX);
                length.saturating_add(index).max(0)
            }
        }
    }

    /// Places `separator` between consecutive values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query};
    ///
    /// assert_eq!(list![1, 2, 3].interpose(0).join(",").unwrap(), "1,0,2,0,3");
    /// ```
    pub fn interpose<V: Into<Value>>(&self, separator: V) -> Self {
        self.reify(Self::from_sequence(Interposed {
            source: self.clone(),
            separator: separator.into(),
        }))
    }
}
