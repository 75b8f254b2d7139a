//! The capability protocol every collection and lazy sequence implements.
//!
//! A collection supplies exactly one primitive, [`Traverse::iterate`], plus a
//! handful of queries describing it (its [`Kind`], orderedness and [`Size`]).
//! Everything else in the library is derived from these.

use crate::error::CollectionError;
use crate::value::Value;

/// A pull iterator over `(key, value)` entries.
///
/// Entries own their state so lazy descriptors can compose them without
/// borrowing from each other.
pub type Entries = Box<dyn Iterator<Item = (Value, Value)>>;

/// The capability tag of a collection, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Arbitrary keys.
    Keyed,
    /// Keys are the dense positions `0..n`.
    Indexed,
    /// Every key equals its value.
    Set,
}

impl Kind {
    /// Returns `true` for [`Kind::Keyed`].
    #[inline]
    pub const fn is_keyed(self) -> bool {
        matches!(self, Self::Keyed)
    }

    /// Returns `true` for [`Kind::Indexed`].
    #[inline]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed)
    }

    /// Returns `true` for [`Kind::Set`].
    #[inline]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set)
    }

    /// Returns `true` when keys carry information of their own (keyed or indexed).
    #[inline]
    pub const fn is_associative(self) -> bool {
        !self.is_set()
    }
}

/// How many entries a collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    /// Exactly this many entries.
    Known(usize),
    /// Finite, but only a traversal can tell.
    Unknown,
    /// Traversal never ends.
    Infinite,
}

impl Size {
    /// Returns the count when it is known.
    #[inline]
    pub const fn known(self) -> Option<usize> {
        match self {
            Self::Known(count) => Some(count),
            _ => None,
        }
    }

    /// Returns `true` for [`Size::Infinite`].
    #[inline]
    pub const fn is_infinite(self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// Which half of each entry an iteration yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterMode {
    /// Keys only.
    Keys,
    /// Values only.
    Values,
    /// `[key, value]` native arrays.
    Entries,
}

/// The capability protocol.
///
/// Implementors describe themselves and produce a fresh pull iterator on each
/// call to [`iterate`](Self::iterate). A reverse traversal of an indexed
/// collection yields the true positions, `n - 1` down to `0`.
///
/// Implementing this trait is enough to get every derived query (see
/// [`Query`](crate::Query)) and, through
/// [`Collection::from_sequence`](crate::Collection::from_sequence), every lazy
/// operation.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{Collection, Entries, Kind, Query, Size, Traverse, Value};
///
/// struct Squares(usize);
///
/// impl Traverse for Squares {
///     fn kind(&self) -> Kind {
///         Kind::Indexed
///     }
///
///     fn size(&self) -> Size {
///         Size::Known(self.0)
///     }
///
///     fn iterate(&self, reverse: bool) -> Entries {
///         let count = self.0;
///         let positions: Box<dyn Iterator<Item = usize>> = if reverse {
///             Box::new((0..count).rev())
///         } else {
///             Box::new(0..count)
///         };
///         Box::new(positions.map(|index| (Value::from(index), Value::from(index * index))))
///     }
/// }
///
/// let squares = Collection::from_sequence(Squares(4));
/// assert_eq!(squares.join(",").unwrap(), "0,1,4,9");
/// ```
pub trait Traverse {
    /// The capability tag.
    fn kind(&self) -> Kind;

    /// Whether iteration order is meaningful. Indexed collections always are.
    fn is_ordered(&self) -> bool {
        self.kind().is_indexed()
    }

    /// The number of entries, when it can be told without traversal.
    fn size(&self) -> Size;

    /// Starts a traversal.
    fn iterate(&self, reverse: bool) -> Entries;

    /// Finds the value stored under `key`.
    ///
    /// The default implementation scans; sources with direct access override it.
    fn lookup(&self, key: &Value) -> Option<Value> {
        scan(self, key)
    }
}

/// Linear lookup over a traversal.
pub(crate) fn scan<T: Traverse + ?Sized>(sequence: &T, key: &Value) -> Option<Value> {
    sequence
        .iterate(false)
        .find(|(entry_key, _)| entry_key == key)
        .map(|(_, value)| value)
}

/// Refuses operations that need every element of an infinite sequence.
pub(crate) fn ensure_finite(size: Size, operation: &'static str) -> Result<(), CollectionError> {
    if size.is_infinite() {
        tracing::debug!(operation, "refusing to traverse an infinite collection");
        Err(CollectionError::InfiniteCollection { operation })
    } else {
        Ok(())
    }
}

/// Pairs values with dense positions.
///
/// In reverse the positions count down from `length() - 1`; `length` is only
/// called when `reverse` is set and there is at least one value, so an
/// infinite source (whose reverse is empty) is never counted.
pub(crate) fn renumber<L>(values: Box<dyn Iterator<Item = Value>>, reverse: bool, length: L) -> Entries
where
    L: FnOnce() -> usize,
{
    if reverse {
        let mut values = values.peekable();
        if values.peek().is_none() {
            return Box::new(std::iter::empty());
        }
        let length = length();
        Box::new(
            values
                .enumerate()
                .map(move |(offset, value)| (Value::from(length.saturating_sub(offset + 1)), value)),
        )
    } else {
        Box::new(
            values
                .enumerate()
                .map(|(index, value)| (Value::from(index), value)),
        )
    }
}

/// Counts entries, traversing only when the size is unknown.
///
/// An infinite sequence reports `usize::MAX` without traversal.
pub(crate) fn length_of<T: Traverse + ?Sized>(sequence: &T) -> usize {
    match sequence.size() {
        Size::Known(count) => count,
        Size::Infinite => usize::MAX,
        Size::Unknown => sequence.iterate(false).count(),
    }
}

/// Converts a key produced by an indexed traversal back into a position.
pub(crate) fn position_of(key: &Value) -> Option<usize> {
    key.as_index().and_then(|index| usize::try_from(index).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_renumber_forward() {
        let values: Box<dyn Iterator<Item = Value>> =
            Box::new(vec![Value::from("a"), Value::from("b")].into_iter());
        let entries: Vec<_> = renumber(values, false, || unreachable!()).collect();
        assert_eq!(entries[0], (Value::from(0), Value::from("a")));
        assert_eq!(entries[1], (Value::from(1), Value::from("b")));
    }

    #[rstest]
    fn test_renumber_reverse_counts_down() {
        let values: Box<dyn Iterator<Item = Value>> =
            Box::new(vec![Value::from("c"), Value::from("b"), Value::from("a")].into_iter());
        let keys: Vec<_> = renumber(values, true, || 3).map(|(key, _)| key).collect();
        assert_eq!(keys, vec![Value::from(2), Value::from(1), Value::from(0)]);
    }

    #[rstest]
    fn test_renumber_reverse_of_nothing_does_not_count() {
        let values: Box<dyn Iterator<Item = Value>> = Box::new(std::iter::empty());
        assert_eq!(renumber(values, true, || unreachable!()).count(), 0);
    }

    #[rstest]
    fn test_ensure_finite() {
        assert!(ensure_finite(Size::Known(3), "count").is_ok());
        assert!(ensure_finite(Size::Unknown, "count").is_ok());
        assert_eq!(
            ensure_finite(Size::Infinite, "count"),
            Err(CollectionError::InfiniteCollection { operation: "count" })
        );
    }

    #[rstest]
    #[case(Kind::Keyed, true, false)]
    #[case(Kind::Indexed, true, true)]
    #[case(Kind::Set, false, false)]
    fn test_kind_queries(#[case] kind: Kind, #[case] associative: bool, #[case] indexed: bool) {
        assert_eq!(kind.is_associative(), associative);
        assert_eq!(kind.is_indexed(), indexed);
    }
}
