//! Set relations.

use super::query::Query;
use crate::value::Value;

/// Containment between collections, by value.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{list, set, SetQuery};
///
/// assert!(set![1, 2].is_subset(&list![3, 2, 1]));
/// assert!(list![1, 2, 2].is_superset(&set![2]));
/// assert!(!set![1, 4].is_subset(&set![1, 2]));
/// ```
pub trait SetQuery: Query {
    /// Returns `true` when every value of this collection is in `other`.
    fn is_subset<T: Query + ?Sized>(&self, other: &T) -> bool {
        self.every(|value, _| other.includes(value))
    }

    /// Returns `true` when every value of `other` is in this collection.
    fn is_superset<T: Query + ?Sized>(&self, other: &T) -> bool {
        other.every(|value: &Value, _| self.includes(value))
    }
}

impl<T: Query + ?Sized> SetQuery for T {}
