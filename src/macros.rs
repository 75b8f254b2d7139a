//! Literal constructors for collections.
//!
//! Every element goes through [`Value::from`](crate::Value), so literals of
//! mixed types can share one collection.
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{list, map, set, Value};
//!
//! let user = map! {
//!     "name" => "ada",
//!     "tags" => set!["admin", "ops"],
//!     "scores" => list![1, 2.5, "n/a"],
//! };
//! assert_eq!(user.get("name"), Some(Value::from("ada")));
//! ```

/// Creates a `List`.
///
/// - `list![]` - the empty list
/// - `list![a, b, c]` - a list of the values in order
#[macro_export]
macro_rules! list {
    () => {
        $crate::Collection::list_of(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::list_of([$($crate::Value::from($value)),+])
    };
}

/// Creates a `Stack`; the first value is the top.
#[macro_export]
macro_rules! stack {
    () => {
        $crate::Collection::stack_of(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::stack_of([$($crate::Value::from($value)),+])
    };
}

/// Creates a `Map` from `key => value` pairs. A repeated key takes the last
/// value.
#[macro_export]
macro_rules! map {
    () => {
        $crate::Collection::map_of(::std::vec::Vec::<($crate::Value, $crate::Value)>::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Collection::map_of([$(($crate::Value::from($key), $crate::Value::from($value))),+])
    };
}

/// Creates an `OrderedMap` from `key => value` pairs in insertion order.
#[macro_export]
macro_rules! ordered_map {
    () => {
        $crate::Collection::ordered_map_of(::std::vec::Vec::<($crate::Value, $crate::Value)>::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Collection::ordered_map_of([$(($crate::Value::from($key), $crate::Value::from($value))),+])
    };
}

/// Creates a `Set`.
#[macro_export]
macro_rules! set {
    () => {
        $crate::Collection::set_of(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::set_of([$($crate::Value::from($value)),+])
    };
}

/// Creates an `OrderedSet` in insertion order.
#[macro_export]
macro_rules! ordered_set {
    () => {
        $crate::Collection::ordered_set_of(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::ordered_set_of([$($crate::Value::from($value)),+])
    };
}

/// Creates a lazy indexed sequence over the values.
///
/// ```rust
/// use lambars_collections::{seq, Query, Value};
///
/// let doubled = seq![1, 2, 3].map(|value, _| Value::from(value.as_int().unwrap_or(0) * 2));
/// assert_eq!(doubled.join(",").unwrap(), "2,4,6");
/// ```
#[macro_export]
macro_rules! seq {
    () => {
        $crate::Collection::seq_of(::std::vec::Vec::<$crate::Value>::new())
    };
    ($($value:expr),+ $(,)?) => {
        $crate::Collection::seq_of([$($crate::Value::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use crate::collection::{CollectionType, Query};
    use crate::Value;

    #[test]
    fn test_empty_literals() {
        assert_eq!(list![].collection_type(), CollectionType::List);
        assert_eq!(stack![].collection_type(), CollectionType::Stack);
        assert_eq!(map! {}.collection_type(), CollectionType::Map);
        assert_eq!(ordered_map! {}.collection_type(), CollectionType::OrderedMap);
        assert_eq!(set![].collection_type(), CollectionType::Set);
        assert_eq!(ordered_set![].collection_type(), CollectionType::OrderedSet);
        assert_eq!(seq![].collection_type(), CollectionType::Seq);
    }

    #[test]
    fn test_mixed_literals() {
        let mixed = list![1, "two", 3.5, list![4]];
        assert_eq!(mixed.count().unwrap(), 4);
        assert_eq!(mixed.get(1), Some(Value::from("two")));
    }

    #[test]
    fn test_trailing_commas() {
        let pairs = ordered_map! { "a" => 1, "b" => 2, };
        assert_eq!(pairs.count().unwrap(), 2);
        assert_eq!(set![1, 1, 2,].count().unwrap(), 2);
    }
}
