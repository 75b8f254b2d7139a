//! Keyed re-mappings: `flip`, `map_keys` and `map_entries`.
//!
//! On a `Map` or `OrderedMap` the result is rebuilt in the same type, so a
//! repeated output key keeps the last value. On sequences the result stays a
//! lazy keyed sequence.

use super::Collection;
use crate::lazy::{Flipped, MappedEntries, MappedKeys};
use crate::persistent::ReferenceCounter;
use crate::value::Value;

impl Collection {
    /// Swaps keys and values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{map, Value};
    ///
    /// let codes = map! { "a" => 1, "b" => 2 }.flip();
    /// assert_eq!(codes.get(2), Some(Value::from("b")));
    /// ```
    pub fn flip(&self) -> Self {
        self.reify(Self::from_sequence(Flipped { source: self.clone() }))
    }

    /// Replaces every key with `mapper(key, value)`.
    pub fn map_keys<F>(&self, mapper: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + 'static,
    {
        self.reify(Self::from_sequence(MappedKeys {
            source: self.clone(),
            mapper: ReferenceCounter::new(mapper),
        }))
    }

    /// Replaces every entry with `mapper(key, value)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{ordered_map, Value};
    ///
    /// let shouted = ordered_map! { "a" => 1 }.map_entries(|key, value| {
    ///     (Value::from(key.to_string().to_uppercase()), Value::from(value.as_int().unwrap() * 10))
    /// });
    /// assert_eq!(shouted.get("A"), Some(Value::from(10)));
    /// ```
    pub fn map_entries<F>(&self, mapper: F) -> Self
    where
        F: Fn(&Value, &Value) -> (Value, Value) + 'static,
    {
        self.reify(Self::from_sequence(MappedEntries {
            source: self.clone(),
            mapper: ReferenceCounter::new(mapper),
        }))
    }
}
