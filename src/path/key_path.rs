//! Key paths and their coercion.

use std::fmt;

use smallvec::SmallVec;

use crate::collection::{Collection, Traverse};
use crate::error::CollectionError;
use crate::value::Value;

/// The default delimiter of dotted paths.
pub const DEFAULT_DELIMITER: &str = ".";

/// An ordered sequence of keys locating a value inside nested collections.
///
/// Paths of up to four keys are stored inline.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{KeyPath, Value};
///
/// let path = KeyPath::parse("users.0.name");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.keys()[1], Value::from("0"));
///
/// let built = KeyPath::new().child("users").child(0).child("name");
/// assert_eq!(built.to_string(), r#"["users",0,"name"]"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(SmallVec<[Value; 4]>);

impl KeyPath {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Splits `text` on `.`; every segment becomes a string key.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, DEFAULT_DELIMITER)
    }

    /// Splits `text` on `delimiter`. An empty `text` is the empty path.
    #[must_use]
    pub fn parse_with(text: &str, delimiter: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        if delimiter.is_empty() {
            return std::iter::once(Value::from(text)).collect();
        }
        text.split(delimiter).map(Value::from).collect()
    }

    /// This path with `key` appended.
    #[must_use]
    pub fn child<K: Into<Value>>(mut self, key: K) -> Self {
        self.0.push(key.into());
        self
    }

    /// This path followed by the keys of `suffix`.
    #[must_use]
    pub fn join(mut self, suffix: &Self) -> Self {
        self.0.extend(suffix.0.iter().cloned());
        self
    }

    /// The keys in order.
    #[must_use]
    pub fn keys(&self) -> &[Value] {
        &self.0
    }

    /// The number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `length` keys rendered for error messages: strings quoted,
    /// everything else as displayed, comma-joined.
    pub(crate) fn describe_prefix(&self, length: usize) -> String {
        self.0
            .iter()
            .take(length)
            .map(Value::quote)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[{}]", self.describe_prefix(self.len()))
    }
}

impl<V: Into<Value>> FromIterator<V> for KeyPath {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> Extend<V> for KeyPath {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Conversion into a [`KeyPath`].
///
/// Native arrays and ordered collections are accepted as paths; any other
/// value is rejected with [`CollectionError::InvalidKeyPath`]. Strings are not
/// paths: use [`KeyPath::parse`] or the `*_at` methods for dotted paths.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{list, set, IntoKeyPath, Value};
///
/// assert_eq!(["a", "b"].into_key_path().unwrap().len(), 2);
/// assert!(Value::from(list!["a", 0]).into_key_path().is_ok());
/// assert!(Value::from("a.b").into_key_path().is_err());
/// assert!(Value::from(set!["a"]).into_key_path().is_err());
/// ```
pub trait IntoKeyPath {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidKeyPath`] when the value is not an
    /// ordered sequence of keys.
    fn into_key_path(self) -> Result<KeyPath, CollectionError>;
}

impl IntoKeyPath for KeyPath {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        Ok(self)
    }
}

impl IntoKeyPath for &KeyPath {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        Ok(self.clone())
    }
}

impl<V: Into<Value>> IntoKeyPath for Vec<V> {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        Ok(self.into_iter().collect())
    }
}

impl<V: Into<Value>, const N: usize> IntoKeyPath for [V; N] {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        Ok(self.into_iter().collect())
    }
}

impl<V: Into<Value> + Clone> IntoKeyPath for &[V] {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        Ok(self.iter().cloned().collect())
    }
}

impl IntoKeyPath for Collection {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        if !self.is_ordered() || self.size().is_infinite() {
            return Err(invalid_key_path(&Value::Collection(self)));
        }
        Ok(self.iterate(false).map(|(_, key)| key).collect())
    }
}

impl IntoKeyPath for &Collection {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        self.clone().into_key_path()
    }
}

impl IntoKeyPath for Value {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        match self {
            Self::Array(keys) => Ok(keys.iter().cloned().collect()),
            Self::Collection(collection) => collection.into_key_path(),
            other => Err(invalid_key_path(&other)),
        }
    }
}

impl IntoKeyPath for &Value {
    fn into_key_path(self) -> Result<KeyPath, CollectionError> {
        self.clone().into_key_path()
    }
}

fn invalid_key_path(value: &Value) -> CollectionError {
    tracing::debug!(path = %value, "rejecting key path");
    CollectionError::InvalidKeyPath {
        path: value.to_string(),
    }
}
