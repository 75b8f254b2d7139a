//! Error types for collection operations.
//!
//! Lookups report absence with `Option::None`; errors are reserved for
//! misuse: malformed key paths, writes through values that cannot be written,
//! whole-collection operations on infinite sequences, and mutators a concrete
//! collection type does not support.

/// Represents errors raised by collection and deep path operations.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::CollectionError;
///
/// let error = CollectionError::InvalidKeyPath {
///     path: "undefined".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid keyPath: expected Ordered Iterable or Array: undefined"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The key path is neither a native array nor an indexed collection.
    InvalidKeyPath {
        /// Rendering of the rejected key path.
        path: String,
    },
    /// A non-collection value was reached while reading along a key path.
    NotReadable {
        /// The quoted keys leading to the value, comma separated.
        prefix: String,
        /// Rendering of the value that cannot be read.
        value: String,
    },
    /// A value along a key path has to be written but cannot be.
    NotSettable {
        /// The quoted keys leading to the value, comma separated.
        prefix: String,
        /// Rendering of the value that cannot be updated.
        value: String,
    },
    /// The operation needs a finite number of elements.
    InfiniteCollection {
        /// The operation that was refused.
        operation: &'static str,
    },
    /// A merge targeted a value that is not a collection.
    NotMergeable {
        /// Rendering of the merge target.
        value: String,
    },
    /// A merge source could not be read as entries.
    InvalidSource {
        /// Rendering of the rejected source.
        value: String,
    },
    /// The concrete collection type has no such mutator.
    Unsupported {
        /// The mutator that was called.
        operation: &'static str,
        /// The concrete collection type it was called on.
        collection: &'static str,
    },
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKeyPath { path } => {
                write!(formatter, "Invalid keyPath: expected Ordered Iterable or Array: {path}")
            }
            Self::NotReadable { prefix, value } => write!(
                formatter,
                "Invalid keyPath: Value at [{prefix}] does not have a .get() method: {value}"
            ),
            Self::NotSettable { prefix, value } => write!(
                formatter,
                "Invalid keyPath: Value at [{prefix}] does not have a .set() method and cannot be updated: {value}"
            ),
            Self::InfiniteCollection { operation } => {
                write!(formatter, "Cannot perform `{operation}` with an infinite size.")
            }
            Self::NotMergeable { value } => {
                write!(formatter, "Cannot merge into non-data-structure value: {value}")
            }
            Self::InvalidSource { value } => write!(
                formatter,
                "Expected Array or collection object of [k, v] entries, or keyed object: {value}"
            ),
            Self::Unsupported {
                operation,
                collection,
            } => write!(formatter, "{collection} does not support `{operation}`"),
        }
    }
}

impl std::error::Error for CollectionError {}
