//! Dynamic values stored in, and produced by, collections.
//!
//! Deep key paths walk through heterogeneous nesting (a map holding a list
//! holding a map), so every element is a [`Value`]: a small closed enum over
//! primitives, the native output forms of [`to_array`](crate::Query::to_array)
//! and [`to_js`](crate::Query::to_js), and library [`Collection`]s.
//!
//! # Equality
//!
//! `Value` equality is the library's value-equality rule:
//!
//! - `Int` and integral `Float` values compare equal (`1 == 1.0`)
//! - `NaN` equals `NaN`, and `0.0` equals `-0.0`
//! - collections compare deeply (see [`Collection::equals`])
//!
//! [`Value::is_identical`] is the stricter identity rule used by the deep path
//! engine to detect "nothing changed": collections, arrays and objects are
//! identical only when they are the same allocation.
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{list, Value};
//!
//! assert_eq!(Value::from(1), Value::from(1.0));
//! assert_eq!(Value::from(list![1, 2]), Value::from(list![1, 2]));
//! assert!(!Value::from(list![1, 2]).is_identical(&Value::from(list![1, 2])));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::collection::{Collection, Query};
use crate::error::CollectionError;
use crate::hash::hash_value;
use crate::persistent::ReferenceCounter;

/// A dynamically typed element.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value. Also the result of removing a whole root.
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// An immutable string.
    Str(ReferenceCounter<str>),
    /// A native array, as produced by `to_array` and `to_js`.
    Array(ReferenceCounter<[Value]>),
    /// A native object, as produced by `to_js`. Property order is insertion order.
    Object(ReferenceCounter<[(String, Value)]>),
    /// A library collection.
    Collection(Collection),
}

impl Value {
    /// Creates a native array value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::Value;
    ///
    /// let array = Value::array([1, 2, 3]);
    /// assert_eq!(array.to_string(), "1,2,3");
    /// ```
    pub fn array<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::Array(values.into_iter().map(Into::into).collect())
    }

    /// Creates a native object value.
    ///
    /// A repeated property keeps its first position and takes the last value.
    pub fn object<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        let mut object = Vec::new();
        for (name, value) in properties {
            insert_property(&mut object, name.into(), value.into());
        }
        Self::Object(ReferenceCounter::from(object))
    }

    /// Returns `true` for [`Value::Undefined`].
    #[inline]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int` or an integral `Float`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(integer) => Some(*integer),
            Self::Float(number) => float_as_integer(*number),
            _ => None,
        }
    }

    /// Returns the number as `f64`, if this is numeric.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(integer) => Some(*integer as f64),
            Self::Float(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the elements, if this is a native array.
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the properties, if this is a native object.
    pub fn as_object(&self) -> Option<&[(String, Self)]> {
        match self {
            Self::Object(properties) => Some(properties),
            _ => None,
        }
    }

    /// Returns the collection, if this is one.
    pub const fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Consumes the value and returns the collection, if this is one.
    pub fn into_collection(self) -> Option<Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Strict identity.
    ///
    /// Primitives and strings are identical when equal. Arrays, objects and
    /// collections are identical only when they share the same allocation,
    /// which is what an unchanged persistent update returns.
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Array(left), Self::Array(right)) => ReferenceCounter::ptr_eq(left, right),
            (Self::Object(left), Self::Object(right)) => ReferenceCounter::ptr_eq(left, right),
            (Self::Collection(left), Self::Collection(right)) => left.ptr_eq(right),
            (Self::Float(left), Self::Float(right)) => left.to_bits() == right.to_bits(),
            (
                Self::Array(_) | Self::Object(_) | Self::Collection(_),
                _,
            )
            | (_, Self::Array(_) | Self::Object(_) | Self::Collection(_)) => false,
            _ => self == other,
        }
    }

    /// The structural hash of this value.
    ///
    /// Equal values always hash equal.
    #[inline]
    pub fn hash_code(&self) -> i32 {
        hash_value(self)
    }

    /// Deeply converts library collections to native arrays and objects.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InfiniteCollection`] if an infinite
    /// collection is reached.
    pub fn to_js(&self) -> Result<Self, CollectionError> {
        match self {
            Self::Collection(collection) => collection.to_js(),
            Self::Array(values) => values
                .iter()
                .map(Self::to_js)
                .collect::<Result<Vec<_>, _>>()
                .map(|values| Self::Array(ReferenceCounter::from(values))),
            Self::Object(properties) => properties
                .iter()
                .map(|(name, value)| value.to_js().map(|value| (name.clone(), value)))
                .collect::<Result<Vec<_>, _>>()
                .map(|properties| Self::Object(ReferenceCounter::from(properties))),
            primitive => Ok(primitive.clone()),
        }
    }

    /// Renders the value the way it appears inside a collection or key path:
    /// strings are JSON-quoted, everything else uses [`Display`](fmt::Display).
    pub fn quote(&self) -> String {
        match self {
            Self::Str(text) => quote_string(text),
            other => other.to_string(),
        }
    }

    /// Interprets the value as a list index.
    ///
    /// Integers (including integral floats) are taken as-is, negative ones
    /// included; strings are accepted only in canonical unsigned form, so
    /// `"3"` is an index and `"03"` is not.
    pub(crate) fn as_index(&self) -> Option<i64> {
        match self {
            Self::Int(_) | Self::Float(_) => self.as_int(),
            Self::Str(text) => canonical_index(text),
            _ => None,
        }
    }
}

/// Converts an integral, in-range float to the integer it denotes.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn float_as_integer(number: f64) -> Option<i64> {
    let in_range = number >= i64::MIN as f64 && number < i64::MAX as f64;
    (number.fract() == 0.0 && in_range).then(|| number as i64)
}

fn canonical_index(text: &str) -> Option<i64> {
    let parsed: u32 = text.parse().ok()?;
    (parsed != u32::MAX && parsed.to_string() == text).then(|| i64::from(parsed))
}

/// Sets a property, keeping the first position of a repeated name.
pub(crate) fn insert_property(object: &mut Vec<(String, Value)>, name: String, value: Value) {
    match object.iter_mut().find(|(existing, _)| *existing == name) {
        Some((_, slot)) => *slot = value,
        None => object.push((name, value)),
    }
}

fn quote_string(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for character in text.chars() {
        match character {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            control if control.is_control() => {
                quoted.push_str(&format!("\\u{:04x}", u32::from(control)));
            }
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn format_number(number: f64, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
    if number.is_nan() {
        write!(formatter, "NaN")
    } else if number.is_infinite() {
        write!(formatter, "{}Infinity", if number < 0.0 { "-" } else { "" })
    } else if number == 0.0 {
        write!(formatter, "0")
    } else {
        write!(formatter, "{number}")
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Self::Undefined
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::Float(left), Self::Float(right)) => {
                left == right || (left.is_nan() && right.is_nan())
            }
            (Self::Int(integer), Self::Float(number)) | (Self::Float(number), Self::Int(integer)) => {
                float_as_integer(*number) == Some(*integer)
            }
            (Self::Str(left), Self::Str(right)) => left == right,
            (Self::Array(left), Self::Array(right)) => {
                ReferenceCounter::ptr_eq(left, right) || left[..] == right[..]
            }
            (Self::Object(left), Self::Object(right)) => {
                ReferenceCounter::ptr_eq(left, right)
                    || (left.len() == right.len()
                        && left.iter().all(|(name, value)| {
                            right
                                .iter()
                                .any(|(other_name, other_value)| name == other_name && value == other_value)
                        }))
            }
            (Self::Collection(left), Self::Collection(right)) => left.equals(right),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(formatter, "undefined"),
            Self::Null => write!(formatter, "null"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Int(integer) => write!(formatter, "{integer}"),
            Self::Float(number) => format_number(*number, formatter),
            Self::Str(text) => write!(formatter, "{text}"),
            Self::Array(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(formatter, ",")?;
                    }
                    if !matches!(value, Self::Undefined | Self::Null) {
                        write!(formatter, "{value}")?;
                    }
                }
                Ok(())
            }
            Self::Object(_) => write!(formatter, "[object Object]"),
            Self::Collection(collection) => write!(formatter, "{collection}"),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for Value {
    fn from(integer: i32) -> Self {
        Self::Int(i64::from(integer))
    }
}

impl From<u32> for Value {
    fn from(integer: u32) -> Self {
        Self::Int(i64::from(integer))
    }
}

impl From<i64> for Value {
    fn from(integer: i64) -> Self {
        Self::Int(integer)
    }
}

impl From<usize> for Value {
    fn from(index: usize) -> Self {
        Self::Int(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(number: f64) -> Self {
        Self::Float(number)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Str(ReferenceCounter::from(text))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Str(ReferenceCounter::from(text))
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Self::from(text.as_str())
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}

impl From<&Collection> for Value {
    fn from(collection: &Collection) -> Self {
        Self::Collection(collection.clone())
    }
}

impl From<&Self> for Value {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl From<Vec<Self>> for Value {
    fn from(values: Vec<Self>) -> Self {
        Self::Array(ReferenceCounter::from(values))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}
