//! Structural hashing and deep equality.
//!
//! Hashes are 32-bit, wrap on overflow, and are consistent with
//! [`Value`]'s equality: equal values always hash equal. Collection hashes
//! are order-sensitive only for ordered collections, and an ordered empty
//! collection hashes differently from an unordered one.
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{hash, list, set, Value};
//!
//! assert_eq!(hash::hash_value(&Value::from(3)), hash::hash_value(&Value::from(3.0)));
//! assert_eq!(set![1, 2].hash_code(), set![2, 1].hash_code());
//! assert_ne!(list![].hash_code(), set![].hash_code());
//! ```

use crate::collection::{Collection, Kind, Size, Traverse};
use crate::value::{float_as_integer, Value};

// =============================================================================
// Constants
// =============================================================================

const UNDEFINED_HASH: i32 = 0x4210_8423;
const NULL_HASH: i32 = 0x4210_8422;
const TRUE_HASH: i32 = 0x4210_8421;
const FALSE_HASH: i32 = 0x4210_8420;

const GOLDEN_RATIO: i32 = 0x9e37_79b9_u32 as i32;

// =============================================================================
// Primitives
// =============================================================================

/// Keeps a hash within the small-integer range by folding bit 31 into bit 30.
#[inline]
#[must_use]
pub const fn smi(hash: i32) -> i32 {
    let bits = hash as u32;
    (((bits >> 1) & 0x4000_0000) | (bits & 0xbfff_ffff)) as i32
}

/// Combines a value hash with its key hash.
#[inline]
#[must_use]
pub const fn hash_merge(value: i32, key: i32) -> i32 {
    value
        ^ key
            .wrapping_add(GOLDEN_RATIO)
            .wrapping_add(value << 6)
            .wrapping_add(value >> 2)
}

/// Hashes an integer. Integral floats hash identically.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn hash_integer(integer: i64) -> i32 {
    smi((integer as i32) ^ ((integer >> 32) as i32))
}

/// Hashes a float. `NaN` and the infinities hash to `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn hash_float(number: f64) -> i32 {
    if !number.is_finite() {
        return 0;
    }
    if let Some(integer) = float_as_integer(number) {
        return hash_integer(integer);
    }
    let bits = number.to_bits();
    smi((bits as i32) ^ ((bits >> 32) as i32))
}

/// Hashes a string over its UTF-16 code units with `h = 31 * h + unit`.
#[must_use]
pub fn hash_string(text: &str) -> i32 {
    let hash = text
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    smi(hash)
}

/// Avalanche finisher keyed by the element count.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn murmur_of_size(size: usize, hash: i32) -> i32 {
    let mut bits = (hash as u32).wrapping_mul(0xcc9e_2d51);
    bits = bits.rotate_left(15).wrapping_mul(0x1b87_3593);
    bits = bits.rotate_left(13).wrapping_mul(5);
    bits = bits.wrapping_add(0xe654_6b64) ^ (size as u32);
    bits = (bits ^ (bits >> 16)).wrapping_mul(0x85eb_ca6b);
    bits = (bits ^ (bits >> 13)).wrapping_mul(0xc2b2_ae35);
    smi((bits ^ (bits >> 16)) as i32)
}

// =============================================================================
// Values and collections
// =============================================================================

/// The structural hash of any value.
///
/// Native arrays hash as ordered indexed sequences and native objects as
/// unordered keyed ones.
#[must_use]
pub fn hash_value(value: &Value) -> i32 {
    match value {
        Value::Undefined => UNDEFINED_HASH,
        Value::Null => NULL_HASH,
        Value::Bool(true) => TRUE_HASH,
        Value::Bool(false) => FALSE_HASH,
        Value::Int(integer) => hash_integer(*integer),
        Value::Float(number) => hash_float(*number),
        Value::Str(text) => hash_string(text),
        Value::Array(values) => accumulate(
            Kind::Indexed,
            true,
            values.iter().enumerate().map(|(index, value)| (Value::from(index), value.clone())),
        ),
        Value::Object(properties) => accumulate(
            Kind::Keyed,
            false,
            properties
                .iter()
                .map(|(name, value)| (Value::from(name.as_str()), value.clone())),
        ),
        Value::Collection(collection) => collection.hash_code(),
    }
}

/// The structural hash of a traversable collection. Infinite collections
/// hash to `0` without being traversed.
#[must_use]
pub fn hash_collection<T: Traverse + ?Sized>(collection: &T) -> i32 {
    if collection.size().is_infinite() {
        return 0;
    }
    accumulate(collection.kind(), collection.is_ordered(), collection.iterate(false))
}

fn accumulate<I>(kind: Kind, ordered: bool, entries: I) -> i32
where
    I: Iterator<Item = (Value, Value)>,
{
    let keyed = kind.is_keyed();
    let mut count = 0usize;
    let hash = entries.fold(i32::from(ordered), |hash, (key, value)| {
        count += 1;
        let element = if keyed {
            hash_merge(hash_value(&value), hash_value(&key))
        } else {
            hash_value(&value)
        };
        if ordered {
            hash.wrapping_mul(31).wrapping_add(element)
        } else {
            hash.wrapping_add(element)
        }
    });
    murmur_of_size(count, hash)
}

// =============================================================================
// Deep equality
// =============================================================================

/// Deep, capability-aware equality between collections.
///
/// Infinite sequences are equal only to themselves.
pub(crate) fn deep_equal(left: &Collection, right: &Collection) -> bool {
    if left.ptr_eq(right) {
        return true;
    }
    if left.kind() != right.kind() || left.is_ordered() != right.is_ordered() {
        return false;
    }
    match (left.size(), right.size()) {
        (Size::Infinite, _) | (_, Size::Infinite) => return false,
        (Size::Known(left), Size::Known(right)) if left != right => return false,
        _ => {}
    }
    if let (Some(left), Some(right)) = (left.cached_hash(), right.cached_hash())
        && left != right
    {
        return false;
    }
    if left.is_ordered() {
        return ordered_equal(left, right);
    }
    let mut count = 0usize;
    let contained = left.iterate(false).all(|(key, value)| {
        count += 1;
        match left.kind() {
            Kind::Set => right.lookup(&value).is_some(),
            Kind::Keyed | Kind::Indexed => right.lookup(&key).is_some_and(|other| other == value),
        }
    });
    contained && count == crate::collection::length_of(right)
}

fn ordered_equal(left: &Collection, right: &Collection) -> bool {
    let compare_keys = left.kind().is_keyed();
    let mut left = left.iterate(false);
    let mut right = right.iterate(false);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some((left_key, left_value)), Some((right_key, right_value))) => {
                if left_value != right_value || (compare_keys && left_key != right_key) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
