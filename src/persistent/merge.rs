//! Shallow and deep merging.

use crate::collection::{ensure_finite, Collection, Kind, Query, Traverse};
use crate::error::CollectionError;
use crate::value::Value;

type MergeFunction<'a> = &'a dyn Fn(&Value, &Value, &Value) -> Value;

/// How a conflicting entry is resolved.
pub(crate) enum Merger<'a> {
    /// The incoming value wins.
    Replace,
    /// `merger(existing, incoming, key)` decides.
    With(MergeFunction<'a>),
    /// Compatible nested collections merge recursively; anything else is
    /// replaced, or resolved by the optional function.
    Deep(Option<MergeFunction<'a>>),
}

impl Merger<'_> {
    fn combine(&self, existing: &Value, incoming: Value, key: &Value) -> Result<Value, CollectionError> {
        match self {
            Self::Replace => Ok(incoming),
            Self::With(merger) => Ok(merger(existing, &incoming, key)),
            Self::Deep(merger) => {
                if let (Value::Collection(target), Value::Collection(source)) = (existing, &incoming)
                    && is_mergeable(target, source)
                {
                    return merge_into(target, vec![incoming.clone()], self).map(Value::Collection);
                }
                Ok(match merger {
                    Some(merger) => merger(existing, &incoming, key),
                    None => incoming,
                })
            }
        }
    }
}

/// Two collections merge deeply only when they share a capability.
fn is_mergeable(target: &Collection, source: &Collection) -> bool {
    target.kind() == source.kind()
}

/// Merges `sources` into `target`.
///
/// Keyed targets take each source entry, indexed targets and lazy sequences
/// concatenate, sets take the union. The original handle comes back when no
/// entry changed. Infinite source collections are refused.
pub(crate) fn merge_into(
    target: &Collection,
    sources: Vec<Value>,
    merger: &Merger<'_>,
) -> Result<Collection, CollectionError> {
    for source in &sources {
        if let Value::Collection(collection) = source {
            ensure_finite(collection.size(), "merge")?;
        }
    }
    if target.is_lazy() || target.kind() == Kind::Indexed {
        return Ok(target.concat(sources));
    }
    match target.kind() {
        Kind::Set => sources.into_iter().try_fold(target.clone(), |merged, source| {
            source_values(source)?.try_fold(merged, |merged, value| merged.add(value))
        }),
        _ => sources.into_iter().try_fold(target.clone(), |merged, source| {
            source_entries(source)?.try_fold(merged, |merged, (key, value)| {
                let value = match merged.get_value(&key) {
                    Some(existing) => merger.combine(&existing, value, &key)?,
                    None => value,
                };
                merged.set_entry(key, value)
            })
        }),
    }
}

/// Reads a merge source as keyed entries.
///
/// Native arrays are read as `[key, value]` pairs and native objects by
/// property; collections keep their own keys.
fn source_entries(source: Value) -> Result<Box<dyn Iterator<Item = (Value, Value)>>, CollectionError> {
    match source {
        Value::Collection(collection) => Ok(collection.iterate(false)),
        Value::Object(properties) => {
            let entries: Vec<(Value, Value)> = properties
                .iter()
                .map(|(name, value)| (Value::from(name.as_str()), value.clone()))
                .collect();
            Ok(Box::new(entries.into_iter()))
        }
        Value::Array(ref pairs) => {
            let entries = pairs
                .iter()
                .map(|pair| entry_of(pair).ok_or_else(|| invalid_source(&source)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(entries.into_iter()))
        }
        primitive => Err(invalid_source(&primitive)),
    }
}

fn source_values(source: Value) -> Result<Box<dyn Iterator<Item = Value>>, CollectionError> {
    match source {
        Value::Collection(collection) => Ok(collection.values()),
        Value::Array(values) => Ok(Box::new(values.to_vec().into_iter())),
        Value::Object(properties) => Ok(Box::new(
            properties
                .iter()
                .map(|(_, value)| value.clone())
                .collect::<Vec<_>>()
                .into_iter(),
        )),
        primitive => Err(invalid_source(&primitive)),
    }
}

/// Splits a two-element array or indexed collection into an entry.
pub(crate) fn entry_of(pair: &Value) -> Option<(Value, Value)> {
    match pair {
        Value::Array(items) if items.len() >= 2 => Some((items[0].clone(), items[1].clone())),
        Value::Collection(collection) if collection.kind().is_indexed() => {
            Some((collection.get_value(&Value::Int(0))?, collection.get_value(&Value::Int(1))?))
        }
        _ => None,
    }
}

fn invalid_source(source: &Value) -> CollectionError {
    tracing::debug!(source = %source, "rejecting merge source");
    CollectionError::InvalidSource {
        value: source.to_string(),
    }
}
