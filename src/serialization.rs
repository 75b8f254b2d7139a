//! `serde` support.
//!
//! Values serialize as their native data: `undefined` and `null` as unit,
//! arrays as sequences, objects as maps. Collections serialize through
//! [`Query::to_js`], so keyed collections become maps with stringified keys
//! and everything else a sequence. Infinite collections fail to serialize.

use serde::ser::{Error, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::collection::{Collection, Query};
use crate::value::Value;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(integer) => serializer.serialize_i64(*integer),
            Self::Float(number) => serializer.serialize_f64(*number),
            Self::Str(text) => serializer.serialize_str(text),
            Self::Array(values) => {
                let mut sequence = serializer.serialize_seq(Some(values.len()))?;
                for value in values.iter() {
                    sequence.serialize_element(value)?;
                }
                sequence.end()
            }
            Self::Object(properties) => {
                let mut map = serializer.serialize_map(Some(properties.len()))?;
                for (name, value) in properties.iter() {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Self::Collection(collection) => collection.serialize(serializer),
        }
    }
}

impl Serialize for Collection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_js().map_err(S::Error::custom)?.serialize(serializer)
    }
}
