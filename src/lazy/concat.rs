//! Concatenation of a collection with further parts.

use crate::collection::{length_of, renumber, Collection, Entries, Kind, Size, Traverse};
use crate::value::Value;

pub(crate) struct Concatenated {
    parts: Vec<Collection>,
    kind: Kind,
    ordered: bool,
}

impl Traverse for Concatenated {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn is_ordered(&self) -> bool {
        self.ordered
    }

    fn size(&self) -> Size {
        let mut total = Some(0usize);
        let mut unknown = false;
        for part in &self.parts {
            match part.size() {
                Size::Infinite => return Size::Infinite,
                Size::Unknown => unknown = true,
                Size::Known(count) => total = total.and_then(|total| total.checked_add(count)),
            }
        }
        match total {
            Some(total) if !unknown => Size::Known(total),
            _ => Size::Unknown,
        }
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let parts = self.parts.clone();
        let entries: Entries = if reverse {
            Box::new(parts.into_iter().rev().flat_map(|part| part.iterate(true)))
        } else {
            Box::new(parts.into_iter().flat_map(|part| part.iterate(false)))
        };
        match self.kind {
            Kind::Keyed => entries,
            Kind::Set => Box::new(entries.map(|(_, value)| (value.clone(), value))),
            Kind::Indexed => renumber(Box::new(entries.map(|(_, value)| value)), reverse, || {
                length_of(self)
            }),
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        match self.kind {
            Kind::Indexed => {
                let mut index = crate::collection::position_of(key)?;
                for part in &self.parts {
                    if let Size::Known(length) = part.size() {
                        if index < length {
                            return part.iterate(false).nth(index).map(|(_, value)| value);
                        }
                        index -= length;
                        continue;
                    }
                    let mut seen = 0;
                    for (_, value) in part.iterate(false) {
                        if seen == index {
                            return Some(value);
                        }
                        seen += 1;
                    }
                    index -= seen;
                }
                None
            }
            Kind::Set => self
                .parts
                .iter()
                .find_map(|part| part.iterate(false).find(|(_, value)| value == key))
                .map(|(_, value)| value),
            Kind::Keyed => self.parts.iter().rev().find_map(|part| part.lookup(key)),
        }
    }
}

/// Coerces one concatenation argument into a collection part.
fn as_part(value: Value) -> Collection {
    match value {
        Value::Collection(collection) => collection,
        Value::Array(values) => Collection::seq_of(values.iter().cloned()),
        Value::Object(properties) => Collection::keyed_seq_of(
            properties
                .iter()
                .map(|(key, value)| (Value::from(key.as_str()), value.clone())),
        ),
        single => Collection::seq_of([single]),
    }
}

impl Collection {
    /// Appends the entries of each value after this collection's entries.
    ///
    /// Collections contribute their entries, native arrays their elements,
    /// native objects their properties, and any other value is appended as a
    /// single element. Keyed results let later keys win; set results keep one
    /// copy of each value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, map, Query, Value};
    ///
    /// let joined = list![1, 2].concat([Value::from(list![3]), Value::from(4)]);
    /// assert_eq!(joined.join(",").unwrap(), "1,2,3,4");
    ///
    /// let merged = map! { "a" => 1 }.concat([map! { "a" => 2, "b" => 3 }]);
    /// assert_eq!(merged.get("a"), Some(Value::from(2)));
    /// ```
    pub fn concat<I, V>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let extra: Vec<Collection> = values
            .into_iter()
            .map(|value| as_part(value.into()))
            .filter(|part| part.size() != Size::Known(0))
            .collect();
        if extra.is_empty() {
            return self.clone();
        }
        let mut parts = Vec::with_capacity(extra.len() + 1);
        if self.size() != Size::Known(0) || self.is_lazy() {
            parts.push(self.clone());
        }
        parts.extend(extra);
        self.reify(Self::from_sequence(Concatenated {
            parts,
            kind: self.kind(),
            ordered: self.is_ordered(),
        }))
    }
}
