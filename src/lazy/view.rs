//! Views reinterpreting a source's entries: capability changes, key and entry
//! projections, and keyed re-mappings.

use super::{EntryMapper, Mapper};
use crate::collection::{position_of, renumber, scan, Collection, Entries, Kind, Size, Traverse};
use crate::persistent::{entry_of, ReferenceCounter};
use crate::value::Value;

/// The size of a view that may drop entries.
const fn filtered_size(size: Size) -> Size {
    match size {
        Size::Known(0) => Size::Known(0),
        Size::Infinite => Size::Infinite,
        _ => Size::Unknown,
    }
}

fn nth_value(entries: Entries, key: &Value) -> Option<Value> {
    let index = position_of(key)?;
    entries.map(|(_, value)| value).nth(index)
}

// =============================================================================
// Retagged
// =============================================================================

/// The source's entries under another capability: keyed views keep the
/// source's keys, indexed views renumber its values and set views use each
/// value as its own key.
pub(crate) struct Retagged {
    pub(crate) source: Collection,
    pub(crate) kind: Kind,
}

impl Traverse for Retagged {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn is_ordered(&self) -> bool {
        match self.kind {
            Kind::Indexed => true,
            Kind::Keyed | Kind::Set => self.source.is_ordered(),
        }
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let entries = self.source.iterate(reverse);
        match self.kind {
            Kind::Keyed => entries,
            Kind::Set => Box::new(entries.map(|(_, value)| (value.clone(), value))),
            Kind::Indexed => {
                let source = self.source.clone();
                renumber(Box::new(entries.map(|(_, value)| value)), reverse, move || {
                    crate::collection::length_of(&source)
                })
            }
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        match (self.kind, self.source.kind()) {
            (Kind::Keyed, _) | (Kind::Indexed, Kind::Indexed) | (Kind::Set, Kind::Set) => {
                self.source.lookup(key)
            }
            (Kind::Indexed, _) => nth_value(self.source.iterate(false), key),
            (Kind::Set, _) => scan(self, key),
        }
    }
}

// =============================================================================
// Keys and entries as values
// =============================================================================

/// The source's keys as an indexed sequence.
pub(crate) struct KeyView {
    pub(crate) source: Collection,
}

impl Traverse for KeyView {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let source = self.source.clone();
        let keys = self.source.iterate(reverse).map(|(key, _)| key);
        renumber(Box::new(keys), reverse, move || crate::collection::length_of(&source))
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        let index = position_of(key)?;
        self.source.iterate(false).map(|(key, _)| key).nth(index)
    }
}

/// The source's entries as an indexed sequence of `[key, value]` arrays.
pub(crate) struct EntryView {
    pub(crate) source: Collection,
}

impl Traverse for EntryView {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let source = self.source.clone();
        let pairs = self
            .source
            .iterate(reverse)
            .map(|(key, value)| Value::array([key, value]));
        renumber(Box::new(pairs), reverse, move || crate::collection::length_of(&source))
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        nth_value(self.iterate(false), key)
    }
}

/// A keyed sequence read from a source of `[key, value]` pairs; values that
/// are not pairs are skipped.
pub(crate) struct FromEntries {
    pub(crate) source: Collection,
}

impl Traverse for FromEntries {
    fn kind(&self) -> Kind {
        Kind::Keyed
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        filtered_size(self.source.size())
    }

    fn iterate(&self, reverse: bool) -> Entries {
        Box::new(
            self.source
                .iterate(reverse)
                .filter_map(|(_, pair)| entry_of(&pair)),
        )
    }
}

// =============================================================================
// Keyed re-mappings
// =============================================================================

/// Keys and values swapped.
pub(crate) struct Flipped {
    pub(crate) source: Collection,
}

impl Traverse for Flipped {
    fn kind(&self) -> Kind {
        Kind::Keyed
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        Box::new(self.source.iterate(reverse).map(|(key, value)| (value, key)))
    }
}

/// Keys replaced by `mapper(key, value)`.
pub(crate) struct MappedKeys {
    pub(crate) source: Collection,
    pub(crate) mapper: Mapper,
}

impl Traverse for MappedKeys {
    fn kind(&self) -> Kind {
        Kind::Keyed
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let mapper = ReferenceCounter::clone(&self.mapper);
        Box::new(
            self.source
                .iterate(reverse)
                .map(move |(key, value)| (mapper(&key, &value), value)),
        )
    }
}

/// Entries replaced by `mapper(key, value)`.
pub(crate) struct MappedEntries {
    pub(crate) source: Collection,
    pub(crate) mapper: EntryMapper,
}

impl Traverse for MappedEntries {
    fn kind(&self) -> Kind {
        Kind::Keyed
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let mapper = ReferenceCounter::clone(&self.mapper);
        Box::new(
            self.source
                .iterate(reverse)
                .map(move |(key, value)| mapper(&key, &value)),
        )
    }
}
