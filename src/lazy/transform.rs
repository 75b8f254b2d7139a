//! Element-wise lazy descriptors: map, filter, reverse, while-bounds,
//! flatten and interpose.
//!
//! Each descriptor holds its source handle and closures and recomputes its
//! output on every traversal.

use super::{Mapper, Predicate};
use crate::collection::{length_of, renumber, scan, Collection, Entries, Kind, Size, Traverse};
use crate::persistent::ReferenceCounter;
use crate::value::Value;

// =============================================================================
// Mapped
// =============================================================================

pub(crate) struct Mapped {
    pub(crate) source: Collection,
    pub(crate) mapper: Mapper,
}

impl Traverse for Mapped {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let mapper = ReferenceCounter::clone(&self.mapper);
        let is_set = self.source.kind().is_set();
        Box::new(self.source.iterate(reverse).map(move |(key, value)| {
            let mapped = mapper(&value, &key);
            if is_set { (mapped.clone(), mapped) } else { (key, mapped) }
        }))
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        if self.source.kind().is_set() {
            return scan(self, key);
        }
        self.source.lookup(key).map(|value| (self.mapper)(&value, key))
    }
}

// =============================================================================
// Filtered
// =============================================================================

pub(crate) struct Filtered {
    pub(crate) source: Collection,
    pub(crate) predicate: Predicate,
    pub(crate) keep: bool,
}

impl Traverse for Filtered {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        match self.source.size() {
            Size::Known(0) => Size::Known(0),
            _ => Size::Unknown,
        }
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let predicate = ReferenceCounter::clone(&self.predicate);
        let keep = self.keep;
        let kept = self
            .source
            .iterate(reverse)
            .filter(move |(key, value)| predicate(value, key) == keep);
        if self.source.kind().is_indexed() {
            renumber(Box::new(kept.map(|(_, value)| value)), reverse, || {
                self.iterate(false).count()
            })
        } else {
            Box::new(kept)
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        if self.source.kind().is_indexed() {
            return scan(self, key);
        }
        self.source
            .lookup(key)
            .filter(|value| (self.predicate)(value, key) == self.keep)
    }
}

// =============================================================================
// Reversed
// =============================================================================

pub(crate) struct Reversed {
    pub(crate) source: Collection,
}

impl Traverse for Reversed {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        self.source.size()
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let entries = self.source.iterate(!reverse);
        if self.source.kind().is_indexed() {
            renumber(Box::new(entries.map(|(_, value)| value)), reverse, || {
                length_of(&self.source)
            })
        } else {
            entries
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        if !self.source.kind().is_indexed() {
            return self.source.lookup(key);
        }
        let index = crate::collection::position_of(key)?;
        match self.source.size() {
            Size::Known(length) => {
                let mirrored = length.checked_sub(index + 1)?;
                self.source.lookup(&Value::from(mirrored))
            }
            Size::Infinite => None,
            Size::Unknown => self.iterate(false).nth(index).map(|(_, value)| value),
        }
    }
}

// =============================================================================
// While-bounded
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Take,
    Skip,
}

/// `take_while` / `skip_while`, and their `until` forms with `negate` set.
pub(crate) struct WhileBounded {
    pub(crate) source: Collection,
    pub(crate) predicate: Predicate,
    pub(crate) bound: Bound,
    pub(crate) negate: bool,
}

impl WhileBounded {
    fn forward(&self) -> Entries {
        let predicate = ReferenceCounter::clone(&self.predicate);
        let negate = self.negate;
        let holds = move |entry: &(Value, Value)| predicate(&entry.1, &entry.0) != negate;
        let entries = self.source.iterate(false);
        match self.bound {
            Bound::Take => Box::new(entries.take_while(holds)),
            Bound::Skip => Box::new(entries.skip_while(holds)),
        }
    }
}

impl Traverse for WhileBounded {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        Size::Unknown
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let is_indexed = self.source.kind().is_indexed();
        if !reverse {
            let entries = self.forward();
            return if is_indexed {
                renumber(Box::new(entries.map(|(_, value)| value)), false, || 0)
            } else {
                entries
            };
        }
        let mut entries: Vec<(Value, Value)> = self.forward().collect();
        entries.reverse();
        if is_indexed {
            let length = entries.len();
            renumber(Box::new(entries.into_iter().map(|(_, value)| value)), true, || length)
        } else {
            Box::new(entries.into_iter())
        }
    }
}

// =============================================================================
// Flattened
// =============================================================================

pub(crate) struct Flattened {
    pub(crate) source: Collection,
    /// `None` flattens every level.
    pub(crate) depth: Option<usize>,
    pub(crate) size: Size,
}

struct FlattenIterator {
    stack: Vec<(Entries, usize)>,
    depth: Option<usize>,
    reverse: bool,
}

impl Iterator for FlattenIterator {
    type Item = (Value, Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (entries, level) = self.stack.last_mut()?;
            let level = *level;
            let next = entries.next();
            match next {
                None => {
                    self.stack.pop();
                }
                Some((key, value)) => {
                    let descend = self.depth.is_none_or(|depth| level < depth);
                    if descend && let Value::Collection(nested) = &value {
                        let nested = nested.iterate(self.reverse);
                        self.stack.push((nested, level + 1));
                        continue;
                    }
                    return Some((key, value));
                }
            }
        }
    }
}

impl Traverse for Flattened {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        self.size
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let flattened = FlattenIterator {
            stack: vec![(self.source.iterate(reverse), 0)],
            depth: self.depth,
            reverse,
        };
        match self.source.kind() {
            Kind::Keyed => Box::new(flattened),
            Kind::Set => Box::new(flattened.map(|(_, value)| (value.clone(), value))),
            Kind::Indexed => renumber(Box::new(flattened.map(|(_, value)| value)), reverse, || {
                self.iterate(false).count()
            }),
        }
    }
}

// =============================================================================
// Interposed
// =============================================================================

pub(crate) struct Interposed {
    pub(crate) source: Collection,
    pub(crate) separator: Value,
}

impl Traverse for Interposed {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        match self.source.size() {
            Size::Known(count) => Size::Known((count * 2).saturating_sub(1)),
            other => other,
        }
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let separator = self.separator.clone();
        let values = self
            .source
            .iterate(reverse)
            .enumerate()
            .flat_map(move |(index, (_, value))| {
                let lead = (index > 0).then(|| separator.clone());
                lead.into_iter().chain(std::iter::once(value))
            });
        renumber(Box::new(values), reverse, || length_of(self))
    }
}
