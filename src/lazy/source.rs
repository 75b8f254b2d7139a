//! Lazy sequence sources: literals, ranges, repetition and generator functions.

use crate::collection::{renumber, shared_entries, Collection, Entries, Kind, Size, Traverse};
use crate::persistent::ReferenceCounter;
use crate::value::Value;

// =============================================================================
// Literal Sources
// =============================================================================

/// An indexed sequence over a fixed slice of values.
pub(crate) struct IndexedSource {
    values: ReferenceCounter<[Value]>,
}

impl Traverse for IndexedSource {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        Size::Known(self.values.len())
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let values = ReferenceCounter::clone(&self.values);
        let length = values.len();
        let positions: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..length).rev())
        } else {
            Box::new(0..length)
        };
        Box::new(positions.map(move |index| (Value::from(index), values[index].clone())))
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        let index = crate::collection::position_of(key)?;
        self.values.get(index).cloned()
    }
}

/// An ordered keyed sequence over fixed entries. Keys may repeat.
pub(crate) struct KeyedSource {
    entries: ReferenceCounter<[(Value, Value)]>,
}

impl Traverse for KeyedSource {
    fn kind(&self) -> Kind {
        Kind::Keyed
    }

    fn is_ordered(&self) -> bool {
        true
    }

    fn size(&self) -> Size {
        Size::Known(self.entries.len())
    }

    fn iterate(&self, reverse: bool) -> Entries {
        shared_entries(ReferenceCounter::clone(&self.entries), reverse)
    }
}

/// An unordered set sequence over fixed values.
pub(crate) struct SetSource {
    values: ReferenceCounter<[Value]>,
}

impl Traverse for SetSource {
    fn kind(&self) -> Kind {
        Kind::Set
    }

    fn size(&self) -> Size {
        Size::Known(self.values.len())
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let values = ReferenceCounter::clone(&self.values);
        let length = values.len();
        let positions: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..length).rev())
        } else {
            Box::new(0..length)
        };
        Box::new(positions.map(move |index| (values[index].clone(), values[index].clone())))
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        self.values.iter().any(|value| value == key).then(|| key.clone())
    }
}

/// An indexed sequence of `[key, value]` arrays over an already materialized
/// entries cache.
pub(crate) struct EntryArraySource {
    pub(crate) entries: ReferenceCounter<[(Value, Value)]>,
}

impl Traverse for EntryArraySource {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        Size::Known(self.entries.len())
    }

    fn iterate(&self, reverse: bool) -> Entries {
        Box::new(
            shared_entries(ReferenceCounter::clone(&self.entries), reverse)
                .map(|(key, value)| Value::array([key, value]))
                .zip(positions(self.entries.len(), reverse))
                .map(|(entry, index)| (Value::from(index), entry)),
        )
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        let index = crate::collection::position_of(key)?;
        self.entries
            .get(index)
            .map(|(key, value)| Value::array([key.clone(), value.clone()]))
    }
}

fn positions(length: usize, reverse: bool) -> Box<dyn Iterator<Item = usize>> {
    if reverse {
        Box::new((0..length).rev())
    } else {
        Box::new(0..length)
    }
}

// =============================================================================
// Generated Sources
// =============================================================================

/// Arithmetic progression; `length` is `None` for an endless range.
pub(crate) struct RangeSource {
    start: i64,
    step: i64,
    length: Option<usize>,
}

impl RangeSource {
    fn value_at(&self, index: usize) -> Value {
        let offset = i64::try_from(index).unwrap_or(i64::MAX);
        Value::Int(self.start.saturating_add(offset.saturating_mul(self.step)))
    }
}

impl Traverse for RangeSource {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        self.length.map_or(Size::Infinite, Size::Known)
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let (start, step) = (self.start, self.step);
        let value_at = move |index: usize| {
            let offset = i64::try_from(index).unwrap_or(i64::MAX);
            Value::Int(start.saturating_add(offset.saturating_mul(step)))
        };
        match (self.length, reverse) {
            (None, false) => Box::new((0..).map(move |index| (Value::from(index), value_at(index)))),
            (None, true) => Box::new(std::iter::empty()),
            (Some(length), reverse) => {
                Box::new(positions(length, reverse).map(move |index| (Value::from(index), value_at(index))))
            }
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        let index = crate::collection::position_of(key)?;
        match self.length {
            Some(length) if index >= length => None,
            _ => Some(self.value_at(index)),
        }
    }
}

/// The same value, `times` times or forever.
pub(crate) struct RepeatSource {
    value: Value,
    times: Option<usize>,
}

impl Traverse for RepeatSource {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        self.times.map_or(Size::Infinite, Size::Known)
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let value = self.value.clone();
        match (self.times, reverse) {
            (None, false) => Box::new((0..).map(move |index: usize| (Value::from(index), value.clone()))),
            (None, true) => Box::new(std::iter::empty()),
            (Some(times), reverse) => {
                Box::new(positions(times, reverse).map(move |index| (Value::from(index), value.clone())))
            }
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        let index = crate::collection::position_of(key)?;
        match self.times {
            Some(times) if index >= times => None,
            _ => Some(self.value.clone()),
        }
    }
}

type Generator = ReferenceCounter<dyn Fn() -> Box<dyn Iterator<Item = Value>>>;

/// An indexed sequence of unknown size, regenerated on every traversal.
pub(crate) struct FunctionSource {
    generate: Generator,
}

impl Traverse for FunctionSource {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        Size::Unknown
    }

    fn iterate(&self, reverse: bool) -> Entries {
        if reverse {
            let mut values: Vec<Value> = (self.generate)().collect();
            values.reverse();
            let length = values.len();
            renumber(Box::new(values.into_iter()), true, || length)
        } else {
            renumber((self.generate)(), false, || 0)
        }
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl Collection {
    /// Creates an indexed lazy sequence from values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{Collection, Query};
    ///
    /// let doubled = Collection::seq_of([1, 2, 3]).map(|value, _| {
    ///     (value.as_int().unwrap() * 2).into()
    /// });
    /// assert_eq!(doubled.join(",").unwrap(), "2,4,6");
    /// ```
    pub fn seq_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_sequence(IndexedSource {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates an ordered keyed lazy sequence from entries.
    pub fn keyed_seq_of<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Self::from_sequence(KeyedSource {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        })
    }

    /// Creates a set-kind lazy sequence from values.
    pub fn set_seq_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_sequence(SetSource {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Creates the integer range from `start` towards `end` (exclusive) by
    /// `step`; `None` as `end` makes it endless.
    ///
    /// The step's sign is taken from the direction of the range and a zero
    /// step is treated as one. An endless range traversed in reverse is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{Collection, Query};
    ///
    /// assert_eq!(Collection::range(10, Some(0), 3).join(",").unwrap(), "10,7,4,1");
    /// assert_eq!(Collection::range(0, None, 2).take(3).join(",").unwrap(), "0,2,4");
    /// ```
    pub fn range(start: i64, end: Option<i64>, step: i64) -> Self {
        let magnitude = step.saturating_abs().max(1);
        let (step, length) = match end {
            None => (magnitude, None),
            Some(end) => {
                let step = if end < start { -magnitude } else { magnitude };
                let distance = (i128::from(end) - i128::from(start)).unsigned_abs();
                let magnitude = u128::from(magnitude.unsigned_abs());
                let length = distance.div_ceil(magnitude);
                (step, Some(usize::try_from(length).unwrap_or(usize::MAX)))
            }
        };
        Self::from_sequence(RangeSource { start, step, length })
    }

    /// Creates a sequence repeating `value`; `None` repeats forever.
    pub fn repeat<V: Into<Value>>(value: V, times: Option<usize>) -> Self {
        Self::from_sequence(RepeatSource {
            value: value.into(),
            times,
        })
    }

    /// Creates an indexed sequence of unknown size from a generator that is
    /// called again on every traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{Collection, Query, Size, Traverse, Value};
    ///
    /// let generated = Collection::from_fn(|| (1..=3).map(Value::from));
    /// assert_eq!(generated.size(), Size::Unknown);
    /// assert_eq!(generated.count().unwrap(), 3);
    /// ```
    pub fn from_fn<F, I>(generate: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        let generate: Generator = ReferenceCounter::new(move || {
            Box::new(generate().into_iter()) as Box<dyn Iterator<Item = Value>>
        });
        Self::from_sequence(FunctionSource { generate })
    }
}
