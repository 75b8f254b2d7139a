//! Positional slicing.
//!
//! Bounds follow the familiar `slice(begin, end)` rules: negative bounds count
//! from the end, out-of-range bounds are clamped, and slicing never fails.
//! When the size is unknown and a bound is negative, the source is counted
//! first. On an infinite source a negative `begin` gives an empty slice and a
//! negative `end` means "no upper bound".

use crate::collection::{length_of, renumber, scan, Collection, Entries, Kind, Size, Traverse};
use crate::value::Value;

/// Resolved bounds: `end` is exclusive, `None` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bounds {
    pub(crate) begin: usize,
    pub(crate) end: Option<usize>,
}

impl Bounds {
    const EMPTY: Self = Self {
        begin: 0,
        end: Some(0),
    };

    /// Resolves `begin`/`end` against `size`, calling `count` only for an
    /// unknown size with a negative bound.
    pub(crate) fn resolve<C>(size: Size, begin: i64, end: Option<i64>, count: C) -> Self
    where
        C: FnOnce() -> usize,
    {
        let negative = begin < 0 || end.is_some_and(|end| end < 0);
        let length = match size {
            Size::Known(length) => Some(length),
            Size::Unknown if negative => {
                tracing::trace!(begin, ?end, "counting an unknown-size source to resolve negative slice bounds");
                Some(count())
            }
            Size::Unknown => None,
            Size::Infinite if begin < 0 => return Self::EMPTY,
            Size::Infinite => None,
        };
        let begin = clamp(begin, length);
        let end = match (end, length) {
            (Some(end), Some(length)) => Some(clamp(end, Some(length))),
            (Some(end), None) if end >= 0 => Some(clamp(end, None)),
            (Some(_) | None, None) => None,
            (None, Some(length)) => Some(length),
        };
        Self {
            begin,
            end: end.map(|end| end.max(begin)),
        }
    }

    pub(crate) fn width(self) -> Option<usize> {
        self.end.map(|end| end - self.begin)
    }

    fn contains(self, index: usize) -> bool {
        index >= self.begin && self.end.is_none_or(|end| index < end)
    }
}

fn clamp(index: i64, length: Option<usize>) -> usize {
    let Some(length) = length else {
        return usize::try_from(index.max(0)).unwrap_or(usize::MAX);
    };
    if index < 0 {
        let offset = usize::try_from(index.unsigned_abs()).unwrap_or(usize::MAX);
        length.saturating_sub(offset)
    } else {
        usize::try_from(index).unwrap_or(usize::MAX).min(length)
    }
}

pub(crate) struct Sliced {
    source: Collection,
    bounds: Bounds,
}

impl Sliced {
    fn window(&self) -> Entries {
        let entries = self.source.iterate(false).skip(self.bounds.begin);
        match self.bounds.width() {
            Some(width) => Box::new(entries.take(width)),
            None => Box::new(entries),
        }
    }

    fn window_reversed(&self) -> Entries {
        match (self.source.size(), self.bounds.end) {
            (Size::Known(length), Some(end)) => {
                let skipped = length.saturating_sub(end);
                Box::new(
                    self.source
                        .iterate(true)
                        .skip(skipped)
                        .take(end - self.bounds.begin),
                )
            }
            _ => {
                let mut entries: Vec<_> = self.window().collect();
                entries.reverse();
                Box::new(entries.into_iter())
            }
        }
    }
}

impl Traverse for Sliced {
    fn kind(&self) -> Kind {
        self.source.kind()
    }

    fn is_ordered(&self) -> bool {
        self.source.is_ordered()
    }

    fn size(&self) -> Size {
        match (self.source.size(), self.bounds.width()) {
            (Size::Known(_), Some(width)) => Size::Known(width),
            (Size::Infinite, Some(width)) => Size::Known(width),
            (_, Some(0)) => Size::Known(0),
            (Size::Infinite, None) => Size::Infinite,
            _ => Size::Unknown,
        }
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let entries = if reverse { self.window_reversed() } else { self.window() };
        if self.source.kind().is_indexed() {
            renumber(Box::new(entries.map(|(_, value)| value)), reverse, || length_of(self))
        } else {
            entries
        }
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        if !self.source.kind().is_indexed() {
            return scan(self, key);
        }
        let index = self.bounds.begin.checked_add(crate::collection::position_of(key)?)?;
        if !self.bounds.contains(index) {
            return None;
        }
        self.source.lookup(&Value::from(index))
    }
}

fn signed(amount: usize) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

impl Collection {
    /// The entries from position `begin` up to, not including, `end`.
    ///
    /// Negative bounds count from the end. Slicing never fails: bounds are
    /// clamped to the collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query};
    ///
    /// let letters = list!["a", "b", "c", "d"];
    /// assert_eq!(letters.slice(1, Some(3)).join("").unwrap(), "bc");
    /// assert_eq!(letters.slice(-2, None).join("").unwrap(), "cd");
    /// assert_eq!(letters.slice(3, Some(1)).join("").unwrap(), "");
    /// assert_eq!(letters.slice(-10, Some(10)).join("").unwrap(), "abcd");
    /// ```
    pub fn slice(&self, begin: i64, end: Option<i64>) -> Self {
        let bounds = Bounds::resolve(self.size(), begin, end, || length_of(self));
        if let Size::Known(length) = self.size()
            && bounds.begin == 0
            && bounds.end == Some(length)
        {
            return self.clone();
        }
        self.reify(self.slice_lazy(bounds))
    }

    pub(crate) fn slice_lazy(&self, bounds: Bounds) -> Self {
        Self::from_sequence(Sliced {
            source: self.clone(),
            bounds,
        })
    }

    /// The first `amount` entries.
    pub fn take(&self, amount: usize) -> Self {
        self.slice(0, Some(signed(amount)))
    }

    /// All but the first `amount` entries.
    pub fn skip(&self, amount: usize) -> Self {
        self.slice(signed(amount), None)
    }

    /// The last `amount` entries.
    pub fn take_last(&self, amount: usize) -> Self {
        if amount == 0 {
            return self.take(0);
        }
        self.slice(-signed(amount), None)
    }

    /// All but the last `amount` entries.
    pub fn skip_last(&self, amount: usize) -> Self {
        if amount == 0 {
            return self.clone();
        }
        self.slice(0, Some(-signed(amount)))
    }

    /// All but the first entry.
    pub fn rest(&self) -> Self {
        self.slice(1, None)
    }

    /// All but the last entry.
    pub fn butlast(&self) -> Self {
        self.slice(0, Some(-1))
    }
}
