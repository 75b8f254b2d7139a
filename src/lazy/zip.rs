//! Zipping and interleaving.

use super::{Flattened, Zipper};
use crate::collection::{Collection, Entries, Kind, Size, Traverse};
use crate::persistent::ReferenceCounter;
use crate::value::Value;

/// Rows of values taken position by position from several sources.
pub(crate) struct Zipped {
    sources: Vec<Collection>,
    zipper: Zipper,
    /// Continue until the longest source ends, padding with `undefined`.
    fill: bool,
}

impl Zipped {
    fn rows(&self) -> Box<dyn Iterator<Item = Value>> {
        let mut iterators: Vec<Box<dyn Iterator<Item = Value>>> = self
            .sources
            .iter()
            .map(|source| Box::new(source.iterate(false).map(|(_, value)| value)) as Box<dyn Iterator<Item = Value>>)
            .collect();
        let zipper = ReferenceCounter::clone(&self.zipper);
        let fill = self.fill;
        Box::new(std::iter::from_fn(move || {
            let row: Vec<Option<Value>> = iterators.iter_mut().map(Iterator::next).collect();
            let exhausted = if fill {
                row.iter().all(Option::is_none)
            } else {
                row.iter().any(Option::is_none)
            };
            if exhausted {
                return None;
            }
            let row: Vec<Value> = row.into_iter().map(Option::unwrap_or_default).collect();
            Some(zipper(&row))
        }))
    }
}

impl Traverse for Zipped {
    fn kind(&self) -> Kind {
        Kind::Indexed
    }

    fn size(&self) -> Size {
        let sizes: Vec<Size> = self.sources.iter().map(Traverse::size).collect();
        if sizes.iter().all(|size| size.is_infinite()) {
            return Size::Infinite;
        }
        if sizes.contains(&Size::Unknown) {
            return Size::Unknown;
        }
        let known = sizes.iter().filter_map(|size| size.known());
        let length = if self.fill { known.max() } else { known.min() };
        match length {
            Some(length) => Size::Known(length),
            None if self.fill => Size::Infinite,
            None => Size::Known(0),
        }
    }

    fn iterate(&self, reverse: bool) -> Entries {
        let rows = self.rows();
        if !reverse {
            return Box::new(rows.enumerate().map(|(index, row)| (Value::from(index), row)));
        }
        if self.size().is_infinite() {
            return Box::new(std::iter::empty());
        }
        let rows: Vec<(Value, Value)> = rows
            .enumerate()
            .map(|(index, row)| (Value::from(index), row))
            .collect();
        Box::new(rows.into_iter().rev())
    }

    fn lookup(&self, key: &Value) -> Option<Value> {
        let index = crate::collection::position_of(key)?;
        let mut row = Vec::with_capacity(self.sources.len());
        let mut present = false;
        for source in &self.sources {
            let value = source.iterate(false).nth(index).map(|(_, value)| value);
            present |= value.is_some();
            match value {
                Some(value) => row.push(value),
                None if self.fill => row.push(Value::Undefined),
                None => return None,
            }
        }
        present.then(|| (self.zipper)(&row))
    }
}

fn default_zipper(row: &[Value]) -> Value {
    Value::array(row.iter().cloned())
}

impl Collection {
    /// Pairs values position by position into native arrays, stopping at the
    /// shortest collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query, Value};
    ///
    /// let pairs = list!["a", "b", "c"].zip([list![1, 2]]);
    /// assert_eq!(pairs.count().unwrap(), 2);
    /// assert_eq!(
    ///     pairs.first(),
    ///     Some(Value::array([Value::from("a"), Value::from(1)])),
    /// );
    /// ```
    pub fn zip<I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        self.zip_with(default_zipper, others)
    }

    /// Combines values position by position with `zipper`, stopping at the
    /// shortest collection.
    pub fn zip_with<F, I>(&self, zipper: F, others: I) -> Self
    where
        F: Fn(&[Value]) -> Value + 'static,
        I: IntoIterator<Item = Self>,
    {
        self.zipped(ReferenceCounter::new(zipper), others, false)
    }

    /// Pairs values position by position until the longest collection ends,
    /// padding the shorter ones with `undefined`.
    pub fn zip_all<I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        self.zipped(ReferenceCounter::new(default_zipper), others, true)
    }

    fn zipped<I>(&self, zipper: Zipper, others: I, fill: bool) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let sources = std::iter::once(self.clone()).chain(others).collect();
        self.reify(Self::from_sequence(Zipped { sources, zipper, fill }))
    }

    /// Alternates values from this collection and `others`, stopping at the
    /// end of the shortest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_collections::{list, Query};
    ///
    /// let mixed = list![1, 2, 3].interleave([list!["a", "b"]]);
    /// assert_eq!(mixed.join(",").unwrap(), "1,a,2,b");
    /// ```
    pub fn interleave<I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        let sources: Vec<Self> = std::iter::once(self.clone()).chain(others).collect();
        let width = sources.len();
        let zipped = Self::from_sequence(Zipped {
            sources,
            zipper: ReferenceCounter::new(|row: &[Value]| Value::Collection(Self::seq_of(row.iter().cloned()))),
            fill: false,
        });
        let size = match zipped.size() {
            Size::Known(rows) => Size::Known(rows * width),
            other => other,
        };
        self.reify(Self::from_sequence(Flattened {
            source: zipped,
            depth: Some(1),
            size,
        }))
    }
}
