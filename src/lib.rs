//! # lambars-collections
//!
//! Persistent, immutable collections with a lazy sequence engine, structural
//! hashing and deep key-path editing.
//!
//! ## Overview
//!
//! Every collection is a [`Collection`] handle: cheap to clone, never mutated
//! in place. Each one carries exactly one capability, [`Kind`]:
//!
//! - **Keyed**: `Map`, `OrderedMap` and keyed sequences
//! - **Indexed**: `List`, `Stack` and indexed sequences
//! - **Set**: `Set`, `OrderedSet` and set sequences
//!
//! On top of a single traversal primitive ([`Traverse`]) the crate provides:
//!
//! - **Lazy Engine**: `map`, `filter`, `slice`, `concat`, `flatten`, `zip`,
//!   `sort_by`, `group_by` and friends, composed without materializing, over
//!   finite and infinite sources
//! - **Derived Operations**: [`Query`], [`IndexedQuery`] and [`SetQuery`]
//!   (reductions, searches, conversions)
//! - **Structural Hash & Equality**: [`hash`], consistent with [`Value`]'s
//!   deep equality
//! - **Deep Path Engine**: [`path`], reads and structure-sharing writes along
//!   [`KeyPath`]s
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize` for [`Value`] and [`Collection`]
//! - `fxhash`: `FxHasher` for the keyed and set tries
//!
//! ## Example
//!
//! ```rust
//! use lambars_collections::prelude::*;
//!
//! let catalog = map! {
//!     "books" => list![
//!         map! { "title" => "Dune", "year" => 1965 },
//!         map! { "title" => "Emma", "year" => 1815 },
//!     ],
//! };
//!
//! let titles = catalog
//!     .get("books")
//!     .and_then(Value::into_collection)
//!     .unwrap()
//!     .map(|book, _| book.as_collection().and_then(|book| book.get("title")).unwrap_or_default());
//! assert_eq!(titles.join(", ").unwrap(), "Dune, Emma");
//!
//! let updated = catalog.set_in(list!["books", 1, "year"], 1816).unwrap();
//! assert_eq!(updated.get_in_or(list!["books", 1, "year"], 0).unwrap(), Value::from(1816));
//! assert_eq!(catalog.get_in_or(list!["books", 1, "year"], 0).unwrap(), Value::from(1815));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the collection handle, the value type, the query traits and
/// the literal macros.
///
/// # Usage
///
/// ```rust
/// use lambars_collections::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collection::{
        Collection, CollectionType, IndexedQuery, Kind, Query, SetQuery, Size, Traverse,
    };
    pub use crate::error::CollectionError;
    pub use crate::path::{IntoKeyPath, KeyPath};
    pub use crate::value::Value;
    pub use crate::{list, map, ordered_map, ordered_set, seq, set, stack};
}

pub mod collection;
pub mod error;
pub mod hash;
pub mod lazy;
pub mod path;
pub mod value;

mod macros;
mod persistent;

#[cfg(feature = "serde")]
mod serialization;

pub use collection::{
    Collection, CollectionType, Entries, IndexedQuery, IterMode, Kind, Query, SetQuery, Size,
    Traverse,
};
pub use error::CollectionError;
pub use lazy::default_comparator;
pub use path::{IntoKeyPath, KeyPath};
pub use value::Value;
