//! Deep reads and writes along key paths.
//!
//! A read walks the path through nested collections and stops at the first
//! missing key. A write rebuilds only the containers along the path, so
//! everything off the path is shared with the original, and returns the
//! original root handle when nothing changed.
//!
//! Writes through missing keys fabricate empty `Map`s for the gaps, except
//! for removals and merges, which leave a missing path untouched.
//!
//! # Examples
//!
//! ```rust
//! use lambars_collections::{map, Value};
//!
//! let config = map! { "server" => map! { "port" => 80 } };
//!
//! assert_eq!(config.get_in(["server", "port"]).unwrap(), Some(Value::from(80)));
//! assert_eq!(config.get_at("server.host").unwrap(), None);
//!
//! let moved = config.set_in(["server", "port"], 8080).unwrap();
//! assert_eq!(moved.get_in_or(["server", "port"], 0).unwrap(), Value::from(8080));
//!
//! let same = config.update_in(["server", "port"], |port| port).unwrap();
//! assert!(same.is_identical(&Value::from(&config)));
//! ```

mod key_path;

pub use key_path::{IntoKeyPath, KeyPath, DEFAULT_DELIMITER};

use crate::collection::{Collection, CollectionType};
use crate::error::CollectionError;
use crate::value::Value;

// =============================================================================
// Reads
// =============================================================================

/// Reads the value at `path` inside `root`.
///
/// Returns `Ok(None)` at the first missing key.
///
/// # Errors
///
/// Returns [`CollectionError::InvalidKeyPath`] when `path` is not a key path,
/// and [`CollectionError::NotReadable`] when a value before the end of the
/// path is not a collection.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{map, path, CollectionError, Value};
///
/// let root = Value::from(map! { "a" => map! { "b" => 1 } });
/// assert_eq!(path::get_in(&root, ["a", "b"]).unwrap(), Some(Value::from(1)));
/// assert_eq!(path::get_in(&root, ["a", "z", "q"]).unwrap(), None);
/// assert!(matches!(
///     path::get_in(&root, ["a", "b", "c"]),
///     Err(CollectionError::NotReadable { .. })
/// ));
/// ```
pub fn get_in<P: IntoKeyPath>(root: &Value, path: P) -> Result<Option<Value>, CollectionError> {
    let path = path.into_key_path()?;
    let mut current = root.clone();
    for (depth, key) in path.keys().iter().enumerate() {
        let Value::Collection(collection) = &current else {
            return Err(not_readable(&path, depth, &current));
        };
        match collection.get_value(key) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Reads the value at `path`, or `default` when a key is missing.
///
/// # Errors
///
/// Same as [`get_in`].
pub fn get_in_or<P, D>(root: &Value, path: P, default: D) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    D: Into<Value>,
{
    Ok(get_in(root, path)?.unwrap_or_else(|| default.into()))
}

/// Returns `true` when every key of `path` is present.
///
/// # Errors
///
/// Same as [`get_in`].
pub fn has_in<P: IntoKeyPath>(root: &Value, path: P) -> Result<bool, CollectionError> {
    get_in(root, path).map(|found| found.is_some())
}

// =============================================================================
// Writes
// =============================================================================

/// What a write did at one level of the path.
enum Outcome {
    Unchanged,
    Removed,
    Replaced(Value),
}

/// Replaces the value at `path` with `updater(current)`.
///
/// `updater` receives `None` when the path is missing, and returning `None`
/// removes the entry. Returning the value it received, or `None` for a
/// missing path, gives back `root` itself. An empty path applies `updater` to
/// `root`, and removing the root yields `undefined`.
///
/// # Errors
///
/// Returns [`CollectionError::InvalidKeyPath`] when `path` is not a key path,
/// and [`CollectionError::NotSettable`] when a container on the path cannot
/// take the write.
///
/// # Examples
///
/// ```rust
/// use lambars_collections::{map, path, Value};
///
/// let root = Value::from(map! { "a" => map! { "b" => 1 } });
/// let grown = path::update_in(&root, ["a", "x", "y"], |_| Some(Value::from(2))).unwrap();
/// assert_eq!(path::get_in(&grown, ["a", "x", "y"]).unwrap(), Some(Value::from(2)));
/// assert_eq!(path::update_in(&root, Vec::<Value>::new(), |_| None).unwrap(), Value::Undefined);
/// ```
pub fn update_in<P, F>(root: &Value, path: P, updater: F) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    F: FnOnce(Option<Value>) -> Option<Value>,
{
    write_in(root, path, |current| Ok(updater(current)))
}

/// Replaces the value at `path` with `updater(current)`, passing `default`
/// when the path is missing.
///
/// When the path is missing and `updater` returns `default` itself, nothing
/// is written and `root` is returned.
///
/// # Errors
///
/// Same as [`update_in`].
pub fn update_in_or<P, D, F>(root: &Value, path: P, default: D, updater: F) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    D: Into<Value>,
    F: FnOnce(Value) -> Value,
{
    let default = default.into();
    write_in(root, path, |current| {
        let missing = current.is_none();
        let updated = updater(current.unwrap_or_else(|| default.clone()));
        Ok((!missing || !updated.is_identical(&default)).then_some(updated))
    })
}

/// Stores `value` at `path`, fabricating empty `Map`s for missing keys.
///
/// # Errors
///
/// Same as [`update_in`].
pub fn set_in<P, V>(root: &Value, path: P, value: V) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    V: Into<Value>,
{
    let value = value.into();
    write_in(root, path, |_| Ok(Some(value)))
}

/// Removes the entry at `path`. A missing path leaves `root` unchanged.
///
/// # Errors
///
/// Same as [`update_in`].
pub fn remove_in<P: IntoKeyPath>(root: &Value, path: P) -> Result<Value, CollectionError> {
    write_in(root, path, |_| Ok(None))
}

/// Shallowly merges `sources` into the collection at `path`. A missing path
/// leaves `root` unchanged.
///
/// # Errors
///
/// Same as [`update_in`], plus [`CollectionError::NotMergeable`] when the
/// value at `path` is not a collection.
pub fn merge_in<P, I, V>(root: &Value, path: P, sources: I) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let sources: Vec<Value> = sources.into_iter().map(Into::into).collect();
    write_in(root, path, |current| merged(current, |target| target.merge(sources)))
}

/// Deeply merges `sources` into the collection at `path`. A missing path
/// leaves `root` unchanged.
///
/// # Errors
///
/// Same as [`merge_in`].
pub fn merge_deep_in<P, I, V>(root: &Value, path: P, sources: I) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let sources: Vec<Value> = sources.into_iter().map(Into::into).collect();
    write_in(root, path, |current| merged(current, |target| target.merge_deep(sources)))
}

fn merged<M>(current: Option<Value>, merge: M) -> Result<Option<Value>, CollectionError>
where
    M: FnOnce(&Collection) -> Result<Collection, CollectionError>,
{
    match current {
        None => Ok(None),
        Some(Value::Collection(target)) => merge(&target).map(|merged| Some(Value::Collection(merged))),
        Some(other) => {
            tracing::debug!(value = %other, "rejecting merge target");
            Err(CollectionError::NotMergeable {
                value: other.to_string(),
            })
        }
    }
}

fn write_in<P, F>(root: &Value, path: P, updater: F) -> Result<Value, CollectionError>
where
    P: IntoKeyPath,
    F: FnOnce(Option<Value>) -> Result<Option<Value>, CollectionError>,
{
    let path = path.into_key_path()?;
    let mut updater = Some(updater);
    match update_deeply(Some(root), &path, 0, &mut updater)? {
        Outcome::Unchanged => Ok(root.clone()),
        Outcome::Removed => Ok(Value::Undefined),
        Outcome::Replaced(value) => Ok(value),
    }
}

/// Applies the updater at the end of `path`, rebuilding containers from
/// `depth` on. `existing` is `None` when the key at `depth - 1` is missing.
fn update_deeply<F>(
    existing: Option<&Value>,
    path: &KeyPath,
    depth: usize,
    updater: &mut Option<F>,
) -> Result<Outcome, CollectionError>
where
    F: FnOnce(Option<Value>) -> Result<Option<Value>, CollectionError>,
{
    let Some(key) = path.keys().get(depth) else {
        let Some(update) = updater.take() else {
            return Ok(Outcome::Unchanged);
        };
        return Ok(match (existing, update(existing.cloned())?) {
            (None, None) => Outcome::Unchanged,
            (Some(_), None) => Outcome::Removed,
            (Some(before), Some(after)) if after.is_identical(before) => Outcome::Unchanged,
            (_, Some(after)) => Outcome::Replaced(after),
        });
    };

    let container = match existing {
        None => None,
        Some(Value::Collection(collection)) => Some(collection),
        Some(other) => return Err(not_settable(path, depth, other)),
    };
    let next = container.and_then(|collection| collection.get_value(key));

    match update_deeply(next.as_ref(), path, depth + 1, updater)? {
        Outcome::Unchanged => Ok(Outcome::Unchanged),
        Outcome::Removed => {
            let Some(collection) = container else {
                return Ok(Outcome::Unchanged);
            };
            collection
                .remove_entry(key)
                .map(|removed| Outcome::Replaced(Value::Collection(removed)))
                .map_err(|_| not_settable(path, depth, &Value::from(collection)))
        }
        Outcome::Replaced(value) => {
            let target = container
                .cloned()
                .unwrap_or_else(|| Collection::empty(CollectionType::Map));
            if !target.supports_set() {
                return Err(not_settable(path, depth, &Value::Collection(target)));
            }
            target
                .set_entry(key.clone(), value)
                .map(|updated| Outcome::Replaced(Value::Collection(updated)))
        }
    }
}

fn not_readable(path: &KeyPath, depth: usize, value: &Value) -> CollectionError {
    let prefix = path.describe_prefix(depth);
    tracing::debug!(prefix = %prefix, value = %value, "path value is not readable");
    CollectionError::NotReadable {
        prefix,
        value: value.to_string(),
    }
}

fn not_settable(path: &KeyPath, depth: usize, value: &Value) -> CollectionError {
    let prefix = path.describe_prefix(depth);
    tracing::debug!(prefix = %prefix, value = %value, "path value is not settable");
    CollectionError::NotSettable {
        prefix,
        value: value.to_string(),
    }
}

// =============================================================================
// Collection methods
// =============================================================================

impl Collection {
    fn as_root(&self) -> Value {
        Value::Collection(self.clone())
    }

    /// Reads the value at `path`. See [`get_in`].
    ///
    /// # Errors
    ///
    /// Same as [`get_in`].
    pub fn get_in<P: IntoKeyPath>(&self, path: P) -> Result<Option<Value>, CollectionError> {
        get_in(&self.as_root(), path)
    }

    /// Reads the value at `path`, or `default`. See [`get_in_or`].
    ///
    /// # Errors
    ///
    /// Same as [`get_in`].
    pub fn get_in_or<P, D>(&self, path: P, default: D) -> Result<Value, CollectionError>
    where
        P: IntoKeyPath,
        D: Into<Value>,
    {
        get_in_or(&self.as_root(), path, default)
    }

    /// Returns `true` when every key of `path` is present.
    ///
    /// # Errors
    ///
    /// Same as [`get_in`].
    pub fn has_in<P: IntoKeyPath>(&self, path: P) -> Result<bool, CollectionError> {
        has_in(&self.as_root(), path)
    }

    /// Replaces the value at `path`. See [`update_in`].
    ///
    /// The result is a [`Value`] because an empty path may replace the
    /// collection itself with anything.
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn update_in<P, F>(&self, path: P, updater: F) -> Result<Value, CollectionError>
    where
        P: IntoKeyPath,
        F: FnOnce(Option<Value>) -> Option<Value>,
    {
        update_in(&self.as_root(), path, updater)
    }

    /// Replaces the value at `path`, starting from `default` when missing.
    /// See [`update_in_or`].
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn update_in_or<P, D, F>(&self, path: P, default: D, updater: F) -> Result<Value, CollectionError>
    where
        P: IntoKeyPath,
        D: Into<Value>,
        F: FnOnce(Value) -> Value,
    {
        update_in_or(&self.as_root(), path, default, updater)
    }

    /// Stores `value` at `path`. See [`set_in`].
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn set_in<P, V>(&self, path: P, value: V) -> Result<Value, CollectionError>
    where
        P: IntoKeyPath,
        V: Into<Value>,
    {
        set_in(&self.as_root(), path, value)
    }

    /// Removes the entry at `path`. See [`remove_in`].
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn remove_in<P: IntoKeyPath>(&self, path: P) -> Result<Value, CollectionError> {
        remove_in(&self.as_root(), path)
    }

    /// Shallowly merges into the collection at `path`. See [`merge_in`].
    ///
    /// # Errors
    ///
    /// Same as [`merge_in`].
    pub fn merge_in<P, I, V>(&self, path: P, sources: I) -> Result<Value, CollectionError>
    where
        P: IntoKeyPath,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        merge_in(&self.as_root(), path, sources)
    }

    /// Deeply merges into the collection at `path`. See [`merge_deep_in`].
    ///
    /// # Errors
    ///
    /// Same as [`merge_in`].
    pub fn merge_deep_in<P, I, V>(&self, path: P, sources: I) -> Result<Value, CollectionError>
    where
        P: IntoKeyPath,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        merge_deep_in(&self.as_root(), path, sources)
    }

    // -------------------------------------------------------------------------
    // Dotted paths
    // -------------------------------------------------------------------------

    /// [`Collection::get_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`get_in`].
    pub fn get_at(&self, path: &str) -> Result<Option<Value>, CollectionError> {
        self.get_in(KeyPath::parse(path))
    }

    /// [`Collection::has_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`get_in`].
    pub fn has_at(&self, path: &str) -> Result<bool, CollectionError> {
        self.has_in(KeyPath::parse(path))
    }

    /// [`Collection::update_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn update_at<F>(&self, path: &str, updater: F) -> Result<Value, CollectionError>
    where
        F: FnOnce(Option<Value>) -> Option<Value>,
    {
        self.update_in(KeyPath::parse(path), updater)
    }

    /// [`Collection::set_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn set_at<V: Into<Value>>(&self, path: &str, value: V) -> Result<Value, CollectionError> {
        self.set_in(KeyPath::parse(path), value)
    }

    /// [`Collection::remove_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`update_in`].
    pub fn remove_at(&self, path: &str) -> Result<Value, CollectionError> {
        self.remove_in(KeyPath::parse(path))
    }

    /// [`Collection::merge_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`merge_in`].
    pub fn merge_at<I, V>(&self, path: &str, sources: I) -> Result<Value, CollectionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.merge_in(KeyPath::parse(path), sources)
    }

    /// [`Collection::merge_deep_in`] on a dotted path.
    ///
    /// # Errors
    ///
    /// Same as [`merge_in`].
    pub fn merge_deep_at<I, V>(&self, path: &str, sources: I) -> Result<Value, CollectionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.merge_deep_in(KeyPath::parse(path), sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Query;
    use crate::{list, map, set, stack};
    use rstest::rstest;

    fn nested() -> Collection {
        map! { "a" => map! { "b" => map! { "c" => 10 } } }
    }

    #[rstest]
    fn test_update_doubles_leaf() {
        let doubled = nested()
            .update_in(["a", "b", "c"], |value| {
                value.and_then(|value| value.as_int()).map(|value| Value::from(value * 2))
            })
            .unwrap();
        assert_eq!(
            get_in(&doubled, ["a", "b", "c"]).unwrap(),
            Some(Value::from(20))
        );
    }

    #[rstest]
    fn test_write_shares_untouched_branches() {
        let root = map! { "left" => map! { "x" => 1 }, "right" => map! { "y" => 2 } };
        let written = root.set_in(["left", "x"], 5).unwrap();
        let before = root.get("right").unwrap();
        let after = get_in(&written, ["right"]).unwrap().unwrap();
        assert!(before.is_identical(&after));
    }

    #[rstest]
    fn test_removing_missing_path_does_not_fabricate() {
        let root = nested();
        let removed = root.remove_in(["a", "q", "z"]).unwrap();
        assert!(removed.is_identical(&Value::from(&root)));
        let merged = root.merge_in(["x", "y"], [map! { "k" => 1 }]).unwrap();
        assert!(merged.is_identical(&Value::from(&root)));
    }

    #[rstest]
    fn test_remove_in_drops_leaf() {
        let removed = nested().remove_in(["a", "b", "c"]).unwrap();
        assert_eq!(get_in(&removed, ["a", "b"]).unwrap().map(|inner| inner.to_string()), Some("Map {}".to_string()));
    }

    #[rstest]
    fn test_update_through_list_index() {
        let root = map! { "items" => list![map! { "n" => 1 }, map! { "n" => 2 }] };
        let updated = root.set_at("items.1.n", 3).unwrap();
        assert_eq!(get_in(&updated, ["items", "1", "n"]).unwrap(), Some(Value::from(3)));
        assert_eq!(get_in(&updated, vec![Value::from("items"), Value::from(-1), Value::from("n")]).unwrap(), Some(Value::from(3)));
    }

    #[rstest]
    fn test_write_into_stack_is_not_settable() {
        let root = map! { "s" => stack![1] };
        let error = root.set_in(list!["s", 0], 2).unwrap_err();
        assert_eq!(
            error.to_string(),
            r#"Invalid keyPath: Value at ["s"] does not have a .set() method and cannot be updated: Stack [ 1 ]"#
        );
    }

    #[rstest]
    fn test_write_through_primitive_is_not_settable() {
        let root = map! { "a" => 1 };
        let error = root.set_in(["a", "b"], 2).unwrap_err();
        assert_eq!(
            error,
            CollectionError::NotSettable {
                prefix: r#""a""#.to_string(),
                value: "1".to_string(),
            }
        );
    }

    #[rstest]
    fn test_removing_from_set_member() {
        let root = map! { "tags" => set!["x", "y"] };
        let removed = root.remove_in(["tags", "x"]).unwrap();
        let tags = get_in(&removed, ["tags"]).unwrap().and_then(Value::into_collection).unwrap();
        assert_eq!(tags.count().unwrap(), 1);
    }

    #[rstest]
    fn test_merge_into_primitive_fails() {
        let root = map! { "a" => 1 };
        assert_eq!(
            root.merge_in(["a"], [map! {}]).unwrap_err(),
            CollectionError::NotMergeable { value: "1".to_string() }
        );
    }

    #[rstest]
    fn test_merge_deep_at() {
        let root = map! { "a" => map! { "b" => map! { "c" => 1, "d" => 2 } } };
        let merged = root.merge_deep_at("a", [map! { "b" => map! { "c" => 5 } }]).unwrap();
        assert_eq!(get_in(&merged, ["a", "b", "c"]).unwrap(), Some(Value::from(5)));
        assert_eq!(get_in(&merged, ["a", "b", "d"]).unwrap(), Some(Value::from(2)));
    }

    #[rstest]
    fn test_dotted_forms_match_list_forms() {
        let root = nested();
        assert_eq!(root.get_at("a.b.c").unwrap(), root.get_in(["a", "b", "c"]).unwrap());
        assert!(root.has_at("a.b").unwrap());
        assert!(!root.has_at("a.z").unwrap());
        let via_at = root.update_at("a.b.c", |_| Some(Value::from(0))).unwrap();
        let via_in = root.update_in(KeyPath::parse("a.b").child("c"), |_| Some(Value::from(0))).unwrap();
        assert_eq!(via_at, via_in);
        assert_eq!(root.remove_at("a").unwrap(), Value::from(map! {}));
    }

    #[rstest]
    fn test_functional_forms_accept_primitive_root_with_empty_path() {
        let root = Value::from(7);
        assert_eq!(get_in(&root, Vec::<Value>::new()).unwrap(), Some(Value::from(7)));
        assert_eq!(set_in(&root, Vec::<Value>::new(), 8).unwrap(), Value::from(8));
        assert_eq!(remove_in(&root, Vec::<Value>::new()).unwrap(), Value::Undefined);
    }
}
