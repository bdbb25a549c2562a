//! The mutable key/value store holding resolved configuration.
//!
//! A [`Store`] owns a mapping of string keys to [`serde_json::Value`]s.
//! Every mutator deep-merges into the existing mapping in place and hands
//! back `&mut Store`, so ingestion calls chain:
//!
//! ```rust,no_run
//! use strata_config::{OnMissing, Store};
//!
//! # fn run() -> strata_config::StrataResult<()> {
//! let mut store = Store::new();
//! store
//!     .load_toml("defaults.toml", OnMissing::Error)?
//!     .load_yaml("local.yaml", OnMissing::Ignore)?
//!     .load_environment("MY_APP");
//! # Ok(())
//! # }
//! ```

mod environment;
mod ingest;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::merge::merge_map;
use crate::{StrataError, StrataResult, StrataResultExt};

/// What an ingestion call does when its source does not exist.
///
/// Only absence is covered: a source that exists but fails to parse is an
/// error under either policy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OnMissing {
    /// Fail with [`StrataError::SourceNotFound`].
    #[default]
    Error,
    /// Leave the store unchanged and succeed.
    Ignore,
}

/// Resolved configuration: a mapping of case-sensitive keys to values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    values: Map<String, Value>,
}

impl Store {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `defaults`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::Store;
    ///
    /// let store = Store::with_defaults([("debug", json!(false))]);
    /// assert_eq!(store.get("debug"), Some(&json!(false)));
    /// ```
    #[must_use]
    pub fn with_defaults<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut store = Self::new();
        store.update(defaults);
        store
    }

    /// Deep-merge `pairs` into the store.
    ///
    /// Accepts a [`Map`] or any iterator of key/value pairs. Nested mappings
    /// combine recursively; every other value replaces what was there.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::Store;
    ///
    /// let mut store = Store::new();
    /// store
    ///     .update([("a", json!({"x": 1}))])
    ///     .update([("a", json!({"y": 2}))]);
    /// assert_eq!(store.get("a"), Some(&json!({"x": 1, "y": 2})));
    /// ```
    pub fn update<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let layer = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.merge(layer)
    }

    pub(crate) fn merge(&mut self, layer: Map<String, Value>) -> &mut Self {
        merge_map(&mut self.values, layer);
        self
    }

    /// Assign `value` to `key` without merging, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value stored under `key`, or `fallback` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(fallback)
    }

    /// Value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::KeyNotFound`] when the key is absent.
    pub fn require(&self, key: &str) -> StrataResult<&Value> {
        self.get(key).ok_or_else(|| StrataError::key_not_found(key))
    }

    /// Walk `path` through nested mappings and return the value at its end.
    ///
    /// Sequences along the way are indexed by segments that parse as
    /// integers; negative indices count from the end. Any segment that cannot
    /// be followed yields `None`, as does an empty path. Partial paths are
    /// common in configuration, so this never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use strata_config::Store;
    ///
    /// let store = Store::with_defaults([(
    ///     "database",
    ///     json!({"connection": {"path": "x"}, "replicas": ["r0", "r1"]}),
    /// )]);
    /// assert_eq!(
    ///     store.get_recursive(["database", "connection", "path"]),
    ///     Some(&json!("x"))
    /// );
    /// assert_eq!(
    ///     store.get_recursive(["database", "replicas", "-1"]),
    ///     Some(&json!("r1"))
    /// );
    /// assert_eq!(store.get_recursive(["database", "connection", "missing"]), None);
    /// ```
    #[must_use]
    pub fn get_recursive<I, S>(&self, path: I) -> Option<&Value>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = path.into_iter();
        let first = segments.next()?;
        segments.try_fold(self.values.get(first.as_ref())?, |current, segment| {
            descend(current, segment.as_ref())
        })
    }

    /// Like [`Store::get_recursive`], returning `fallback` when the path
    /// cannot be followed.
    #[must_use]
    pub fn get_recursive_or<'a, I, S>(&'a self, path: I, fallback: &'a Value) -> &'a Value
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_recursive(path).unwrap_or(fallback)
    }

    /// Returns `true` when `key` is present at the top level.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over top-level entries.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.values.iter()
    }

    /// Borrow the underlying mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume the store and return the underlying mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    /// Consume the store and return it as a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    /// Deserialise the whole store into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Extract`] when the values do not fit `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::Deserialize;
    /// use serde_json::json;
    /// use strata_config::Store;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     port: u16,
    /// }
    ///
    /// let store = Store::with_defaults([("port", json!(8080))]);
    /// let server: Server = store.extract()?;
    /// assert_eq!(server.port, 8080);
    /// # Ok::<_, std::sync::Arc<strata_config::StrataError>>(())
    /// ```
    pub fn extract<T: DeserializeOwned>(&self) -> StrataResult<T> {
        serde_json::from_value(Value::Object(self.values.clone())).into_strata()
    }
}

fn descend<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => {
            let index: isize = segment.parse().ok()?;
            let position = if index < 0 {
                items.len().checked_sub(index.unsigned_abs())?
            } else {
                index.unsigned_abs()
            };
            items.get(position)
        }
        _ => None,
    }
}

impl From<Map<String, Value>> for Store {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl From<Store> for Map<String, Value> {
    fn from(store: Store) -> Self {
        store.values
    }
}

impl From<Store> for Value {
    fn from(store: Store) -> Self {
        store.into_value()
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Store {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
