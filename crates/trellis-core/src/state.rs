//! # Application state container
//!
//! The shell owns exactly one [`AppState`] for the process lifetime. It is an
//! open-ended, insertion-ordered mapping from string keys to arbitrary JSON
//! values, mutated only by shallow key overwrite and never replaced from the
//! outside. The reserved key [`ROUTE_KEY`] holds the current route.
//!
//! Change detection in the dispatch engine is serialize-and-compare: two
//! states are equal iff their canonical serializations are byte-identical.
//! Key insertion order is therefore observable, which is why the underlying
//! map preserves it (`serde_json` with `preserve_order`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::route::Route;

/// The underlying insertion-ordered map type shared by state and fragments.
pub type StateMap = serde_json::Map<String, Value>;

/// Reserved state key holding the current [`Route`].
pub const ROUTE_KEY: &str = "route";

/// Canonical serialization used for change detection.
///
/// Deliberately order-sensitive: two maps with the same entries inserted in a
/// different order compare as different. Must not be upgraded to structural
/// equality, since that would change observable re-render behavior.
#[must_use]
pub fn canonical_json(map: &StateMap) -> String {
    // Serializing an in-memory JSON value cannot fail.
    serde_json::to_string(map).unwrap_or_default()
}

/// The single mutable state container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppState {
    entries: StateMap,
}

impl AppState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing map as the state. Used by the bootstrap passes,
    /// which replace the state wholesale before the shell hands out any
    /// reference to it.
    #[must_use]
    pub fn from_map(entries: StateMap) -> Self {
        Self { entries }
    }

    /// Borrow the underlying map.
    #[must_use]
    pub fn as_map(&self) -> &StateMap {
        &self.entries
    }

    /// Look up a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Insert or overwrite a top-level key, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Shallow-merge a fragment into the state in place: every key in the
    /// fragment overwrites the corresponding top-level key, other keys are
    /// left untouched.
    pub fn merge(&mut self, fragment: StateMap) {
        for (key, value) in fragment {
            self.entries.insert(key, value);
        }
    }

    /// Write the current route under [`ROUTE_KEY`].
    pub fn set_route(&mut self, route: &Route) {
        let value = serde_json::to_value(route).unwrap_or(Value::Null);
        self.entries.insert(ROUTE_KEY.to_string(), value);
    }

    /// The route value, if one has been written.
    #[must_use]
    pub fn route(&self) -> Option<&Value> {
        self.entries.get(ROUTE_KEY)
    }

    /// Canonical serialization of the whole state, see [`canonical_json`].
    #[must_use]
    pub fn canonical_json(&self) -> String {
        canonical_json(&self.entries)
    }

    /// Safe key-chain lookup: walk nested objects by key and arrays by
    /// numeric index. Any missing or non-indexable intermediate yields
    /// `None`; this never panics.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.entries.get(*first)?;
        for key in rest {
            current = match current {
                Value::Object(map) => map.get(*key)?,
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the state holds no keys at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
