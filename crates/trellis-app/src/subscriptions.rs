//! # Subscription registry
//!
//! Keyed storage for arbitrary out-of-band values (callbacks, handles,
//! caches) with a lifecycle independent of dispatch and state. Entries are
//! added, overwritten and removed explicitly; nothing here is validated and
//! a duplicate key simply overwrites. Lookups of unknown keys, or with the
//! wrong type, return `None` rather than erroring.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// Keyed store of arbitrary values.
#[derive(Default)]
pub struct Subscriptions {
    entries: HashMap<String, Box<dyn Any + Send>>,
}

impl Subscriptions {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite an entry.
    pub fn insert<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Typed lookup. `None` for an unknown key or a type mismatch.
    #[must_use]
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    /// Typed mutable lookup.
    #[must_use]
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)?.downcast_mut()
    }

    /// Remove an entry. Returns false when the key was absent.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Whether an entry exists under the key, regardless of its type.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get_returns_value() {
        let mut subscriptions = Subscriptions::new();
        subscriptions.insert("timer", 250u64);

        assert_eq!(subscriptions.get::<u64>("timer"), Some(&250));
    }

    #[test]
    fn duplicate_key_overwrites() {
        let mut subscriptions = Subscriptions::new();
        subscriptions.insert("label", "first".to_string());
        subscriptions.insert("label", "second".to_string());

        assert_eq!(subscriptions.len(), 1);
        assert_eq!(
            subscriptions.get::<String>("label").map(String::as_str),
            Some("second")
        );
    }

    #[test]
    fn remove_then_get_returns_none() {
        let mut subscriptions = Subscriptions::new();
        subscriptions.insert("k", 1i32);

        assert!(subscriptions.remove("k"));
        assert!(!subscriptions.remove("k"));
        assert_eq!(subscriptions.get::<i32>("k"), None);
    }

    #[test]
    fn wrong_type_lookup_is_none_not_error() {
        let mut subscriptions = Subscriptions::new();
        subscriptions.insert("k", 1i32);

        assert_eq!(subscriptions.get::<String>("k"), None);
        assert!(subscriptions.contains("k"));
    }

    #[test]
    fn stored_callbacks_can_be_invoked() {
        let mut subscriptions = Subscriptions::new();
        subscriptions.insert(
            "on_tick",
            Box::new(|n: u32| n + 1) as Box<dyn Fn(u32) -> u32 + Send>,
        );

        let bumped = subscriptions
            .get::<Box<dyn Fn(u32) -> u32 + Send>>("on_tick")
            .map(|f| f(41));
        assert_eq!(bumped, Some(42));
    }
}
