//! # Actions
//!
//! An action describes an intended state transition. It is created by the
//! caller, handed once to the reducer boundary, and consulted once by the
//! dispatch engine for its `rerender` flag. The marker kinds below are the
//! ones the shell itself emits during bootstrap and navigation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::StateMap;

/// Marker kind for the first bootstrap reducer pass (empty state).
pub const LOADING: &str = "LOADING";

/// Marker kind for the second bootstrap reducer pass.
pub const INITIALIZING: &str = "INITIALIZING";

/// Marker kind for navigation events and programmatic `goto`.
pub const ROUTE_CHANGE: &str = "ROUTE_CHANGE";

/// A description of an intended state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Optional discriminator consumed by the reducer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// When false, the dispatch engine skips the render step for this action
    /// even if it changed state. Defaults to true.
    #[serde(default = "default_rerender")]
    pub rerender: bool,

    /// Arbitrary payload fields for the reducer.
    #[serde(default, flatten)]
    pub payload: StateMap,
}

fn default_rerender() -> bool {
    true
}

impl Default for Action {
    fn default() -> Self {
        Self {
            kind: None,
            rerender: true,
            payload: StateMap::new(),
        }
    }
}

impl Action {
    /// An empty action with no kind and default render behavior.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An action with the given kind.
    #[must_use]
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Attach a payload field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }

    /// Suppress the render step for this action.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.rerender = false;
        self
    }

    /// Whether this action carries the given kind.
    #[must_use]
    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rerender_defaults_to_true() {
        assert!(Action::new().rerender);
        assert!(Action::of_kind("increment").rerender);
        assert!(!Action::of_kind("increment").silent().rerender);
    }

    #[test]
    fn payload_builder_accumulates_fields() {
        let action = Action::of_kind("open")
            .with("id", json!(42))
            .with("tab", json!("drafts"));

        assert!(action.is("open"));
        assert_eq!(action.payload.get("id"), Some(&json!(42)));
        assert_eq!(action.payload.get("tab"), Some(&json!("drafts")));
    }

    #[test]
    fn missing_rerender_deserializes_as_true() {
        let action: Action =
            serde_json::from_value(json!({"kind": "open", "id": 7})).expect("valid action");

        assert!(action.rerender);
        assert!(action.is("open"));
        assert_eq!(action.payload.get("id"), Some(&json!(7)));
    }
}
