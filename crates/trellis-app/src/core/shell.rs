//! The application shell: one state container, one dispatch loop.

use std::any::Any;

use tracing::{debug, trace};
use trellis_core::{
    canonical_json, derive_route, Action, AppState, LocationSource, ShellError, StateMap,
    INITIALIZING, LOADING, ROUTE_CHANGE,
};

use crate::reducer::{ReduceInput, Reducer};
use crate::render::Renderer;
use crate::subscriptions::Subscriptions;

/// The application shell.
///
/// Owns the single state container for the process lifetime together with
/// the host-supplied collaborators: the reducer boundary, the render
/// collaborator, and the ambient location. `V` is the host's view
/// description type and `C` its mount container type; both are opaque here.
///
/// All operations run to completion synchronously on the calling thread.
/// Reducers must not call back into the shell; every entry point takes
/// `&mut self`, so the borrow rules reject re-entrant dispatch outright.
pub struct AppShell<V, C> {
    state: AppState,
    view: V,
    container: C,
    reducer: Box<dyn Reducer + Send>,
    renderer: Box<dyn Renderer<V, C> + Send>,
    location: Box<dyn LocationSource + Send>,
    subscriptions: Subscriptions,
}

impl<V, C> std::fmt::Debug for AppShell<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell").finish_non_exhaustive()
    }
}

impl<V, C> AppShell<V, C> {
    /// Bootstrap an application.
    ///
    /// Runs two sequential reducer passes to build the initial state: first
    /// against an empty state with the [`LOADING`] marker so the reducer can
    /// establish defaults, then against that result with the
    /// [`INITIALIZING`] marker for a second derivation pass. The freshly
    /// derived route is written after each pass, then the shell renders once
    /// with the fully initialized state.
    ///
    /// A reducer failure in either pass aborts the bootstrap.
    pub fn new(
        view: V,
        reducer: impl Reducer + Send + 'static,
        renderer: impl Renderer<V, C> + Send + 'static,
        location: impl LocationSource + Send + 'static,
        container: C,
    ) -> Result<Self, ShellError> {
        let mut shell = Self {
            state: AppState::new(),
            view,
            container,
            reducer: Box::new(reducer),
            renderer: Box::new(renderer),
            location: Box::new(location),
            subscriptions: Subscriptions::new(),
        };

        let defaults = shell.reduce(&Action::of_kind(LOADING))?;
        shell.state = AppState::from_map(defaults);
        shell.refresh_route();

        let initial = shell.reduce(&Action::of_kind(INITIALIZING))?;
        shell.state = AppState::from_map(initial);
        shell.refresh_route();

        debug!(keys = shell.state.len(), "bootstrap complete");
        shell.render();
        Ok(shell)
    }

    /// Apply a single action.
    ///
    /// Refreshes `state.route`, invokes the reducer, and compares the
    /// returned candidate against the current state by canonical
    /// serialization. Only when the two differ is the candidate
    /// shallow-merged into the state, and the render collaborator runs only
    /// on such a change, and only if the action did not opt out via
    /// `rerender: false`.
    pub fn dispatch_once(&mut self, action: Action) -> Result<(), ShellError> {
        self.refresh_route();

        let candidate = self.reduce(&action)?;
        let state_changed = canonical_json(&candidate) != self.state.canonical_json();
        trace!(kind = ?action.kind, state_changed, "dispatch");

        if state_changed {
            self.state.merge(candidate);
            if action.rerender {
                self.render();
            }
        }
        Ok(())
    }

    /// Apply a batch of actions in order.
    ///
    /// Every action except the last has its `rerender` flag forced off, so a
    /// batch renders at most once, gated by the last action's own flag.
    /// Intermediate actions may still change state. An empty batch is a
    /// no-op; a reducer failure stops the batch at the failing action.
    pub fn dispatch(
        &mut self,
        actions: impl IntoIterator<Item = Action>,
    ) -> Result<(), ShellError> {
        let actions: Vec<Action> = actions.into_iter().collect();
        let last = actions.len().saturating_sub(1);
        for (index, mut action) in actions.into_iter().enumerate() {
            if index != last {
                action.rerender = false;
            }
            self.dispatch_once(action)?;
        }
        Ok(())
    }

    /// Navigation handler shared by back/forward and hash-change events.
    ///
    /// Re-derives the route, reduces with the [`ROUTE_CHANGE`] marker,
    /// merges the result, and renders unconditionally. Navigation has no
    /// change-detection gate, unlike [`dispatch_once`](Self::dispatch_once).
    pub fn handle_navigation(&mut self) -> Result<(), ShellError> {
        self.refresh_route();
        let fragment = self.reduce(&Action::of_kind(ROUTE_CHANGE))?;
        self.state.merge(fragment);
        self.render();
        Ok(())
    }

    /// Navigate programmatically: push a new history entry (no reload),
    /// then behave exactly like [`handle_navigation`](Self::handle_navigation).
    pub fn goto(&mut self, path: &str) -> Result<(), ShellError> {
        debug!(path, "goto");
        self.location.push(path);
        self.handle_navigation()
    }

    /// The live state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The host view description.
    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The host mount container.
    #[must_use]
    pub fn container(&self) -> &C {
        &self.container
    }

    /// The subscription registry.
    #[must_use]
    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    /// Mutable access to the subscription registry.
    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    /// Add or overwrite a subscription entry.
    pub fn add_subscription<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.subscriptions.insert(key, value);
    }

    /// Typed subscription lookup; `None` for unknown keys.
    #[must_use]
    pub fn subscription<T: Any>(&self, key: &str) -> Option<&T> {
        self.subscriptions.get(key)
    }

    /// Remove a subscription entry.
    pub fn remove_subscription(&mut self, key: &str) -> bool {
        self.subscriptions.remove(key)
    }

    fn reduce(&mut self, action: &Action) -> Result<StateMap, ShellError> {
        self.reducer.reduce(ReduceInput {
            state: &self.state,
            action,
        })
    }

    fn refresh_route(&mut self) {
        let route = derive_route(&*self.location);
        self.state.set_route(&route);
    }

    fn render(&mut self) {
        self.renderer
            .render(&self.view, &self.state, &mut self.container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use parking_lot::Mutex;
    use trellis_core::{MemoryLocation, StateMap};

    /// Renderer used throughout: appends a canonical snapshot of the state
    /// to the container, so the container doubles as the render log.
    fn recording_renderer() -> impl Renderer<String, Vec<String>> + Send {
        |_view: &String, state: &AppState, container: &mut Vec<String>| {
            container.push(state.canonical_json());
        }
    }

    /// A reducer keeping a `count` key, incremented by `increment` actions.
    fn counter_reducer(input: ReduceInput<'_>) -> Result<StateMap, ShellError> {
        let mut next = input.state.as_map().clone();
        match input.action.kind.as_deref() {
            Some(LOADING) => {
                next.insert("count".to_string(), json!(0));
            }
            Some("increment") => {
                let current = next.get("count").and_then(Value::as_i64).unwrap_or(0);
                next.insert("count".to_string(), json!(current + 1));
            }
            _ => {}
        }
        Ok(next)
    }

    fn counter_shell(url: &str) -> AppShell<String, Vec<String>> {
        AppShell::new(
            "view".to_string(),
            counter_reducer,
            recording_renderer(),
            MemoryLocation::at(url),
            Vec::new(),
        )
        .unwrap_or_else(|error| panic!("bootstrap failed: {error}"))
    }

    #[test]
    fn bootstrap_runs_both_marker_passes_and_renders_once() {
        let kinds = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&kinds);
        let reducer = move |input: ReduceInput<'_>| {
            seen.lock().push(input.action.kind.clone());
            counter_reducer(input)
        };

        let shell = AppShell::new(
            "view".to_string(),
            reducer,
            recording_renderer(),
            MemoryLocation::at("/inbox"),
            Vec::new(),
        )
        .unwrap_or_else(|error| panic!("bootstrap failed: {error}"));

        assert_eq!(
            *kinds.lock(),
            vec![Some(LOADING.to_string()), Some(INITIALIZING.to_string())]
        );
        assert_eq!(shell.container().len(), 1);
        assert_eq!(shell.state().get("count"), Some(&json!(0)));
        assert_eq!(
            shell.state().lookup(&["route", "segments"]),
            Some(&json!(["", "inbox"]))
        );
    }

    #[test]
    fn route_is_present_before_every_post_bootstrap_reduction() {
        let reducer = |input: ReduceInput<'_>| {
            if !input.action.is(LOADING) {
                assert!(input.state.route().is_some(), "route missing before reduce");
            }
            counter_reducer(input)
        };

        let mut shell = AppShell::new(
            "view".to_string(),
            reducer,
            recording_renderer(),
            MemoryLocation::at("/a"),
            Vec::new(),
        )
        .unwrap_or_else(|error| panic!("bootstrap failed: {error}"));

        shell
            .dispatch_once(Action::of_kind("increment"))
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));
        shell
            .goto("/b")
            .unwrap_or_else(|error| panic!("goto failed: {error}"));
    }

    #[test]
    fn batch_renders_once_after_the_last_action() {
        let mut shell = counter_shell("/");
        let renders_before = shell.container().len();

        shell
            .dispatch(vec![
                Action::of_kind("increment"),
                Action::of_kind("increment"),
                Action::of_kind("increment"),
            ])
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));

        assert_eq!(shell.state().get("count"), Some(&json!(3)));
        assert_eq!(shell.container().len() - renders_before, 1);
        // The one render happened after the last action was applied.
        let last_snapshot = shell.container().last().cloned().unwrap_or_default();
        assert!(last_snapshot.contains("\"count\":3"));
    }

    #[test]
    fn batch_respects_last_actions_own_rerender_flag() {
        let mut shell = counter_shell("/");
        let renders_before = shell.container().len();

        shell
            .dispatch(vec![
                Action::of_kind("increment"),
                Action::of_kind("increment").silent(),
            ])
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));

        assert_eq!(shell.state().get("count"), Some(&json!(2)));
        assert_eq!(shell.container().len(), renders_before);
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut shell = counter_shell("/");
        let renders_before = shell.container().len();

        shell
            .dispatch(Vec::new())
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));

        assert_eq!(shell.container().len(), renders_before);
    }

    #[test]
    fn unchanged_candidate_skips_merge_and_render() {
        let mut shell = counter_shell("/");
        let renders_before = shell.container().len();
        let snapshot = shell.state().canonical_json();

        // "noop" falls through the reducer, returning the state unchanged.
        shell
            .dispatch_once(Action::of_kind("noop"))
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));

        assert_eq!(shell.container().len(), renders_before);
        assert_eq!(shell.state().canonical_json(), snapshot);
    }

    #[test]
    fn silent_action_merges_without_rendering() {
        let mut shell = counter_shell("/");
        let renders_before = shell.container().len();

        shell
            .dispatch_once(Action::of_kind("increment").silent())
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));

        assert_eq!(shell.state().get("count"), Some(&json!(1)));
        assert_eq!(shell.container().len(), renders_before);
    }

    #[test]
    fn goto_renders_unconditionally_even_without_state_change() {
        let mut shell = counter_shell("/start");
        let renders_before = shell.container().len();

        // Navigate twice to the same place; the reducer changes nothing on
        // ROUTE_CHANGE, yet each goto renders.
        shell
            .goto("/start")
            .unwrap_or_else(|error| panic!("goto failed: {error}"));
        shell
            .goto("/start")
            .unwrap_or_else(|error| panic!("goto failed: {error}"));

        assert_eq!(shell.container().len() - renders_before, 2);
    }

    #[test]
    fn goto_updates_the_route() {
        let mut shell = counter_shell("/start");

        shell
            .goto("/new/path?tab=1")
            .unwrap_or_else(|error| panic!("goto failed: {error}"));

        assert_eq!(
            shell.state().lookup(&["route", "segments"]),
            Some(&json!(["", "new", "path"]))
        );
        assert_eq!(
            shell.state().lookup(&["route", "queryString", "tab"]),
            Some(&json!("1"))
        );
    }

    #[test]
    fn reducer_error_propagates_from_dispatch() {
        let reducer = |input: ReduceInput<'_>| {
            if input.action.is("explode") {
                return Err(ShellError::reducer("boom"));
            }
            Ok(input.state.as_map().clone())
        };
        let mut shell = AppShell::new(
            "view".to_string(),
            reducer,
            recording_renderer(),
            MemoryLocation::at("/"),
            Vec::new(),
        )
        .unwrap_or_else(|error| panic!("bootstrap failed: {error}"));

        let result = shell.dispatch_once(Action::of_kind("explode"));
        assert_matches!(result, Err(ShellError::Reducer { .. }));
    }

    #[test]
    fn reducer_error_aborts_bootstrap() {
        let reducer =
            |_input: ReduceInput<'_>| -> Result<StateMap, ShellError> {
                Err(ShellError::reducer("no defaults"))
            };

        let result = AppShell::<String, Vec<String>>::new(
            "view".to_string(),
            reducer,
            recording_renderer(),
            MemoryLocation::at("/"),
            Vec::new(),
        );
        assert_matches!(result, Err(ShellError::Reducer { .. }));
    }

    #[test]
    fn subscriptions_live_independently_of_dispatch() {
        let mut shell = counter_shell("/");

        shell.add_subscription("poll_interval", 30u32);
        shell
            .dispatch_once(Action::of_kind("increment"))
            .unwrap_or_else(|error| panic!("dispatch failed: {error}"));

        assert_eq!(shell.subscription::<u32>("poll_interval"), Some(&30));
        assert!(shell.remove_subscription("poll_interval"));
        assert_eq!(shell.subscription::<u32>("poll_interval"), None);
    }
}
