//! # Host event glue
//!
//! Browsers (and the in-memory navigator) deliver navigation through
//! registered callbacks, which need shared access to the shell. This module
//! provides the [`SharedShell`] handle and [`bind_navigation`], which
//! registers one listener per navigation event class and returns a
//! [`NavigationBinding`] whose [`unbind`](NavigationBinding::unbind) removes
//! them again, so shells can be torn down without leaking listeners.
//!
//! The mutex is non-reentrant, so a reducer that somehow reaches back into
//! the shared shell deadlocks instead of corrupting state; re-entrant
//! dispatch is disallowed, not supported.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::error;
use trellis_core::{ListenerId, NavigationEventKind, NavigationEvents};

use crate::core::AppShell;

/// Shared handle to a shell, for navigation listeners and multi-owner hosts.
pub type SharedShell<V, C> = Arc<Mutex<AppShell<V, C>>>;

/// Wrap a shell for shared use.
#[must_use]
pub fn shared<V, C>(shell: AppShell<V, C>) -> SharedShell<V, C> {
    Arc::new(Mutex::new(shell))
}

/// Listener registrations made by [`bind_navigation`].
///
/// Dropping the binding without calling [`unbind`](Self::unbind) leaves the
/// listeners registered for the lifetime of the event source.
#[derive(Debug)]
#[must_use = "call unbind(..) to remove the registered listeners"]
pub struct NavigationBinding {
    pop_state: ListenerId,
    hash_change: ListenerId,
}

impl NavigationBinding {
    /// Remove both listeners from the event source.
    pub fn unbind(self, events: &mut dyn NavigationEvents) {
        events.remove_listener(self.pop_state);
        events.remove_listener(self.hash_change);
    }
}

/// Register the shell's navigation handler for back/forward and hash-change
/// events.
///
/// Each listener locks the shell and runs
/// [`handle_navigation`](AppShell::handle_navigation). There is no caller to
/// propagate a reducer failure to from inside an event callback, so failures
/// are logged and the event is otherwise dropped.
pub fn bind_navigation<V, C>(
    shell: &SharedShell<V, C>,
    events: &mut dyn NavigationEvents,
) -> NavigationBinding
where
    V: Send + 'static,
    C: Send + 'static,
{
    let pop_state = events.add_listener(
        NavigationEventKind::PopState,
        navigation_listener(Arc::clone(shell)),
    );
    let hash_change = events.add_listener(
        NavigationEventKind::HashChange,
        navigation_listener(Arc::clone(shell)),
    );
    NavigationBinding {
        pop_state,
        hash_change,
    }
}

fn navigation_listener<V, C>(shell: SharedShell<V, C>) -> Box<dyn FnMut() + Send>
where
    V: Send + 'static,
    C: Send + 'static,
{
    Box::new(move || {
        if let Err(source) = shell.lock().handle_navigation() {
            error!(%source, "navigation handler failed");
        }
    })
}
