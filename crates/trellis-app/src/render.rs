//! # The render collaborator
//!
//! Rendering is opaque to the shell: it hands the current view description,
//! the live state and the mount container to a host-supplied [`Renderer`]
//! and consumes no return value. What "view" and "container" are is entirely
//! the host's business.

use trellis_core::AppState;

/// Host-supplied render collaborator.
pub trait Renderer<V, C> {
    /// Render the view against the live state into the container.
    fn render(&mut self, view: &V, state: &AppState, container: &mut C);
}

impl<V, C, F> Renderer<V, C> for F
where
    F: FnMut(&V, &AppState, &mut C),
{
    fn render(&mut self, view: &V, state: &AppState, container: &mut C) {
        self(view, state, container)
    }
}
