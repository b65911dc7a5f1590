//! # The reducer boundary
//!
//! The host application supplies one [`Reducer`]: a total function from the
//! current state and one action to a full replacement-candidate state (not a
//! diff). The shell calls it but never implements it.
//!
//! The reducer receives the state by shared reference and must not mutate it
//! through interior means; the engine performs its own merge afterwards. It
//! must also not call back into the shell: re-entrant dispatch from inside a
//! reducer is disallowed (the shell's `&mut self` receiver and the
//! non-reentrant shared-handle mutex both reject it structurally).
//!
//! Reducer failures are not caught anywhere in the shell; they propagate to
//! whichever operation invoked the reducer.

use trellis_core::{Action, AppState, ShellError, StateMap};

/// Everything a reducer sees for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct ReduceInput<'a> {
    /// The live state, route already refreshed (except on the very first
    /// bootstrap pass, which runs against an empty state).
    pub state: &'a AppState,

    /// The action being applied.
    pub action: &'a Action,
}

/// Host-supplied state transition function.
pub trait Reducer {
    /// Compute the full replacement-candidate state for one action.
    fn reduce(&mut self, input: ReduceInput<'_>) -> Result<StateMap, ShellError>;
}

impl<F> Reducer for F
where
    F: FnMut(ReduceInput<'_>) -> Result<StateMap, ShellError>,
{
    fn reduce(&mut self, input: ReduceInput<'_>) -> Result<StateMap, ShellError> {
        self(input)
    }
}
