//! Trellis App - the headless application shell
//!
//! This crate drives the types from `trellis-core`:
//!
//! - [`AppShell`]: owns the single state container and runs the dispatch
//!   loop (derive route, reduce, detect change, merge, conditionally render)
//! - [`Reducer`] / [`Renderer`]: the two host-supplied collaborator seams
//! - [`Subscriptions`]: keyed out-of-band storage independent of dispatch
//! - [`platform`]: shared-handle glue binding navigation events to a shell,
//!   with an explicit disposal path
//!
//! Everything runs to completion synchronously on the calling thread; the
//! shell has no suspension points of its own.

#![forbid(unsafe_code)]

/// Bootstrap, dispatch engine and navigation
pub mod core;

/// Host event glue: shared shell handle and navigation binding
pub mod platform;

/// The reducer boundary seam
pub mod reducer;

/// The render collaborator seam
pub mod render;

/// Keyed out-of-band subscription storage
pub mod subscriptions;

pub use crate::core::AppShell;
pub use platform::{bind_navigation, shared, NavigationBinding, SharedShell};
pub use reducer::{ReduceInput, Reducer};
pub use render::Renderer;
pub use subscriptions::Subscriptions;

/// Convenient imports for hosts.
pub mod prelude {
    pub use crate::core::AppShell;
    pub use crate::platform::{bind_navigation, shared, NavigationBinding, SharedShell};
    pub use crate::reducer::{ReduceInput, Reducer};
    pub use crate::render::Renderer;
    pub use crate::subscriptions::Subscriptions;
    pub use trellis_core::{
        derive_route, Action, AppState, LocationSource, MemoryLocation, MemoryNavigator,
        NavigationEvents, Route, ShellError, SharedLocation, StateMap, INITIALIZING, LOADING,
        ROUTE_CHANGE,
    };
}
