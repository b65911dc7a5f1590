//! Trellis Core - foundational types for the Trellis application shell
//!
//! This crate contains the pure, host-independent half of the shell:
//!
//! - [`AppState`]: the single insertion-ordered state container
//! - [`Action`]: descriptions of intended state transitions
//! - [`Route`] and [`derive_route`]: the structured view of the current
//!   navigation location (path segments, hash segments, query mapping)
//! - [`LocationSource`] / [`NavigationEvents`]: the ambient navigation seam,
//!   plus an in-memory reference implementation for headless hosts and tests
//! - [`ShellError`]: the unified error type
//!
//! Nothing here performs I/O or rendering; the dispatch engine that drives
//! these types lives in `trellis-app`.

#![forbid(unsafe_code)]

/// Actions consumed by the reducer boundary
pub mod action;

/// Unified error handling
pub mod errors;

/// Ambient navigation seam and in-memory implementation
pub mod location;

/// Route derivation from the current location
pub mod route;

/// The application state container
pub mod state;

pub use action::{Action, INITIALIZING, LOADING, ROUTE_CHANGE};
pub use errors::{BoxedError, ShellError};
pub use location::{
    ListenerId, LocationSource, MemoryLocation, MemoryNavigator, NavigationEventKind,
    NavigationEvents, NavigationListener, SharedLocation,
};
pub use route::{derive_route, QueryMap, Route};
pub use state::{canonical_json, AppState, StateMap, ROUTE_KEY};
