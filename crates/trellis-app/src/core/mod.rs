//! # Core shell
//!
//! Bootstrap, the dispatch engine and navigation handling. See
//! [`AppShell`] for the operation contracts.

mod shell;

pub use shell::AppShell;
