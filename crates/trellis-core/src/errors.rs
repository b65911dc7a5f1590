//! Unified error type for the Trellis shell.
//!
//! The error surface is deliberately small: the only failure the shell
//! surfaces is a reducer failure, which propagates uncaught to whichever
//! operation invoked the reducer. Query-string parse failures degrade to an
//! absent mapping and unknown subscription keys return `None`; neither is an
//! error.

use thiserror::Error;

/// Boxed host error carried as a source.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the shell.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShellError {
    /// The host reducer failed while computing a candidate state.
    #[error("reducer failed: {source}")]
    Reducer {
        /// The host-supplied failure.
        #[source]
        source: BoxedError,
    },
}

impl ShellError {
    /// Wrap a host reducer failure.
    pub fn reducer(source: impl Into<BoxedError>) -> Self {
        Self::Reducer {
            source: source.into(),
        }
    }
}
