//! Dispatch error types.
//!
//! These are wiring and cancellation conditions. Business failures travel
//! inside [`domain::Result`] and never appear here.

use domain::ErrorCollection;
use thiserror::Error;

/// Fatal conditions raised while routing a message to its handler(s).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler is registered for the command type.
    #[error("No handler registered for command {0}")]
    CommandHandlerNotFound(&'static str),

    /// No handler is registered for the query type.
    #[error("No handler registered for query {0}")]
    QueryHandlerNotFound(&'static str),

    /// The resolver returned an event handler for a different event type.
    #[error("Event handler {handler} cannot handle event {event_type}")]
    EventTypeMismatch {
        handler: &'static str,
        event_type: &'static str,
    },

    /// The cancellation token fired before every handler completed.
    ///
    /// `errors` holds the failures of the invocations that did complete.
    #[error("Dispatch cancelled after {completed} completed handler invocation(s)")]
    Cancelled {
        completed: usize,
        errors: Option<ErrorCollection>,
    },
}

/// Errors raised while registering handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("A handler is already registered for command {0}")]
    DuplicateCommandHandler(&'static str),

    #[error("A handler is already registered for query {0}")]
    DuplicateQueryHandler(&'static str),
}

/// Outcome of a dispatch: the outer error is fatal, the inner result is the
/// domain outcome produced by the handler(s).
pub type Dispatched<T = ()> = std::result::Result<domain::Result<T>, DispatchError>;
