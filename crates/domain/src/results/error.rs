//! Single failure values.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Category of a domain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input failed domain validation.
    Validation,

    /// The requested resource does not exist.
    NotFound,

    /// The caller is not allowed to perform the operation.
    Unauthorized,

    /// The operation conflicts with the current state.
    Conflict,

    /// An internal failure the caller cannot act on.
    Internal,

    /// An underlying fault reported as a domain failure.
    Exception,
}

impl ErrorKind {
    /// Returns the message the `*_default` factories attach to this kind.
    pub(crate) fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation failed.",
            ErrorKind::NotFound => "Resource not found.",
            ErrorKind::Unauthorized => "Access denied.",
            ErrorKind::Conflict => "Data conflict.",
            ErrorKind::Internal => "Internal server error.",
            ErrorKind::Exception => "An exception occurred.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "Validation",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Internal => "Internal",
            ErrorKind::Exception => "Exception",
        };
        f.write_str(name)
    }
}

/// Shared handle to the fault wrapped by an [`ErrorKind::Exception`] error.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// One domain failure: a kind, a human-readable message and, for
/// [`ErrorKind::Exception`] only, the underlying fault.
///
/// There is no public constructor; every error comes from one of the
/// per-kind factories, so kind, message and cause always agree.
#[derive(Clone, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[serde(skip)]
    #[source]
    cause: Option<Cause>,
}

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    fn with_default_message(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a validation error with the message `"Validation failed."`.
    pub fn validation_default() -> Self {
        Self::with_default_message(ErrorKind::Validation)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a not-found error with the message `"Resource not found."`.
    pub fn not_found_default() -> Self {
        Self::with_default_message(ErrorKind::NotFound)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Creates an unauthorized error with the message `"Access denied."`.
    pub fn unauthorized_default() -> Self {
        Self::with_default_message(ErrorKind::Unauthorized)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Creates a conflict error with the message `"Data conflict."`.
    pub fn conflict_default() -> Self {
        Self::with_default_message(ErrorKind::Conflict)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Creates an internal error with the message `"Internal server error."`.
    pub fn internal_default() -> Self {
        Self::with_default_message(ErrorKind::Internal)
    }

    /// Wraps an underlying fault using the default exception message.
    pub fn exception<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::exception_with_message(cause, ErrorKind::Exception.default_message())
    }

    /// Wraps an underlying fault with a caller-supplied message.
    pub fn exception_with_message<E>(cause: E, message: impl Into<String>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_shared_cause(Arc::new(cause), message)
    }

    /// Wraps a fault that is already shared, e.g. one kept by the caller too.
    pub fn from_shared_cause(cause: Cause, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Exception,
            message: message.into(),
            cause: Some(cause),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wrapped fault. Always `None` unless the kind is
    /// [`ErrorKind::Exception`].
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Error");
        debug.field("kind", &self.kind).field("message", &self.message);
        if let Some(cause) = &self.cause {
            debug.field("cause", &cause.to_string());
        }
        debug.finish()
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        self.kind == other.kind && self.message == other.message && same_cause
    }
}

impl Eq for Error {}
