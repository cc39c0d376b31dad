//! Ordered, non-empty collections of errors.

use std::fmt;

use serde::Serialize;
use thiserror::Error as ThisError;

use super::error::{Error, ErrorKind};

/// Returned when an [`ErrorCollection`] is built from no errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("an error collection requires at least one error")]
pub struct EmptyErrorCollection;

/// Immutable, insertion-ordered set of one or more [`Error`]s.
///
/// The errors are copied into the collection when it is built, so later
/// changes to the source sequence are never observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorCollection(Vec<Error>);

impl ErrorCollection {
    /// Creates a collection holding a single error.
    pub fn new(error: Error) -> Self {
        Self(vec![error])
    }

    /// Creates a collection from any sequence of errors.
    ///
    /// Fails when the sequence is empty.
    pub fn try_new(errors: impl IntoIterator<Item = Error>) -> Result<Self, EmptyErrorCollection> {
        let errors: Vec<Error> = errors.into_iter().collect();
        if errors.is_empty() {
            return Err(EmptyErrorCollection);
        }
        Ok(Self(errors))
    }

    /// Appends every error of `other` after the errors of `self`.
    pub fn concat(mut self, other: ErrorCollection) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Returns the number of errors. Never zero.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; provided for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first error in insertion order.
    pub fn first(&self) -> &Error {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Error] {
        &self.0
    }

    /// Returns true if any error has the given kind.
    pub fn contains_kind(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|error| error.kind() == kind)
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.0
    }
}

impl From<Error> for ErrorCollection {
    fn from(error: Error) -> Self {
        Self::new(error)
    }
}

impl TryFrom<Vec<Error>> for ErrorCollection {
    type Error = EmptyErrorCollection;

    fn try_from(errors: Vec<Error>) -> Result<Self, Self::Error> {
        Self::try_new(errors)
    }
}

impl TryFrom<&[Error]> for ErrorCollection {
    type Error = EmptyErrorCollection;

    fn try_from(errors: &[Error]) -> Result<Self, Self::Error> {
        Self::try_new(errors.iter().cloned())
    }
}

impl IntoIterator for ErrorCollection {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.kind(), error.message())?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorCollection {}
