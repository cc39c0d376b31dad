//! The two-state outcome type and its folding helpers.

use std::future::Future;

use super::collection::ErrorCollection;

/// Outcome of a domain operation: `Ok` carries the value, `Err` a non-empty
/// [`ErrorCollection`]. Use `Result` (with `T = ()`) for operations that
/// produce nothing besides success.
pub type Result<T = ()> = std::result::Result<T, ErrorCollection>;

/// Creates a successful result carrying `value`.
pub fn success<T>(value: T) -> Result<T> {
    Ok(value)
}

/// Creates a successful result with no value.
pub fn success_unit() -> Result {
    Ok(())
}

/// Creates a failed result from one error or a whole collection.
pub fn failure<T>(errors: impl Into<ErrorCollection>) -> Result<T> {
    Err(errors.into())
}

/// Accessors and folding for [`Result`].
///
/// `value` and `errors` treat access to the wrong state as a bug in the
/// caller and panic. Use [`ResultExt::fold`] to branch without that risk.
pub trait ResultExt<T> {
    fn is_success(&self) -> bool;

    fn is_failure(&self) -> bool;

    /// Returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if the result is a failure.
    fn value(&self) -> &T;

    /// Consumes the result and returns the success value.
    ///
    /// # Panics
    ///
    /// Panics if the result is a failure.
    fn into_value(self) -> T;

    /// Returns the errors of a failed result.
    ///
    /// # Panics
    ///
    /// Panics if the result is a success.
    fn errors(&self) -> &ErrorCollection;

    /// Runs exactly one of the two branches and returns its output.
    fn fold<U, S, F>(self, on_success: S, on_failure: F) -> U
    where
        S: FnOnce(T) -> U,
        F: FnOnce(ErrorCollection) -> U;
}

impl<T> ResultExt<T> for Result<T> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }

    fn is_failure(&self) -> bool {
        self.is_err()
    }

    #[track_caller]
    fn value(&self) -> &T {
        match self {
            Ok(value) => value,
            Err(errors) => panic!("cannot access the value of a failed result: {errors}"),
        }
    }

    #[track_caller]
    fn into_value(self) -> T {
        match self {
            Ok(value) => value,
            Err(errors) => panic!("cannot access the value of a failed result: {errors}"),
        }
    }

    #[track_caller]
    fn errors(&self) -> &ErrorCollection {
        match self {
            Ok(_) => panic!("cannot access the errors of a successful result"),
            Err(errors) => errors,
        }
    }

    fn fold<U, S, F>(self, on_success: S, on_failure: F) -> U
    where
        S: FnOnce(T) -> U,
        F: FnOnce(ErrorCollection) -> U,
    {
        match self {
            Ok(value) => on_success(value),
            Err(errors) => on_failure(errors),
        }
    }
}

/// Folding over a future that resolves to a [`Result`].
pub trait ResultFutureExt<T>: Future<Output = Result<T>> + Sized {
    /// Awaits the result, then runs exactly one of the two branches.
    fn fold_async<U, S, F>(self, on_success: S, on_failure: F) -> impl Future<Output = U>
    where
        S: FnOnce(T) -> U,
        F: FnOnce(ErrorCollection) -> U,
    {
        async move { self.await.fold(on_success, on_failure) }
    }
}

impl<T, Fut> ResultFutureExt<T> for Fut where Fut: Future<Output = Result<T>> {}
