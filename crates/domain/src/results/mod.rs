//! Result and error model shared by every layer.

mod collection;
mod error;
mod outcome;

pub use collection::{EmptyErrorCollection, ErrorCollection};
pub use error::{Cause, Error, ErrorKind};
pub use outcome::{Result, ResultExt, ResultFutureExt, failure, success, success_unit};
