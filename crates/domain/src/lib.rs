//! Domain layer of the shared kernel.
//!
//! This crate provides the building blocks every bounded context shares:
//! - [`Error`], [`ErrorCollection`] and the [`Result`] outcome type
//! - [`Entity`] identity semantics and [`EntityCore`]
//! - [`AggregateRoot`] with its [`DomainEventBuffer`]
//! - the [`DomainEvent`] contract

pub mod aggregate;
pub mod entity;
pub mod event;
pub mod results;

pub use aggregate::{AggregateRoot, DomainEventBuffer};
pub use common::{EntityId, EventId};
pub use entity::{AsAny, Entity, EntityCore, UpdatedBeforeCreated};
pub use event::{DomainEvent, EventMetadata};
pub use results::{
    Cause, EmptyErrorCollection, Error, ErrorCollection, ErrorKind, Result, ResultExt,
    ResultFutureExt, failure, success, success_unit,
};
