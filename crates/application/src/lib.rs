//! Application layer of the shared kernel.
//!
//! This crate provides the dispatch side of command/query separation:
//! - [`Command`], [`Query`] and their handler traits
//! - [`DomainEventHandler`] for reacting to domain events
//! - [`HandlerResolver`] and the [`InMemoryHandlerRegistry`]
//! - [`Dispatcher`], implementing [`CommandDispatcher`], [`QueryDispatcher`]
//!   and [`DomainEventsDispatcher`]
//! - [`publish_domain_events`] for unit-of-work orchestrators
//! - configuration and tracing setup

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod query;
pub mod registry;
pub mod telemetry;
pub mod unit_of_work;

pub use command::{Command, CommandHandler};
pub use config::{DispatcherConfig, LogFormat};
pub use dispatcher::{CommandDispatcher, Dispatcher, DomainEventsDispatcher, QueryDispatcher};
pub use error::{DispatchError, Dispatched, RegistrationError};
pub use event::{DomainEventHandler, DynEventHandler, TypedEventHandler};
pub use query::{Query, QueryHandler};
pub use registry::{HandlerResolver, InMemoryHandlerRegistry};
pub use telemetry::init_tracing;
pub use tokio_util::sync::CancellationToken;
pub use unit_of_work::publish_domain_events;
