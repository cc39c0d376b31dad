//! Domain event handler contracts.

use std::marker::PhantomData;

use async_trait::async_trait;
use domain::{DomainEvent, Result};
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;

/// Reacts to one domain event type, for example by updating a read model.
/// Any number of handlers may exist per event type.
#[async_trait]
pub trait DomainEventHandler<E: DomainEvent>: Send + Sync {
    async fn handle(&self, event: &E, cancel: &CancellationToken) -> Result;
}

/// Type-erased event handler, so handlers for different event types can be
/// stored together and invoked with a `&dyn DomainEvent`.
#[async_trait]
pub trait DynEventHandler: Send + Sync {
    /// Downcasts the event and forwards it to the typed handler.
    async fn handle_dyn(
        &self,
        event: &dyn DomainEvent,
        cancel: &CancellationToken,
    ) -> std::result::Result<Result, DispatchError>;

    /// Returns the handler type name for logs.
    fn handler_name(&self) -> &'static str;
}

/// Adapts a [`DomainEventHandler`] into a [`DynEventHandler`].
pub struct TypedEventHandler<E, H> {
    handler: H,
    _event: PhantomData<fn(&E)>,
}

impl<E, H> TypedEventHandler<E, H>
where
    E: DomainEvent,
    H: DomainEventHandler<E>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _event: PhantomData,
        }
    }
}

#[async_trait]
impl<E, H> DynEventHandler for TypedEventHandler<E, H>
where
    E: DomainEvent,
    H: DomainEventHandler<E>,
{
    async fn handle_dyn(
        &self,
        event: &dyn DomainEvent,
        cancel: &CancellationToken,
    ) -> std::result::Result<Result, DispatchError> {
        let Some(typed) = event.downcast_ref::<E>() else {
            return Err(DispatchError::EventTypeMismatch {
                handler: self.handler_name(),
                event_type: event.event_type(),
            });
        };
        Ok(self.handler.handle(typed, cancel).await)
    }

    fn handler_name(&self) -> &'static str {
        std::any::type_name::<H>()
    }
}
