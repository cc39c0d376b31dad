//! Handler lookup keyed by message type.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use domain::DomainEvent;

use crate::command::{Command, CommandHandler};
use crate::error::RegistrationError;
use crate::event::{DomainEventHandler, DynEventHandler, TypedEventHandler};
use crate::query::{Query, QueryHandler};

/// Resolves the handler(s) registered for a message type.
///
/// Dispatchers depend only on this trait; containers and registries of any
/// kind can implement it. Results must be deterministic: the same type
/// always yields the same handlers in the same order.
pub trait HandlerResolver: Send + Sync {
    fn command_handler<C: Command>(&self) -> Option<Arc<dyn CommandHandler<C>>>;

    fn query_handler<Q: Query>(&self) -> Option<Arc<dyn QueryHandler<Q>>>;

    /// Returns the handlers for an event type in registration order; empty
    /// when none are registered.
    fn event_handlers(&self, event_type: TypeId) -> Vec<Arc<dyn DynEventHandler>>;
}

impl<R: HandlerResolver> HandlerResolver for Arc<R> {
    fn command_handler<C: Command>(&self) -> Option<Arc<dyn CommandHandler<C>>> {
        (**self).command_handler::<C>()
    }

    fn query_handler<Q: Query>(&self) -> Option<Arc<dyn QueryHandler<Q>>> {
        (**self).query_handler::<Q>()
    }

    fn event_handlers(&self, event_type: TypeId) -> Vec<Arc<dyn DynEventHandler>> {
        (**self).event_handlers(event_type)
    }
}

type AnyHandler = Arc<dyn Any + Send + Sync>;

/// In-memory [`HandlerResolver`] populated at startup.
#[derive(Default)]
pub struct InMemoryHandlerRegistry {
    commands: HashMap<TypeId, AnyHandler>,
    queries: HashMap<TypeId, AnyHandler>,
    events: HashMap<TypeId, Vec<Arc<dyn DynEventHandler>>>,
}

impl InMemoryHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for a command type.
    ///
    /// Fails if the command type already has a handler.
    pub fn register_command<C, H>(&mut self, handler: H) -> Result<(), RegistrationError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let key = TypeId::of::<C>();
        if self.commands.contains_key(&key) {
            return Err(RegistrationError::DuplicateCommandHandler(type_name::<C>()));
        }
        let handler: Arc<dyn CommandHandler<C>> = Arc::new(handler);
        self.commands.insert(key, Arc::new(handler));
        tracing::debug!(command = type_name::<C>(), "registered command handler");
        Ok(())
    }

    /// Registers the handler for a query type.
    ///
    /// Fails if the query type already has a handler.
    pub fn register_query<Q, H>(&mut self, handler: H) -> Result<(), RegistrationError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let key = TypeId::of::<Q>();
        if self.queries.contains_key(&key) {
            return Err(RegistrationError::DuplicateQueryHandler(type_name::<Q>()));
        }
        let handler: Arc<dyn QueryHandler<Q>> = Arc::new(handler);
        self.queries.insert(key, Arc::new(handler));
        tracing::debug!(query = type_name::<Q>(), "registered query handler");
        Ok(())
    }

    /// Adds a handler for an event type after any already registered.
    pub fn register_event_handler<E, H>(&mut self, handler: H)
    where
        E: DomainEvent,
        H: DomainEventHandler<E> + 'static,
    {
        self.events
            .entry(TypeId::of::<E>())
            .or_default()
            .push(Arc::new(TypedEventHandler::new(handler)));
        tracing::debug!(event = type_name::<E>(), "registered domain event handler");
    }

    /// Returns the number of handlers registered for an event type.
    pub fn event_handler_count<E: DomainEvent>(&self) -> usize {
        self.events.get(&TypeId::of::<E>()).map_or(0, Vec::len)
    }
}

impl HandlerResolver for InMemoryHandlerRegistry {
    fn command_handler<C: Command>(&self) -> Option<Arc<dyn CommandHandler<C>>> {
        self.commands
            .get(&TypeId::of::<C>())?
            .downcast_ref::<Arc<dyn CommandHandler<C>>>()
            .cloned()
    }

    fn query_handler<Q: Query>(&self) -> Option<Arc<dyn QueryHandler<Q>>> {
        self.queries
            .get(&TypeId::of::<Q>())?
            .downcast_ref::<Arc<dyn QueryHandler<Q>>>()
            .cloned()
    }

    fn event_handlers(&self, event_type: TypeId) -> Vec<Arc<dyn DynEventHandler>> {
        self.events.get(&event_type).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::{EventMetadata, Result};
    use tokio_util::sync::CancellationToken;

    struct Ping;

    impl Command for Ping {
        type Response = &'static str;
    }

    struct PingHandler;

    #[async_trait]
    impl CommandHandler<Ping> for PingHandler {
        async fn handle(&self, _command: Ping, _cancel: &CancellationToken) -> Result<&'static str> {
            Ok("pong")
        }
    }

    struct CountUsers;

    impl Query for CountUsers {
        type Response = u64;
    }

    struct CountUsersHandler(u64);

    #[async_trait]
    impl QueryHandler<CountUsers> for CountUsersHandler {
        async fn handle(&self, _query: CountUsers, _cancel: &CancellationToken) -> Result<u64> {
            Ok(self.0)
        }
    }

    #[derive(Debug)]
    struct Pinged {
        metadata: EventMetadata,
    }

    impl DomainEvent for Pinged {
        fn metadata(&self) -> &EventMetadata {
            &self.metadata
        }
    }

    struct NoopHandler;

    #[async_trait]
    impl DomainEventHandler<Pinged> for NoopHandler {
        async fn handle(&self, _event: &Pinged, _cancel: &CancellationToken) -> Result {
            Ok(())
        }
    }

    #[tokio::test]
    async fn resolves_registered_command_handler() {
        let mut registry = InMemoryHandlerRegistry::new();
        registry.register_command::<Ping, _>(PingHandler).unwrap();

        let handler = registry.command_handler::<Ping>().unwrap();
        let response = handler.handle(Ping, &CancellationToken::new()).await;

        assert_eq!(response.unwrap(), "pong");
    }

    #[test]
    fn duplicate_command_handler_is_rejected() {
        let mut registry = InMemoryHandlerRegistry::new();
        registry.register_command::<Ping, _>(PingHandler).unwrap();

        let error = registry.register_command::<Ping, _>(PingHandler).unwrap_err();

        assert!(matches!(error, RegistrationError::DuplicateCommandHandler(_)));
    }

    #[tokio::test]
    async fn resolves_registered_query_handler() {
        let mut registry = InMemoryHandlerRegistry::new();
        registry.register_query::<CountUsers, _>(CountUsersHandler(3)).unwrap();
        assert!(registry.register_query::<CountUsers, _>(CountUsersHandler(4)).is_err());

        let handler = registry.query_handler::<CountUsers>().unwrap();
        let count = handler.handle(CountUsers, &CancellationToken::new()).await;

        assert_eq!(count.unwrap(), 3);
    }

    #[test]
    fn unknown_types_resolve_to_nothing() {
        let registry = InMemoryHandlerRegistry::new();

        assert!(registry.command_handler::<Ping>().is_none());
        assert!(registry.query_handler::<CountUsers>().is_none());
        assert!(registry.event_handlers(TypeId::of::<Pinged>()).is_empty());
    }

    #[test]
    fn event_handlers_accumulate_in_registration_order() {
        let mut registry = InMemoryHandlerRegistry::new();
        registry.register_event_handler::<Pinged, _>(NoopHandler);
        registry.register_event_handler::<Pinged, _>(NoopHandler);

        assert_eq!(registry.event_handler_count::<Pinged>(), 2);
        assert_eq!(registry.event_handlers(TypeId::of::<Pinged>()).len(), 2);
    }

    #[test]
    fn arc_wrapped_registry_resolves_the_same_handlers() {
        let mut registry = InMemoryHandlerRegistry::new();
        registry.register_command::<Ping, _>(PingHandler).unwrap();
        let shared = Arc::new(registry);

        assert!(shared.command_handler::<Ping>().is_some());
    }
}
