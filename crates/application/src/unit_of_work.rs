//! Publishing an aggregate's pending events at the end of a unit of work.

use std::sync::Arc;

use domain::{AggregateRoot, DomainEvent};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::DomainEventsDispatcher;
use crate::error::Dispatched;

/// Dispatches the aggregate's pending events and clears them if every
/// handler succeeded.
///
/// On a failed or cancelled dispatch the events stay on the aggregate;
/// whether to retry or discard them is up to the caller.
#[tracing::instrument(skip_all, fields(aggregate_id = %aggregate.id()))]
pub async fn publish_domain_events<A, D>(
    aggregate: &mut A,
    dispatcher: &D,
    cancel: &CancellationToken,
) -> Dispatched
where
    A: AggregateRoot,
    D: DomainEventsDispatcher + ?Sized,
{
    let pending: Vec<Arc<dyn DomainEvent>> = aggregate.domain_events().to_vec();
    if pending.is_empty() {
        return Ok(Ok(()));
    }

    let outcome = dispatcher.dispatch_events(&pending, cancel).await?;
    if outcome.is_ok() {
        aggregate.clear_domain_events();
        tracing::debug!(published = pending.len(), "domain events published");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::error::DispatchError;
    use crate::event::DomainEventHandler;
    use crate::registry::InMemoryHandlerRegistry;
    use async_trait::async_trait;
    use domain::{
        DomainEventBuffer, Entity, EntityCore, EntityId, Error, EventMetadata, Result, ResultExt,
    };

    #[derive(Debug)]
    struct StockAdjusted {
        metadata: EventMetadata,
        delta: i64,
    }

    impl DomainEvent for StockAdjusted {
        fn metadata(&self) -> &EventMetadata {
            &self.metadata
        }
    }

    struct Product {
        core: EntityCore,
        stock: i64,
        events: DomainEventBuffer,
    }

    impl Product {
        fn new() -> Self {
            Self {
                core: EntityCore::new(EntityId::new()),
                stock: 0,
                events: DomainEventBuffer::new(),
            }
        }

        fn adjust(&mut self, delta: i64) {
            self.stock += delta;
            self.core.mark_as_updated();
            self.events.record(StockAdjusted {
                metadata: EventMetadata::new(),
                delta,
            });
        }
    }

    impl Entity for Product {
        fn core(&self) -> &EntityCore {
            &self.core
        }
    }

    impl AggregateRoot for Product {
        fn domain_events(&self) -> &[Arc<dyn DomainEvent>] {
            self.events.as_slice()
        }

        fn clear_domain_events(&mut self) {
            self.events.clear();
        }
    }

    struct RejectNegative;

    #[async_trait]
    impl DomainEventHandler<StockAdjusted> for RejectNegative {
        async fn handle(&self, event: &StockAdjusted, _cancel: &CancellationToken) -> Result {
            if event.delta < 0 {
                return Err(Error::conflict("stock cannot go down").into());
            }
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher<InMemoryHandlerRegistry> {
        let mut registry = InMemoryHandlerRegistry::new();
        registry.register_event_handler::<StockAdjusted, _>(RejectNegative);
        Dispatcher::with_defaults(registry)
    }

    #[tokio::test]
    async fn clears_events_after_successful_dispatch() {
        let mut product = Product::new();
        product.adjust(5);
        product.adjust(3);

        let outcome = publish_domain_events(&mut product, &dispatcher(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert!(product.domain_events().is_empty());
        assert_eq!(product.stock, 8);
    }

    #[tokio::test]
    async fn keeps_events_when_a_handler_fails() {
        let mut product = Product::new();
        product.adjust(5);
        product.adjust(-2);

        let outcome = publish_domain_events(&mut product, &dispatcher(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.errors().first().message(), "stock cannot go down");
        assert_eq!(product.domain_events().len(), 2);
    }

    #[tokio::test]
    async fn keeps_events_when_cancelled() {
        let mut product = Product::new();
        product.adjust(1);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = publish_domain_events(&mut product, &dispatcher(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(error, DispatchError::Cancelled { completed: 0, .. }));
        assert_eq!(product.domain_events().len(), 1);
    }

    #[tokio::test]
    async fn works_through_a_trait_object() {
        let mut product = Product::new();
        product.adjust(1);
        let dispatcher = dispatcher();
        let dispatcher: &dyn DomainEventsDispatcher = &dispatcher;

        let outcome = publish_domain_events(&mut product, dispatcher, &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.is_success());
    }
}
