//! Routing of commands, queries and domain events to their handlers.

use std::any::type_name;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, ErrorCollection};
use futures_util::{StreamExt, stream};
use tokio_util::sync::CancellationToken;

use crate::command::Command;
use crate::config::DispatcherConfig;
use crate::error::{DispatchError, Dispatched};
use crate::event::DynEventHandler;
use crate::query::Query;
use crate::registry::HandlerResolver;

/// Sends a command to its single handler and returns the handler's result
/// unchanged.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    async fn dispatch_command<C: Command>(
        &self,
        command: C,
        cancel: &CancellationToken,
    ) -> Dispatched<C::Response>;
}

/// Sends a query to its single handler and returns the handler's result
/// unchanged.
#[async_trait]
pub trait QueryDispatcher: Send + Sync {
    async fn dispatch_query<Q: Query>(
        &self,
        query: Q,
        cancel: &CancellationToken,
    ) -> Dispatched<Q::Response>;
}

/// Fans domain events out to every handler registered for each event.
///
/// Every handler runs for every event. The result is a success only if all
/// invocations succeed; otherwise it carries the errors of every failing
/// invocation, ordered by event and then by handler.
#[async_trait]
pub trait DomainEventsDispatcher: Send + Sync {
    async fn dispatch_events(
        &self,
        events: &[Arc<dyn DomainEvent>],
        cancel: &CancellationToken,
    ) -> Dispatched;
}

/// Dispatcher backed by a [`HandlerResolver`].
///
/// Implements all three dispatch contracts. Dispatch is single-attempt;
/// there are no retries.
pub struct Dispatcher<R> {
    resolver: R,
    config: DispatcherConfig,
}

impl<R: HandlerResolver> Dispatcher<R> {
    pub fn new(resolver: R, config: DispatcherConfig) -> Self {
        Self { resolver, config }
    }

    /// Creates a dispatcher with [`DispatcherConfig::default`].
    pub fn with_defaults(resolver: R) -> Self {
        Self::new(resolver, DispatcherConfig::default())
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }
}

/// Polls `future` until it completes or `cancel` fires, whichever is first.
async fn run_cancellable<F: Future>(future: F, cancel: &CancellationToken) -> Option<F::Output> {
    if cancel.is_cancelled() {
        return None;
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        output = future => Some(output),
    }
}

fn trace_outcome<T>(message_type: &'static str, result: &domain::Result<T>) {
    match result {
        Ok(_) => tracing::debug!(message_type, "handler succeeded"),
        Err(errors) => tracing::debug!(
            message_type,
            error_count = errors.len(),
            %errors,
            "handler returned failure"
        ),
    }
}

#[async_trait]
impl<R: HandlerResolver> CommandDispatcher for Dispatcher<R> {
    #[tracing::instrument(skip_all, fields(command = type_name::<C>()))]
    async fn dispatch_command<C: Command>(
        &self,
        command: C,
        cancel: &CancellationToken,
    ) -> Dispatched<C::Response> {
        let command_type = type_name::<C>();
        let handler = self.resolver.command_handler::<C>().ok_or_else(|| {
            tracing::error!(command_type, "no command handler registered");
            DispatchError::CommandHandlerNotFound(command_type)
        })?;

        metrics::counter!("dispatcher_commands_total", "command" => command_type).increment(1);

        let result = run_cancellable(handler.handle(command, cancel), cancel)
            .await
            .ok_or(DispatchError::Cancelled {
                completed: 0,
                errors: None,
            })?;

        trace_outcome(command_type, &result);
        Ok(result)
    }
}

#[async_trait]
impl<R: HandlerResolver> QueryDispatcher for Dispatcher<R> {
    #[tracing::instrument(skip_all, fields(query = type_name::<Q>()))]
    async fn dispatch_query<Q: Query>(
        &self,
        query: Q,
        cancel: &CancellationToken,
    ) -> Dispatched<Q::Response> {
        let query_type = type_name::<Q>();
        let handler = self.resolver.query_handler::<Q>().ok_or_else(|| {
            tracing::error!(query_type, "no query handler registered");
            DispatchError::QueryHandlerNotFound(query_type)
        })?;

        metrics::counter!("dispatcher_queries_total", "query" => query_type).increment(1);

        let result = run_cancellable(handler.handle(query, cancel), cancel)
            .await
            .ok_or(DispatchError::Cancelled {
                completed: 0,
                errors: None,
            })?;

        trace_outcome(query_type, &result);
        Ok(result)
    }
}

#[async_trait]
impl<R: HandlerResolver> DomainEventsDispatcher for Dispatcher<R> {
    #[tracing::instrument(skip_all, fields(event_count = events.len()))]
    async fn dispatch_events(
        &self,
        events: &[Arc<dyn DomainEvent>],
        cancel: &CancellationToken,
    ) -> Dispatched {
        let invocations: Vec<(&dyn DomainEvent, Arc<dyn DynEventHandler>)> = events
            .iter()
            .flat_map(|event| {
                self.resolver
                    .event_handlers(event.concrete_type_id())
                    .into_iter()
                    .map(move |handler| (&**event, handler))
            })
            .collect();

        if invocations.is_empty() {
            tracing::debug!("no domain event handlers to invoke");
            return Ok(Ok(()));
        }

        // `buffered` yields outputs in input order, so error order does not
        // depend on which handler finishes first.
        let pending: Vec<_> = invocations
            .iter()
            .map(|(event, handler)| run_cancellable(handler.handle_dyn(*event, cancel), cancel))
            .collect();
        let outcomes: Vec<_> = stream::iter(pending)
            .buffered(self.config.max_concurrent_handlers.max(1))
            .collect()
            .await;

        let mut completed = 0;
        let mut cancelled = false;
        let mut collected: Option<ErrorCollection> = None;

        for (outcome, (event, handler)) in outcomes.into_iter().zip(&invocations) {
            let Some(outcome) = outcome else {
                cancelled = true;
                continue;
            };
            let result = outcome?;
            completed += 1;

            let event_type = event.event_type();
            metrics::counter!("dispatcher_event_handler_invocations_total", "event" => event_type)
                .increment(1);

            if let Err(errors) = result {
                metrics::counter!("dispatcher_event_handler_failures_total", "event" => event_type)
                    .increment(1);
                tracing::warn!(
                    event_type,
                    handler = handler.handler_name(),
                    %errors,
                    "domain event handler failed"
                );
                collected = Some(match collected {
                    Some(previous) => previous.concat(errors),
                    None => errors,
                });
            }
        }

        if cancelled {
            tracing::warn!(completed, "domain event dispatch cancelled");
            return Err(DispatchError::Cancelled {
                completed,
                errors: collected,
            });
        }

        tracing::debug!(invocations = completed, "domain events dispatched");
        Ok(collected.map_or(Ok(()), Err))
    }
}
