//! Query contracts.

use async_trait::async_trait;
use domain::Result;
use tokio_util::sync::CancellationToken;

/// A request to read state. Queries always produce a typed response and
/// must not change domain state.
pub trait Query: Send + Sync + 'static {
    type Response: Send + 'static;
}

/// Answers one query type. Exactly one handler is registered per query.
#[async_trait]
pub trait QueryHandler<Q: Query>: Send + Sync {
    async fn handle(&self, query: Q, cancel: &CancellationToken) -> Result<Q::Response>;
}
