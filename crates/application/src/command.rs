//! Command contracts.

use async_trait::async_trait;
use domain::Result;
use tokio_util::sync::CancellationToken;

/// An intention to change domain state.
///
/// Commands that only report success or failure use `Response = ()`.
pub trait Command: Send + Sync + 'static {
    /// The value produced on success.
    type Response: Send + 'static;
}

/// Executes one command type. Exactly one handler is registered per command.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, command: C, cancel: &CancellationToken) -> Result<C::Response>;
}
