//! Transport abstraction for reaching the agent orchestrator

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::reconcile::ChatMessage;
use crate::request::IterationRequest;
use trellis_wire::StreamEvent;

/// A stream of decoded events for one iteration
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Transport for one task's orchestrator traffic.
///
/// The production implementation is [`crate::OrchestratorClient`]; tests
/// substitute scripted transports.
#[async_trait]
pub trait IterationTransport: Send + Sync {
    /// Open one iteration's request and return its decoded event stream.
    /// A non-2xx response resolves to an error carrying the body text.
    async fn open_iteration(
        &self,
        request: IterationRequest,
        cancel: CancellationToken,
    ) -> Result<EventStream>;

    /// Best-effort server-side cancellation for a known session
    async fn abort_session(&self, session_id: &str) -> Result<()>;

    /// Fetch up to `limit` persisted messages for a session, oldest first
    async fn fetch_messages(&self, session_id: &str, limit: u32) -> Result<Vec<ChatMessage>>;
}

/// Retry policy for transport drops
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Fixed delay before re-opening the same iteration after a drop
    pub backoff: Duration,
    /// Iteration number at which clean-close-without-completion stops
    /// retrying and ends the task as incomplete
    pub quiet_drop_iteration_cap: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: Duration::from_secs(1),
            quiet_drop_iteration_cap: 3,
        }
    }
}
