//! trellis-client: Agent orchestrator client
//!
//! This crate drives multi-iteration agent tasks against the orchestrator:
//! the HTTP+SSE transport, the iteration driver state machine, optimistic
//! message reconciliation, and realtime resource sync.

pub mod driver;
pub mod error;
pub mod events;
pub mod handle;
pub mod history;
pub mod orchestrator;
pub mod realtime;
pub mod reconcile;
pub mod request;
pub mod session;
pub mod sync;
pub mod transport;

pub use driver::{DriverConfig, TaskDriver, TaskState};
pub use error::{Error, Result};
pub use events::{TaskEvent, TaskOutcome};
pub use handle::TaskHandle;
pub use orchestrator::OrchestratorClient;
pub use reconcile::{ChatMessage, MessageView, Role};
pub use request::{IterationRequest, ProjectRef, TaskSubmission};
pub use session::{RefreshHooks, TaskSession};
pub use transport::{EventStream, IterationTransport, RetryPolicy};
