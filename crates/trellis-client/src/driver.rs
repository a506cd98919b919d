//! Iteration driver: the per-task state machine

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::events::{TaskEvent, TaskOutcome};
use crate::handle::TaskHandle;
use crate::request::{IterationRequest, ProjectRef, TaskSubmission};
use crate::transport::{EventStream, IterationTransport, RetryPolicy};
use trellis_wire::{StreamEvent, extract_reasoning};

/// Server status string meaning the loop should continue
const IN_PROGRESS: &str = "in_progress";

/// Driver configuration
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Upper bound on iterations per task submission
    pub max_iterations: u32,
    /// Transport-drop retry policy
    pub retry: RetryPolicy,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            retry: RetryPolicy::default(),
        }
    }
}

/// Live view-state for the in-flight streamed message
#[derive(Debug, Clone, Default)]
pub struct StreamingMessage {
    /// Accumulated raw deltas
    pub content: String,
    /// Whether an iteration currently has an open stream
    pub is_streaming: bool,
}

/// Externally-visible state of one task submission.
///
/// All cross-iteration state is owned here by the driver instance; nothing
/// lives in ambient mutable cells.
#[derive(Debug, Clone, Default)]
pub struct TaskState {
    /// Iteration currently being driven, starting at 1
    pub current_iteration: u32,
    /// Session reference; replaced, never merged, by each
    /// `session_created` / `iteration_complete` event
    pub current_session_id: Option<String>,
    /// Last server-reported status
    pub status: String,
    /// Live streamed content
    pub streaming: StreamingMessage,
    /// Running character count reported by the server
    pub chars_received: u64,
    /// Name of the backend operation in flight, if any
    pub current_operation: Option<String>,
}

/// Drives one task submission across sequential orchestrator iterations.
///
/// Iterations never overlap: a new request opens only after the previous
/// stream has fully closed, retried, or been aborted.
pub struct TaskDriver {
    config: DriverConfig,
    transport: Arc<dyn IterationTransport>,
    state: TaskState,
    event_tx: broadcast::Sender<TaskEvent>,
    handle: TaskHandle,
}

/// Decision taken after one iteration's stream settles
enum NextStep {
    /// Transient drop: back off and re-open the same iteration number
    RetrySameIteration(&'static str),
    /// Clean `iteration_complete` with `in_progress`: move to the next
    AdvanceIteration,
    /// Terminal state reached
    Finish(TaskOutcome),
    /// Fatal error to surface
    Fail(Error),
}

/// Retry/failure policy for one settled iteration. A requested stop always
/// wins over the retry path, regardless of how the stream ended.
fn next_step(
    stop_requested: bool,
    received_complete: bool,
    read: std::result::Result<(), Error>,
    status: &str,
    iteration: u32,
    quiet_cap: u32,
) -> NextStep {
    match read {
        Err(err) => {
            if stop_requested {
                return NextStep::Finish(TaskOutcome::Cancelled);
            }
            if received_complete {
                // Late exception after completion is extraneous noise we
                // must not retry over.
                return NextStep::Fail(err);
            }
            if err.is_transport_drop() && status == IN_PROGRESS {
                return NextStep::RetrySameIteration("stream transport dropped");
            }
            NextStep::Fail(err)
        }
        Ok(()) if received_complete => {
            if status == IN_PROGRESS {
                NextStep::AdvanceIteration
            } else {
                NextStep::Finish(TaskOutcome::Completed {
                    status: status.to_string(),
                })
            }
        }
        Ok(()) => {
            if stop_requested {
                return NextStep::Finish(TaskOutcome::Cancelled);
            }
            if status == IN_PROGRESS {
                if iteration >= quiet_cap {
                    return NextStep::Finish(TaskOutcome::Incomplete);
                }
                return NextStep::RetrySameIteration("stream closed before iteration_complete");
            }
            NextStep::Finish(TaskOutcome::Completed {
                status: status.to_string(),
            })
        }
    }
}

impl TaskDriver {
    /// Create a new driver over the given transport
    pub fn new(config: DriverConfig, transport: Arc<dyn IterationTransport>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            config,
            transport,
            state: TaskState::default(),
            event_tx,
            handle: TaskHandle::new(),
        }
    }

    /// Subscribe to driver events
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.event_tx.subscribe()
    }

    /// Get the current task state
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Get a cloneable handle for stopping the task from external code
    pub fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }

    /// Request a stop of the running task
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Clear the live streaming buffer (a persisted agent message arrived)
    pub fn clear_streaming(&mut self) {
        self.state.streaming = StreamingMessage::default();
    }

    /// Run one task submission to a terminal state.
    ///
    /// The full context is sent on iteration 1 only; every later iteration
    /// carries just the session reference.
    pub async fn run(
        &mut self,
        scope: &ProjectRef,
        submission: &TaskSubmission,
    ) -> Result<TaskOutcome> {
        self.handle.begin();
        self.state = TaskState {
            current_iteration: 1,
            status: IN_PROGRESS.to_string(),
            ..Default::default()
        };
        let _ = self.event_tx.send(TaskEvent::TaskStart);

        let result = loop {
            if self.handle.stop_requested() {
                break Ok(TaskOutcome::Cancelled);
            }
            if self.state.current_iteration > self.config.max_iterations {
                break Ok(TaskOutcome::Exhausted);
            }

            let iteration = self.state.current_iteration;
            let request = if iteration == 1 {
                IterationRequest::first(scope, submission, self.config.max_iterations)
            } else {
                IterationRequest::follow_up(
                    scope,
                    self.state.current_session_id.clone(),
                    iteration,
                    self.config.max_iterations,
                )
            };

            let _ = self.event_tx.send(TaskEvent::IterationStart { iteration });
            let cancel = self.handle.fresh_token();

            let (received_complete, read) =
                match self.transport.open_iteration(request, cancel).await {
                    Ok(stream) => {
                        // The streaming buffer lives for exactly one open
                        // stream; a retry starts over.
                        self.state.streaming = StreamingMessage {
                            content: String::new(),
                            is_streaming: true,
                        };
                        self.state.chars_received = 0;
                        let read = self.drive_stream(stream).await;
                        self.state.streaming.is_streaming = false;
                        read
                    }
                    Err(e) => (false, Err(e)),
                };

            match next_step(
                self.handle.stop_requested(),
                received_complete,
                read,
                &self.state.status,
                iteration,
                self.config.retry.quiet_drop_iteration_cap,
            ) {
                NextStep::RetrySameIteration(reason) => self.retry_pause(reason).await,
                NextStep::AdvanceIteration => self.state.current_iteration += 1,
                NextStep::Finish(outcome) => break Ok(outcome),
                NextStep::Fail(err) => break Err(err),
            }
        };

        // The streaming buffer does not outlive the driver run.
        self.state.streaming = StreamingMessage::default();
        self.state.current_operation = None;

        if matches!(result, Ok(TaskOutcome::Cancelled)) {
            self.notify_server_abort();
        }

        match &result {
            Ok(outcome) => {
                let _ = self.event_tx.send(TaskEvent::TaskEnd {
                    outcome: outcome.clone(),
                });
            }
            Err(e) => {
                let _ = self.event_tx.send(TaskEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        self.handle.finish();
        result
    }

    /// Read one iteration's stream to its end, dispatching events in strict
    /// arrival order. Returns whether `iteration_complete` was seen and how
    /// the read ended.
    async fn drive_stream(&mut self, mut stream: EventStream) -> (bool, Result<()>) {
        let mut received_complete = false;

        while let Some(item) = stream.next().await {
            let event = match item {
                Ok(event) => event,
                Err(e) => return (received_complete, Err(e)),
            };

            match event {
                StreamEvent::SessionCreated { session_id } => {
                    self.state.current_session_id = Some(session_id.clone());
                    let _ = self.event_tx.send(TaskEvent::SessionCreated { session_id });
                }
                StreamEvent::LlmStreaming {
                    delta,
                    chars_received,
                } => {
                    self.state.streaming.content.push_str(&delta);
                    if chars_received > self.state.chars_received {
                        self.state.chars_received = chars_received;
                    }
                    let _ = self.event_tx.send(TaskEvent::Reasoning {
                        text: extract_reasoning(&self.state.streaming.content),
                        chars_received: self.state.chars_received,
                    });
                }
                StreamEvent::OperationStart { operation } => {
                    self.state.current_operation = Some(operation.clone());
                    let _ = self.event_tx.send(TaskEvent::OperationStart { operation });
                }
                StreamEvent::OperationComplete => {
                    self.state.current_operation = None;
                    let _ = self.event_tx.send(TaskEvent::OperationComplete);
                }
                StreamEvent::IterationComplete { status, session_id } => {
                    self.state.status = status.clone();
                    // Session reference is replaced, never merged.
                    self.state.current_session_id = Some(session_id);
                    received_complete = true;
                    let _ = self.event_tx.send(TaskEvent::IterationEnd {
                        iteration: self.state.current_iteration,
                        status,
                    });
                    // Normal end of this iteration; stop reading.
                    break;
                }
                StreamEvent::Error { error } => {
                    return (received_complete, Err(Error::Server(error)));
                }
            }
        }

        (received_complete, Ok(()))
    }

    /// Emit a non-fatal warning and wait out the backoff. The sleep is
    /// cancellable so a stop during backoff does not linger.
    async fn retry_pause(&self, reason: &str) {
        let iteration = self.state.current_iteration;
        tracing::warn!(
            "iteration {}: {}; retrying in {:?}",
            iteration,
            reason,
            self.config.retry.backoff
        );
        let _ = self.event_tx.send(TaskEvent::RetryingIteration {
            iteration,
            reason: reason.to_string(),
        });

        let cancel = self.handle.cancel.lock().clone();
        tokio::select! {
            _ = tokio::time::sleep(self.config.retry.backoff) => {}
            _ = cancel.cancelled() => {}
        }
    }

    /// Fire-and-forget server-side cancellation; local cleanup never blocks
    /// on its outcome.
    fn notify_server_abort(&self) {
        if let Some(session_id) = self.state.current_session_id.clone() {
            let transport = Arc::clone(&self.transport);
            tokio::spawn(async move {
                if let Err(e) = transport.abort_session(&session_id).await {
                    tracing::warn!("server-side abort for session {} failed: {}", session_id, e);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::ChatMessage;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    enum Script {
        Events(Vec<Result<StreamEvent>>),
        FailOpen(Error),
    }

    #[derive(Default)]
    struct ScriptedTransport {
        scripts: Mutex<Vec<Script>>,
        requests: Mutex<Vec<IterationRequest>>,
        aborts: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(scripts: Vec<Script>) -> Arc<Self> {
            Arc::new(Self {
                scripts: Mutex::new(scripts),
                ..Default::default()
            })
        }
    }

    #[async_trait]
    impl IterationTransport for ScriptedTransport {
        async fn open_iteration(
            &self,
            request: IterationRequest,
            _cancel: CancellationToken,
        ) -> Result<EventStream> {
            self.requests.lock().push(request);
            let script = {
                let mut scripts = self.scripts.lock();
                if scripts.is_empty() {
                    Script::Events(vec![])
                } else {
                    scripts.remove(0)
                }
            };
            match script {
                Script::FailOpen(e) => Err(e),
                Script::Events(items) => Ok(Box::pin(futures::stream::iter(items))),
            }
        }

        async fn abort_session(&self, session_id: &str) -> Result<()> {
            self.aborts.lock().push(session_id.to_string());
            Ok(())
        }

        async fn fetch_messages(&self, _session_id: &str, _limit: u32) -> Result<Vec<ChatMessage>> {
            Ok(vec![])
        }
    }

    fn fast_driver(transport: Arc<dyn IterationTransport>) -> TaskDriver {
        TaskDriver::new(
            DriverConfig {
                max_iterations: 5,
                retry: RetryPolicy {
                    backoff: Duration::from_millis(1),
                    quiet_drop_iteration_cap: 3,
                },
            },
            transport,
        )
    }

    fn session(id: &str) -> Result<StreamEvent> {
        Ok(StreamEvent::SessionCreated {
            session_id: id.into(),
        })
    }

    fn delta(text: &str) -> Result<StreamEvent> {
        Ok(StreamEvent::LlmStreaming {
            delta: text.into(),
            chars_received: 0,
        })
    }

    fn complete(status: &str, session: &str) -> Result<StreamEvent> {
        Ok(StreamEvent::IterationComplete {
            status: status.into(),
            session_id: session.into(),
        })
    }

    fn scope() -> ProjectRef {
        ProjectRef {
            project_id: "p-1".into(),
            ..Default::default()
        }
    }

    fn submission() -> TaskSubmission {
        TaskSubmission {
            task_description: "add users table".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_completes_across_iterations() {
        let transport = ScriptedTransport::new(vec![
            Script::Events(vec![
                session("s-1"),
                delta("working"),
                complete("in_progress", "s-1"),
            ]),
            Script::Events(vec![complete("completed", "s-1")]),
        ]);
        let mut driver = fast_driver(transport.clone());

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert_eq!(
            outcome,
            TaskOutcome::Completed {
                status: "completed".into()
            }
        );

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 2);
        // Full context on iteration 1 only.
        assert_eq!(requests[0].iteration, 1);
        assert!(requests[0].task_description.is_some());
        assert!(requests[0].session_id.is_none());
        assert_eq!(requests[1].iteration, 2);
        assert!(requests[1].task_description.is_none());
        assert_eq!(requests[1].session_id.as_deref(), Some("s-1"));
    }

    #[tokio::test]
    async fn test_transport_drop_retries_same_iteration() {
        // Drops twice, succeeds on the third attempt at the same iteration.
        let transport = ScriptedTransport::new(vec![
            Script::Events(vec![
                session("s-1"),
                Err(Error::Transport("connection reset".into())),
            ]),
            Script::Events(vec![Err(Error::Transport("connection reset".into()))]),
            Script::Events(vec![session("s-1"), complete("completed", "s-1")]),
        ]);
        let mut driver = fast_driver(transport.clone());

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert_eq!(
            outcome,
            TaskOutcome::Completed {
                status: "completed".into()
            }
        );

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.iteration == 1));
    }

    #[tokio::test]
    async fn test_clean_close_retries_below_cap() {
        let transport = ScriptedTransport::new(vec![
            // Clean close without iteration_complete at iteration 1.
            Script::Events(vec![session("s-1")]),
            Script::Events(vec![complete("completed", "s-1")]),
        ]);
        let mut driver = fast_driver(transport.clone());

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert!(outcome.is_success());
        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.iteration == 1));
    }

    #[tokio::test]
    async fn test_quiet_drop_cap_ends_incomplete() {
        let transport = ScriptedTransport::new(vec![
            Script::Events(vec![complete("in_progress", "s-1")]),
            Script::Events(vec![complete("in_progress", "s-1")]),
            // Iteration 3 closes clean without a completion signal.
            Script::Events(vec![session("s-1")]),
        ]);
        let mut driver = fast_driver(transport.clone());

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert_eq!(outcome, TaskOutcome::Incomplete);
        assert_eq!(transport.requests.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_error_event_is_fatal_without_retry() {
        let transport = ScriptedTransport::new(vec![Script::Events(vec![
            session("s-1"),
            Ok(StreamEvent::Error {
                error: "agent failed to plan".into(),
            }),
        ])]);
        let mut driver = fast_driver(transport.clone());

        let err = driver.run(&scope(), &submission()).await.unwrap_err();
        assert!(matches!(err, Error::Server(_)));
        assert_eq!(transport.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_non_2xx_is_fatal_without_retry() {
        let transport = ScriptedTransport::new(vec![Script::FailOpen(Error::Orchestrator {
            status: 503,
            body: "over capacity".into(),
        })]);
        let mut driver = fast_driver(transport.clone());

        let err = driver.run(&scope(), &submission()).await.unwrap_err();
        assert!(matches!(err, Error::Orchestrator { status: 503, .. }));
        assert_eq!(transport.requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_outcome() {
        let transport = ScriptedTransport::new(vec![
            Script::Events(vec![complete("in_progress", "s-1")]),
            Script::Events(vec![complete("in_progress", "s-1")]),
        ]);
        let mut driver = TaskDriver::new(
            DriverConfig {
                max_iterations: 2,
                retry: RetryPolicy {
                    backoff: Duration::from_millis(1),
                    quiet_drop_iteration_cap: 3,
                },
            },
            transport.clone(),
        );

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert_eq!(outcome, TaskOutcome::Exhausted);
        assert_eq!(transport.requests.lock().len(), 2);
    }

    /// Transport that requests a stop while the stream is failing, modeling
    /// a user stop racing a transport drop.
    struct StopDuringDropTransport {
        handle: Mutex<Option<TaskHandle>>,
        requests: Mutex<u32>,
    }

    #[async_trait]
    impl IterationTransport for StopDuringDropTransport {
        async fn open_iteration(
            &self,
            _request: IterationRequest,
            _cancel: CancellationToken,
        ) -> Result<EventStream> {
            *self.requests.lock() += 1;
            if let Some(handle) = self.handle.lock().take() {
                handle.stop();
            }
            Err(Error::Transport("connection reset".into()))
        }

        async fn abort_session(&self, _session_id: &str) -> Result<()> {
            Ok(())
        }

        async fn fetch_messages(&self, _session_id: &str, _limit: u32) -> Result<Vec<ChatMessage>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_stop_during_drop_cancels_instead_of_retrying() {
        let transport = Arc::new(StopDuringDropTransport {
            handle: Mutex::new(None),
            requests: Mutex::new(0),
        });
        let mut driver = fast_driver(transport.clone());
        *transport.handle.lock() = Some(driver.handle());

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert_eq!(outcome, TaskOutcome::Cancelled);
        assert_eq!(*transport.requests.lock(), 1, "retry path must not run");
    }

    /// Transport whose stream stops the task after the session is known.
    struct StopMidStreamTransport {
        handle: Mutex<Option<TaskHandle>>,
        aborts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl IterationTransport for StopMidStreamTransport {
        async fn open_iteration(
            &self,
            _request: IterationRequest,
            _cancel: CancellationToken,
        ) -> Result<EventStream> {
            let handle = self.handle.lock().take();
            Ok(Box::pin(async_stream::stream! {
                yield Ok(StreamEvent::SessionCreated { session_id: "s-9".into() });
                if let Some(handle) = handle {
                    handle.stop();
                }
                yield Err(Error::Transport("connection reset".into()));
            }))
        }

        async fn abort_session(&self, session_id: &str) -> Result<()> {
            self.aborts.lock().push(session_id.to_string());
            Ok(())
        }

        async fn fetch_messages(&self, _session_id: &str, _limit: u32) -> Result<Vec<ChatMessage>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_cancel_notifies_server_abort() {
        let transport = Arc::new(StopMidStreamTransport {
            handle: Mutex::new(None),
            aborts: Mutex::new(vec![]),
        });
        let mut driver = fast_driver(transport.clone());
        *transport.handle.lock() = Some(driver.handle());

        let outcome = driver.run(&scope(), &submission()).await.unwrap();
        assert_eq!(outcome, TaskOutcome::Cancelled);

        // The abort notification is spawned; give it a chance to run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(transport.aborts.lock().as_slice(), ["s-9"]);
    }

    #[tokio::test]
    async fn test_streaming_buffer_cleared_on_terminal() {
        let transport = ScriptedTransport::new(vec![Script::Events(vec![
            session("s-1"),
            delta("{\"reasoning\":\"thinking"),
            complete("completed", "s-1"),
        ])]);
        let mut driver = fast_driver(transport);

        driver.run(&scope(), &submission()).await.unwrap();
        assert!(driver.state().streaming.content.is_empty());
        assert!(!driver.state().streaming.is_streaming);
        assert!(driver.state().current_operation.is_none());
    }

    #[tokio::test]
    async fn test_reasoning_events_carry_extracted_text() {
        let transport = ScriptedTransport::new(vec![Script::Events(vec![
            session("s-1"),
            delta("{\"reasoning\":\"hel"),
            delta("lo\"}"),
            complete("completed", "s-1"),
        ])]);
        let mut driver = fast_driver(transport);
        let mut events = driver.subscribe();

        driver.run(&scope(), &submission()).await.unwrap();

        let mut reasoning = vec![];
        while let Ok(event) = events.try_recv() {
            if let TaskEvent::Reasoning { text, .. } = event {
                reasoning.push(text);
            }
        }
        assert_eq!(reasoning, vec!["hel".to_string(), "hello".to_string()]);
    }

    // ---- next_step policy matrix ----

    fn drop_err() -> Error {
        Error::Transport("connection reset".into())
    }

    #[test]
    fn test_next_step_stop_beats_retry() {
        let step = next_step(true, false, Err(drop_err()), IN_PROGRESS, 1, 3);
        assert!(matches!(step, NextStep::Finish(TaskOutcome::Cancelled)));
    }

    #[test]
    fn test_next_step_drop_retries_in_place() {
        let step = next_step(false, false, Err(drop_err()), IN_PROGRESS, 1, 3);
        assert!(matches!(step, NextStep::RetrySameIteration(_)));
    }

    #[test]
    fn test_next_step_late_error_after_complete_is_fatal() {
        let step = next_step(false, true, Err(drop_err()), IN_PROGRESS, 1, 3);
        assert!(matches!(step, NextStep::Fail(_)));
    }

    #[test]
    fn test_next_step_server_error_is_fatal() {
        let step = next_step(
            false,
            false,
            Err(Error::Server("agent failed".into())),
            IN_PROGRESS,
            1,
            3,
        );
        assert!(matches!(step, NextStep::Fail(_)));
    }

    #[test]
    fn test_next_step_drop_with_terminal_status_is_fatal() {
        let step = next_step(false, false, Err(drop_err()), "completed", 1, 3);
        assert!(matches!(step, NextStep::Fail(_)));
    }

    #[test]
    fn test_next_step_advance_on_in_progress_complete() {
        let step = next_step(false, true, Ok(()), IN_PROGRESS, 1, 3);
        assert!(matches!(step, NextStep::AdvanceIteration));
    }

    #[test]
    fn test_next_step_finish_on_terminal_complete() {
        let step = next_step(false, true, Ok(()), "failed", 1, 3);
        assert!(
            matches!(step, NextStep::Finish(TaskOutcome::Completed { status }) if status == "failed")
        );
    }

    #[test]
    fn test_next_step_quiet_close_caps_at_iteration_three() {
        let retry = next_step(false, false, Ok(()), IN_PROGRESS, 2, 3);
        assert!(matches!(retry, NextStep::RetrySameIteration(_)));
        let capped = next_step(false, false, Ok(()), IN_PROGRESS, 3, 3);
        assert!(matches!(capped, NextStep::Finish(TaskOutcome::Incomplete)));
    }
}
