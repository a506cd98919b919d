//! Task-submission boundary: message view + driver + completion hooks

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::driver::{DriverConfig, TaskDriver, TaskState};
use crate::error::Result;
use crate::events::{TaskEvent, TaskOutcome};
use crate::handle::TaskHandle;
use crate::reconcile::{ChatMessage, MessageView, RefreshOutcome};
use crate::request::{ProjectRef, TaskSubmission};
use crate::transport::IterationTransport;

/// Refresh callbacks fired after a successful task: the agent may have
/// mutated backend-owned resources while it worked.
#[derive(Clone, Default)]
pub struct RefreshHooks {
    pub on_schema_refresh: Option<Arc<dyn Fn() + Send + Sync>>,
    pub on_migration_refresh: Option<Arc<dyn Fn() + Send + Sync>>,
}

/// One project's agent chat surface: the blended message view plus the
/// iteration driver, tied together at the submission boundary.
pub struct TaskSession {
    driver: TaskDriver,
    view: MessageView,
    hooks: RefreshHooks,
}

impl TaskSession {
    /// Create a session over the given transport
    pub fn new(
        config: DriverConfig,
        transport: Arc<dyn IterationTransport>,
        hooks: RefreshHooks,
    ) -> Self {
        Self {
            driver: TaskDriver::new(config, transport),
            view: MessageView::new(),
            hooks,
        }
    }

    /// Subscribe to driver events
    pub fn subscribe(&self) -> broadcast::Receiver<TaskEvent> {
        self.driver.subscribe()
    }

    /// Handle for stopping the in-flight task
    pub fn handle(&self) -> TaskHandle {
        self.driver.handle()
    }

    /// Current driver state
    pub fn state(&self) -> &TaskState {
        self.driver.state()
    }

    /// The blended message view
    pub fn view(&self) -> &MessageView {
        &self.view
    }

    /// Submit a task: show the optimistic placeholder immediately, drive
    /// the iterations, and on fatal failure roll the view back so no
    /// phantom message lingers. Cancellation keeps the placeholder; the
    /// message did go out.
    pub async fn submit(
        &mut self,
        scope: &ProjectRef,
        submission: TaskSubmission,
    ) -> Result<TaskOutcome> {
        let snapshot = self.view.snapshot();
        self.view.push_optimistic(&submission.task_description);

        match self.driver.run(scope, &submission).await {
            Ok(outcome) => {
                if outcome.is_success() {
                    if let Some(hook) = &self.hooks.on_schema_refresh {
                        hook();
                    }
                    if let Some(hook) = &self.hooks.on_migration_refresh {
                        hook();
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                self.view.restore(snapshot);
                Err(e)
            }
        }
    }

    /// Apply a refreshed authoritative message list (realtime trigger or
    /// poll). Clears the live streaming buffer once a persisted agent row
    /// lands.
    pub fn apply_messages(&mut self, rows: Vec<ChatMessage>) -> RefreshOutcome {
        let outcome = self.view.set_authoritative(rows);
        if outcome.new_agent_rows > 0 {
            self.driver.clear_streaming();
        }
        outcome
    }
}
