//! Driver event types

use serde::{Deserialize, Serialize};

/// Terminal states of one task submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The server declared a terminal status (`completed`, `failed`, ...)
    Completed { status: String },
    /// User-initiated stop; informational, not a failure
    Cancelled,
    /// Iteration cap reached while the server still reported `in_progress`
    Exhausted,
    /// The stream kept closing without a completion signal; the session may
    /// be incomplete on the server side
    Incomplete,
}

impl TaskOutcome {
    /// Whether the server finished the task successfully
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Completed { status } if status == "completed")
    }
}

/// Events emitted while a task submission runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskEvent {
    /// The driver started processing a submission
    TaskStart,

    /// A new iteration request is being opened
    IterationStart { iteration: u32 },

    /// The backend assigned a session id
    SessionCreated { session_id: String },

    /// Live reasoning text extracted from the token stream
    Reasoning { text: String, chars_received: u64 },

    /// A named backend operation started
    OperationStart { operation: String },

    /// The in-flight backend operation finished
    OperationComplete,

    /// An iteration finished with the given server status
    IterationEnd { iteration: u32, status: String },

    /// A transport drop is being retried at the same iteration number
    RetryingIteration { iteration: u32, reason: String },

    /// The driver reached a terminal state
    TaskEnd { outcome: TaskOutcome },

    /// A fatal error ended the submission
    Error { message: String },
}

impl TaskEvent {
    /// Check if this is a terminal event
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskEvent::TaskEnd { .. } | TaskEvent::Error { .. })
    }
}
