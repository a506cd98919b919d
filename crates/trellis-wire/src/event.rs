//! Stream event vocabulary for the orchestrator protocol

use serde::{Deserialize, Serialize};

/// Events emitted by the orchestrator over one iteration's SSE stream.
///
/// Payload field names are camelCase on the wire; the `type` tag is
/// snake_case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum StreamEvent {
    /// Backend assigned a session id on the first iteration
    SessionCreated { session_id: String },
    /// A token delta from the model, with a running character count
    LlmStreaming {
        delta: String,
        #[serde(default)]
        chars_received: u64,
    },
    /// A named backend operation started
    OperationStart { operation: String },
    /// The in-flight backend operation finished
    OperationComplete,
    /// The iteration finished; `status` decides whether the loop continues
    IterationComplete { status: String, session_id: String },
    /// Server-reported error; fatal to the task submission
    Error { error: String },
}

impl StreamEvent {
    /// Check if this event ends the current iteration's stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::IterationComplete { .. } | StreamEvent::Error { .. }
        )
    }
}
