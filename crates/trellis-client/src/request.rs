//! Task submission and iteration request bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifiers scoping a task run to a project and optional database
#[derive(Debug, Clone, Default)]
pub struct ProjectRef {
    pub project_id: String,
    pub database_id: Option<String>,
    pub connection_id: Option<String>,
    pub share_token: Option<String>,
}

/// Ephemeral, per-user-action submission payload. Sent only on iteration 1;
/// later iterations rely on the server retaining context keyed by session.
#[derive(Debug, Clone, Default)]
pub struct TaskSubmission {
    pub task_description: String,
    pub schema_context: Vec<SchemaContext>,
    pub attached_context: Option<ProjectContext>,
    pub expose_project: bool,
}

/// One database schema snapshot included with iteration 1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaContext {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Value>,
    #[serde(default)]
    pub views: Vec<Value>,
    #[serde(default)]
    pub functions: Vec<Value>,
}

/// Project-wide context bundle attached to iteration 1. The sections are
/// opaque to this client; the orchestrator interprets them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub project_metadata: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standards: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stacks: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_nodes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_edges: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_sessions: Option<Value>,
}

/// Wire body for one iteration request.
///
/// Iteration 1 carries the full submission context; every later iteration
/// carries only the session reference. The asymmetry is a protocol
/// contract: the orchestrator retains context server-side keyed by session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRequest {
    pub project_id: String,
    pub database_id: Option<String>,
    pub connection_id: Option<String>,
    pub share_token: Option<String>,
    pub session_id: Option<String>,
    pub iteration: u32,
    pub max_iterations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expose_project: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_context: Option<Vec<SchemaContext>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_context: Option<ProjectContext>,
}

impl IterationRequest {
    /// Iteration-1 body carrying the full submission context
    pub fn first(scope: &ProjectRef, submission: &TaskSubmission, max_iterations: u32) -> Self {
        Self {
            project_id: scope.project_id.clone(),
            database_id: scope.database_id.clone(),
            connection_id: scope.connection_id.clone(),
            share_token: scope.share_token.clone(),
            session_id: None,
            iteration: 1,
            max_iterations,
            task_description: Some(submission.task_description.clone()),
            expose_project: Some(submission.expose_project),
            schema_context: Some(submission.schema_context.clone()),
            project_context: submission.attached_context.clone(),
        }
    }

    /// Follow-up body for iteration 2+; context stays server-side
    pub fn follow_up(
        scope: &ProjectRef,
        session_id: Option<String>,
        iteration: u32,
        max_iterations: u32,
    ) -> Self {
        Self {
            project_id: scope.project_id.clone(),
            database_id: scope.database_id.clone(),
            connection_id: scope.connection_id.clone(),
            share_token: scope.share_token.clone(),
            session_id,
            iteration,
            max_iterations,
            task_description: None,
            expose_project: None,
            schema_context: None,
            project_context: None,
        }
    }
}
