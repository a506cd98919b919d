//! Optimistic message reconciliation against the backend's realtime feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel prefix marking a locally-synthesized, not-yet-persisted id
pub const PENDING_ID_PREFIX: &str = "pending-";

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    System,
}

/// A chat message row. Backend-owned once persisted; the client only
/// synthesizes optimistic user rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub session_id: Option<String>,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Synthesize an optimistic user placeholder for just-submitted text
    pub fn optimistic(content: impl Into<String>) -> Self {
        Self {
            id: format!("{}{}", PENDING_ID_PREFIX, Uuid::new_v4()),
            session_id: None,
            role: Role::User,
            content: content.into(),
            metadata: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    /// Whether this row is a local placeholder awaiting backend round-trip
    pub fn is_pending(&self) -> bool {
        self.id.starts_with(PENDING_ID_PREFIX)
    }
}

/// Result of applying a refreshed authoritative list
#[derive(Debug, Default, PartialEq)]
pub struct RefreshOutcome {
    /// Placeholders retired by a matching authoritative row
    pub retired: usize,
    /// Newly-observed agent-authored rows (the live streaming buffer can be
    /// cleared once one lands)
    pub new_agent_rows: usize,
}

/// Blended view over authoritative rows and optimistic placeholders.
///
/// The displayed list is authoritative rows UNION still-unmatched
/// placeholders, sorted by timestamp; a placeholder is retired the instant
/// an authoritative row with the same role and content appears.
#[derive(Debug, Clone, Default)]
pub struct MessageView {
    authoritative: Vec<ChatMessage>,
    pending: Vec<ChatMessage>,
}

impl MessageView {
    /// Create an empty view
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an optimistic placeholder; returns its temporary id
    pub fn push_optimistic(&mut self, content: &str) -> String {
        let message = ChatMessage::optimistic(content);
        let id = message.id.clone();
        self.pending.push(message);
        id
    }

    /// Replace the authoritative list and retire matched placeholders.
    ///
    /// Matching is by exact role+content equality, never by id; system rows
    /// are excluded from both sides of the comparison.
    pub fn set_authoritative(&mut self, rows: Vec<ChatMessage>) -> RefreshOutcome {
        let new_agent_rows = rows
            .iter()
            .filter(|row| {
                row.role == Role::Agent && !self.authoritative.iter().any(|prev| prev.id == row.id)
            })
            .count();

        let before = self.pending.len();
        self.pending.retain(|placeholder| {
            placeholder.role == Role::System
                || !rows.iter().any(|row| {
                    row.role != Role::System
                        && row.role == placeholder.role
                        && row.content == placeholder.content
                })
        });
        let retired = before - self.pending.len();

        self.authoritative = rows;
        RefreshOutcome {
            retired,
            new_agent_rows,
        }
    }

    /// The rendered list: system rows filtered, timestamp ascending, stable
    /// on ties (placeholders keep their local insertion order).
    pub fn displayed(&self) -> Vec<ChatMessage> {
        let mut out: Vec<ChatMessage> = self
            .authoritative
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect();
        out.extend(self.pending.iter().filter(|m| m.role != Role::System).cloned());
        out.sort_by_key(|m| m.created_at);
        out
    }

    /// All stored rows, system messages included (storage is not filtered)
    pub fn stored(&self) -> impl Iterator<Item = &ChatMessage> {
        self.authoritative.iter().chain(self.pending.iter())
    }

    /// Capture the view for rollback
    pub fn snapshot(&self) -> MessageView {
        self.clone()
    }

    /// Roll back to a previously captured snapshot
    pub fn restore(&mut self, snapshot: MessageView) {
        *self = snapshot;
    }
}
