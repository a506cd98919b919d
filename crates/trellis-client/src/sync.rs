//! Identity-preserving sync of backend resource rows

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A backend row that can be merged by id with allowlisted change detection.
///
/// `observed_eq` compares only the fixed allowlist of observable fields for
/// its type; anything else is ignored even when present on the row.
pub trait SyncRow {
    /// Stable row identifier
    fn id(&self) -> &str;
    /// Compare the allowlisted observable fields only
    fn observed_eq(&self, other: &Self) -> bool;
}

/// Merge a refetched snapshot into the current rows.
///
/// Rows whose observable fields did not change keep their previous `Arc`
/// (identity-equal downstream, so nothing re-renders); added, removed,
/// changed, or reordered rows produce a new list. Returns `None` when the
/// refresh is a full no-op, meaning zero state updates.
pub fn merge_rows<T: SyncRow>(current: &[Arc<T>], incoming: Vec<T>) -> Option<Vec<Arc<T>>> {
    let mut changed = incoming.len() != current.len();
    let mut merged = Vec::with_capacity(incoming.len());

    for (index, row) in incoming.into_iter().enumerate() {
        match current.iter().find(|prev| prev.id() == row.id()) {
            Some(prev) if prev.observed_eq(&row) => merged.push(Arc::clone(prev)),
            _ => {
                changed = true;
                merged.push(Arc::new(row));
            }
        }
        if !changed && current[index].id() != merged[index].id() {
            changed = true;
        }
    }

    changed.then_some(merged)
}

/// A provisioned application service row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub status: String,
    /// External-service identifier assigned by the cloud platform
    pub service_id: Option<String>,
    pub url: Option<String>,
    pub last_deployed_at: Option<DateTime<Utc>>,
    /// Display-only; outside the change-detection allowlist
    #[serde(default)]
    pub name: String,
    /// Bookkeeping; outside the change-detection allowlist
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SyncRow for Deployment {
    fn id(&self) -> &str {
        &self.id
    }

    // Allowlist: status, external-service id, url, last-deployed timestamp.
    fn observed_eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.service_id == other.service_id
            && self.url == other.url
            && self.last_deployed_at == other.last_deployed_at
    }
}

/// A provisioned database row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseResource {
    pub id: String,
    pub status: String,
    pub connection_id: Option<String>,
    pub host: Option<String>,
    /// Display-only; outside the change-detection allowlist
    #[serde(default)]
    pub region: String,
}

impl SyncRow for DatabaseResource {
    fn id(&self) -> &str {
        &self.id
    }

    // Allowlist: status, connection id, host.
    fn observed_eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.connection_id == other.connection_id
            && self.host == other.host
    }
}
