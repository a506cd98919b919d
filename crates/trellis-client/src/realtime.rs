//! Realtime change-notification plumbing
//!
//! The backend's per-project realtime feed is a trigger, not a delta
//! stream: every notice means "refetch and recompute", and the reconciler
//! or resource sync does the rest.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A row-level change notification from the per-project subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeNotice {
    /// Table the change landed on (chat messages, deployments, databases)
    pub table: String,
    pub project_id: String,
}

/// A subscription delivering change notices until it closes
#[async_trait]
pub trait RealtimeChannel: Send {
    async fn recv(&mut self) -> Option<ChangeNotice>;
}

/// mpsc-backed channel used by embedding callers and tests
pub struct MpscChannel {
    rx: mpsc::Receiver<ChangeNotice>,
}

/// Create a realtime channel pair
pub fn channel(capacity: usize) -> (mpsc::Sender<ChangeNotice>, MpscChannel) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, MpscChannel { rx })
}

#[async_trait]
impl RealtimeChannel for MpscChannel {
    async fn recv(&mut self) -> Option<ChangeNotice> {
        self.rx.recv().await
    }
}

/// Drive refetches from a realtime subscription until it closes
pub async fn pump<C, F, Fut>(mut channel: C, mut refetch: F)
where
    C: RealtimeChannel,
    F: FnMut(ChangeNotice) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(notice) = channel.recv().await {
        tracing::debug!("realtime change on {}", notice.table);
        refetch(notice).await;
    }
}
