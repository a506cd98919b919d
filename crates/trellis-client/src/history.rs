//! Session history download

use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::transport::IterationTransport;

/// Upper bound on one history download page
pub const HISTORY_PAGE_LIMIT: u32 = 500;

/// Fetch one bounded page of a session's persisted messages and write them
/// as a pretty-printed JSON file. Returns the number of messages written.
pub async fn download_history(
    transport: &dyn IterationTransport,
    session_id: &str,
    path: &Path,
) -> Result<usize> {
    let messages = transport
        .fetch_messages(session_id, HISTORY_PAGE_LIMIT)
        .await?;

    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &messages)?;
    writer.flush()?;

    tracing::debug!(
        "wrote {} messages for session {} to {}",
        messages.len(),
        session_id,
        path.display()
    );
    Ok(messages.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::reconcile::{ChatMessage, Role};
    use crate::request::IterationRequest;
    use crate::transport::EventStream;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;
    use tokio_util::sync::CancellationToken;

    struct PagedTransport {
        rows: Vec<ChatMessage>,
        requested_limit: Mutex<Option<u32>>,
    }

    #[async_trait]
    impl IterationTransport for PagedTransport {
        async fn open_iteration(
            &self,
            _request: IterationRequest,
            _cancel: CancellationToken,
        ) -> Result<EventStream> {
            Ok(Box::pin(futures::stream::iter(vec![])))
        }

        async fn abort_session(&self, _session_id: &str) -> Result<()> {
            Ok(())
        }

        async fn fetch_messages(&self, _session_id: &str, limit: u32) -> Result<Vec<ChatMessage>> {
            *self.requested_limit.lock() = Some(limit);
            Ok(self.rows.clone())
        }
    }

    fn row(id: &str, content: &str) -> ChatMessage {
        ChatMessage {
            id: id.into(),
            session_id: Some("s-1".into()),
            role: Role::User,
            content: content.into(),
            metadata: serde_json::Value::Null,
            created_at: Utc.timestamp_opt(100, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_writes_bounded_page_as_json() {
        let transport = PagedTransport {
            rows: vec![row("m-1", "first"), row("m-2", "second")],
            requested_limit: Mutex::new(None),
        };
        let path = std::env::temp_dir().join(format!("trellis-history-{}.json", uuid::Uuid::new_v4()));

        let written = download_history(&transport, "s-1", &path).await.unwrap();
        assert_eq!(written, 2);
        assert_eq!(*transport.requested_limit.lock(), Some(HISTORY_PAGE_LIMIT));

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<ChatMessage> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id, "m-1");

        std::fs::remove_file(&path).ok();
    }
}
