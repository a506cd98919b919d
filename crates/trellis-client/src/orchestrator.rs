//! Orchestrator HTTP client

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use tokio_stream::Stream;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::reconcile::ChatMessage;
use crate::request::IterationRequest;
use crate::transport::{EventStream, IterationTransport};
use trellis_wire::{FrameDecoder, StreamEvent};

/// HTTP client for the agent orchestrator and its REST surface
pub struct OrchestratorClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    api_key: String,
}

impl OrchestratorClient {
    /// Create a new client. `access_token` may be a user access token or a
    /// project share token; `api_key` is the platform API key.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            api_key: api_key.into(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            format!("Bearer {}", self.access_token).parse().unwrap(),
        );
        headers.insert("apikey", self.api_key.parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());
        headers
    }
}

#[async_trait]
impl IterationTransport for OrchestratorClient {
    async fn open_iteration(
        &self,
        request: IterationRequest,
        cancel: CancellationToken,
    ) -> Result<EventStream> {
        let url = format!("{}/functions/v1/agent-orchestrator", self.base_url);
        tracing::debug!("opening iteration {} against {}", request.iteration, url);

        let mut headers = self.headers();
        headers.insert("accept", "text/event-stream".parse().unwrap());

        let send = self.client.post(&url).headers(headers).json(&request).send();
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(Error::Transport("request cancelled".into()));
            }
            response = send => response?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Orchestrator {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Box::pin(decode_body(response, cancel)))
    }

    async fn abort_session(&self, session_id: &str) -> Result<()> {
        let url = format!("{}/functions/v1/agent-orchestrator/abort", self.base_url);
        let body = serde_json::json!({ "sessionId": session_id });
        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Orchestrator {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn fetch_messages(&self, session_id: &str, limit: u32) -> Result<Vec<ChatMessage>> {
        let url = format!("{}/rest/v1/chat_messages", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .query(&[
                ("session_id", format!("eq.{}", session_id)),
                ("order", "created_at.asc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Orchestrator {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

/// Adapt a streaming response body into decoded events.
///
/// Events are yielded strictly in arrival order; the decoder's truncation
/// tolerance keeps a mid-frame close from surfacing as corruption.
fn decode_body(
    response: reqwest::Response,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<StreamEvent>> + Send {
    stream! {
        let mut body = response.bytes_stream();
        let mut decoder = FrameDecoder::new();

        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => {
                    yield Err(Error::Transport("request cancelled".into()));
                    return;
                }
                chunk = body.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => match decoder.feed(&bytes) {
                    Ok(events) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    Err(e) => {
                        yield Err(e.into());
                        return;
                    }
                },
                Some(Err(e)) => {
                    yield Err(Error::Http(e));
                    return;
                }
                None => break,
            }
        }

        match decoder.finish() {
            Ok(Some(event)) => yield Ok(event),
            Ok(None) => {}
            Err(e) => yield Err(e.into()),
        }
    }
}
