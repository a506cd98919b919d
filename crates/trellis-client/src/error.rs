//! Error types for trellis-client

use thiserror::Error;

/// Result type alias using trellis-client Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a task against the orchestrator
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The stream transport dropped mid-iteration
    #[error("stream transport dropped: {0}")]
    Transport(String),

    /// Orchestrator rejected the request with a non-2xx response
    #[error("orchestrator returned {status}: {body}")]
    Orchestrator { status: u16, body: String },

    /// Server-reported error event on the stream
    #[error("agent error: {0}")]
    Server(String),

    /// Stream frame decoding failed
    #[error(transparent)]
    Wire(#[from] trellis_wire::WireError),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error (history download)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic client error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Transport-level drops are retried in place by the iteration driver;
    /// everything else is fatal to the task submission.
    pub fn is_transport_drop(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Transport(_))
    }
}
