//! Error types for trellis-wire

use thiserror::Error;

/// Result type alias using trellis-wire WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Errors that can occur while decoding the orchestrator stream
#[derive(Error, Debug)]
pub enum WireError {
    /// A completed `data:` line contained structurally invalid JSON
    #[error("malformed stream frame: {0}")]
    MalformedFrame(String),
}
