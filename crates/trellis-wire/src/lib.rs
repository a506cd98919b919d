//! trellis-wire: Orchestrator stream protocol layer
//!
//! This crate provides the wire vocabulary shared between the agent
//! orchestrator and its clients: the tagged stream event types, an
//! incremental decoder for `data: {json}` SSE frames, and the best-effort
//! reasoning extractor for partially-streamed JSON payloads.

pub mod decoder;
pub mod error;
pub mod event;
pub mod extract;

pub use decoder::FrameDecoder;
pub use error::{Result, WireError};
pub use event::StreamEvent;
pub use extract::extract_reasoning;
