//! Incremental decoder for the orchestrator's `data: {json}` SSE frames

use crate::error::{Result, WireError};
use crate::event::StreamEvent;

/// Incremental frame decoder.
///
/// Bytes are buffered until a newline completes a line; the trailing
/// fragment is never parsed early, so chunk boundaries (including ones that
/// split a UTF-8 sequence) cannot change the decoded event sequence. Lines
/// without the `data: ` prefix are SSE comments/keep-alives and are dropped.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one network chunk, returning the events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<StreamEvent>> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(event) = decode_line(&line[..line.len() - 1])? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Drain the final unterminated line after the stream closes.
    ///
    /// A stream that closes mid-frame leaves a truncated JSON payload here;
    /// that is the expected shutdown noise and is swallowed, while a
    /// structurally invalid completed payload still fails.
    pub fn finish(mut self) -> Result<Option<StreamEvent>> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        let line = std::mem::take(&mut self.buf);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Result<Option<StreamEvent>> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim_end_matches('\r');

    let Some(payload) = text.strip_prefix("data: ") else {
        return Ok(None);
    };

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        // The stream closed mid-frame; the partial tail is not an error.
        Err(e) if e.is_eof() => return Ok(None),
        Err(e) => return Err(WireError::MalformedFrame(e.to_string())),
    };

    match serde_json::from_value::<StreamEvent>(value) {
        Ok(event) => Ok(Some(event)),
        Err(e) => {
            tracing::debug!("skipping unrecognized stream event: {}", e);
            Ok(None)
        }
    }
}
