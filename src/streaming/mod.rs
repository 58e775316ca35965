//! SSE relay
//!
//! Turns the upstream OpenAI-style SSE body into the relay's own event
//! stream: one `{"content": ...}` frame per non-empty delta, a final
//! `{"content": "[DONE]"}` frame on normal completion, or a single
//! `{"error": ...}` frame if the upstream call fails at any point.

mod line_buffer;

use std::convert::Infallible;
use std::future::Future;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

pub use line_buffer::SseLineBuffer;

use crate::error::AppResult;
use crate::models::{StreamChunk, STREAM_DONE};
use crate::proxy::{ByteStream, RequestContext};

const DATA_PREFIX: &str = "data: ";

/// Lifecycle of one relayed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    Connecting,
    Streaming,
    Completed,
    Failed,
}

impl RelayPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayPhase::Connecting => "connecting",
            RelayPhase::Streaming => "streaming",
            RelayPhase::Completed => "completed",
            RelayPhase::Failed => "failed",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamChunk {
    #[serde(default)]
    choices: Vec<UpstreamStreamChoice>,
}

#[derive(Debug, Deserialize)]
struct UpstreamStreamChoice {
    #[serde(default)]
    delta: Option<UpstreamDelta>,
}

#[derive(Debug, Deserialize)]
struct UpstreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the delta text carried by one upstream SSE line.
///
/// Returns `None` for blank lines, the upstream `[DONE]` marker, lines that
/// are not valid JSON, and chunks without non-empty delta content.
pub fn decode_line(line: &str) -> Option<String> {
    let payload = line.strip_prefix(DATA_PREFIX).unwrap_or(line);
    if payload.is_empty() || payload == STREAM_DONE {
        return None;
    }

    let chunk: UpstreamChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            debug!(error = %e, line_len = payload.len(), "Skipping unparseable SSE line");
            return None;
        }
    };

    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty())
}

/// Format a chunk as one SSE event: `data: {json}\n\n`
pub fn format_sse_event(chunk: &StreamChunk) -> Bytes {
    // Serializing a two-variant enum of strings cannot fail
    let json = serde_json::to_string(chunk).unwrap_or_else(|_| "{}".to_string());
    Bytes::from(format!("data: {}\n\n", json))
}

/// Relay an upstream stream as outbound SSE frames.
///
/// `connect` performs the upstream call; it is only polled once the
/// returned stream is, so a client that never reads never triggers it.
/// Dropping the returned stream drops the upstream body and closes the
/// connection.
pub fn relay_stream<F>(
    connect: F,
    ctx: RequestContext,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    F: Future<Output = AppResult<ByteStream>> + Send + 'static,
{
    async_stream::stream! {
        let mut phase = RelayPhase::Connecting;
        debug!(trace_id = %ctx.trace_id, phase = phase.as_str(), "Relay phase");

        let mut upstream = match connect.await {
            Ok(upstream) => upstream,
            Err(e) => {
                phase = RelayPhase::Failed;
                ctx.log_error(e.kind(), &e.to_string());
                yield Ok(format_sse_event(&StreamChunk::error(e.to_string())));
                ctx.log_stream_ended(0, phase.as_str());
                return;
            }
        };

        phase = RelayPhase::Streaming;
        debug!(trace_id = %ctx.trace_id, phase = phase.as_str(), "Relay phase");

        let mut buffer = SseLineBuffer::new();
        let mut chunks = 0usize;

        while let Some(item) = upstream.next().await {
            match item {
                Ok(bytes) => {
                    for line in buffer.feed(&bytes) {
                        if let Some(content) = decode_line(&line) {
                            chunks += 1;
                            yield Ok(format_sse_event(&StreamChunk::content(content)));
                        }
                    }
                }
                Err(e) => {
                    phase = RelayPhase::Failed;
                    warn!(trace_id = %ctx.trace_id, error = %e, "Upstream stream error");
                    ctx.log_error("upstream", &e.to_string());
                    yield Ok(format_sse_event(&StreamChunk::error(format!("API request failed: {}", e))));
                    ctx.log_stream_ended(chunks, phase.as_str());
                    return;
                }
            }
        }

        if buffer.has_incomplete() {
            debug!(trace_id = %ctx.trace_id, "Upstream closed mid-line, flushing remainder");
        }
        if let Some(line) = buffer.finish() {
            if let Some(content) = decode_line(&line) {
                chunks += 1;
                yield Ok(format_sse_event(&StreamChunk::content(content)));
            }
        }

        phase = RelayPhase::Completed;
        yield Ok(format_sse_event(&StreamChunk::done()));
        ctx.log_stream_ended(chunks, phase.as_str());
    }
}
