//! Structured request logging
//!
//! Gives every relayed chat request a short correlation ID so the inbound
//! request, the upstream call and the stream lifecycle can be tied together
//! in the logs.

use std::time::Instant;

use tracing::{debug, error, info, Span};
use uuid::Uuid;

/// Context for tracking a relayed request through the system
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Short unique identifier for log correlation
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Provider handling this request
    pub provider: &'static str,
    /// Relay endpoint that received the request
    pub endpoint: &'static str,
    /// Model requested upstream
    pub model: String,
    /// Whether this is a streaming request
    pub streaming: bool,
}

impl RequestContext {
    pub fn new(provider: &'static str, endpoint: &'static str, model: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4().simple().to_string()[..8].to_string(),
            start_time: Instant::now(),
            provider,
            endpoint,
            model: model.into(),
            streaming: false,
        }
    }

    /// Mark this as a streaming request
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn log_request_start(&self, turns: usize, documents: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = %self.model,
            streaming = %self.streaming,
            turns = turns,
            documents = documents,
            "Chat request started"
        );
    }

    pub fn log_messages_assembled(&self, system_chars: usize) {
        debug!(
            trace_id = %self.trace_id,
            system_chars = system_chars,
            elapsed_ms = %self.elapsed_ms(),
            "Messages assembled"
        );
    }

    pub fn log_request_complete(&self, reply_chars: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = %self.model,
            reply_chars = reply_chars,
            elapsed_ms = %self.elapsed_ms(),
            "Chat request completed"
        );
    }

    pub fn log_stream_ended(&self, chunks: usize, outcome: &str) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            chunks = chunks,
            outcome = %outcome,
            elapsed_ms = %self.elapsed_ms(),
            "Streaming response ended"
        );
    }

    pub fn log_error(&self, kind: &str, error: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = %self.model,
            streaming = %self.streaming,
            kind = %kind,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Chat request failed"
        );
    }

    /// Span wrapping the upstream call
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            streaming = %self.streaming,
        )
    }
}
