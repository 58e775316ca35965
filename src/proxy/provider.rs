//! Chat provider abstraction
//!
//! Defines the trait the routes use to reach the upstream chat completion
//! API, so tests and alternative backends can stand in for OpenRouter.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::error::AppResult;
use crate::models::ChatTurn;

/// Raw upstream body for streaming responses
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Result of a non-streaming completion
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Assistant reply text
    pub message: String,
    /// Model the upstream reports having used
    pub model: String,
}

/// Trait defining the interface for chat completion providers
///
/// # Security
///
/// Implementations authenticate with their own configured credential and
/// never forward client headers upstream.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Model identifier sent with every request
    fn model(&self) -> &str;

    /// Send `turns` and wait for the complete reply.
    async fn chat_completion(&self, turns: &[ChatTurn], temperature: f64) -> AppResult<Completion>;

    /// Send `turns` with streaming enabled and return the raw SSE body.
    ///
    /// Fails before yielding anything if the upstream rejects the request.
    async fn chat_completion_stream(
        &self,
        turns: &[ChatTurn],
        temperature: f64,
    ) -> AppResult<ByteStream>;
}
