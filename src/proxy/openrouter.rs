//! OpenRouter chat completion client
//!
//! Sends assembled conversations to OpenRouter's OpenAI-compatible
//! `/chat/completions` endpoint, either waiting for the full reply or
//! handing back the raw SSE body.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::headers::build_default_headers;
use super::provider::{ByteStream, ChatProvider, Completion};
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::ChatTurn,
};

/// Request body sent upstream
#[derive(Debug, Serialize)]
pub struct UpstreamRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatTurn],
    pub temperature: f64,
    pub stream: bool,
}

/// Non-streaming upstream response; only the fields the relay reads
#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<UpstreamChoice>,
}

#[derive(Debug, Deserialize)]
struct UpstreamChoice {
    #[serde(default)]
    message: Option<UpstreamMessage>,
}

#[derive(Debug, Deserialize)]
struct UpstreamMessage {
    #[serde(default)]
    content: Option<String>,
}

impl UpstreamResponse {
    fn into_completion(self, fallback_model: &str) -> AppResult<Completion> {
        let message = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::MalformedResponse("response has no choices".to_string()))?
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                AppError::MalformedResponse("choices[0].message.content is missing".to_string())
            })?;

        Ok(Completion {
            message,
            model: self.model.unwrap_or_else(|| fallback_model.to_string()),
        })
    }
}

/// OpenRouter API client
pub struct OpenRouterClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    headers: HeaderMap,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client from configuration
    pub fn new(client: reqwest::Client, config: &Config) -> AppResult<Self> {
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.openrouter_api_url),
            model: config.model.clone(),
            headers: build_default_headers(
                &config.openrouter_api_key,
                &config.referer,
                &config.app_title,
            )?,
        })
    }

    /// POST the payload and fail on any non-2xx status
    async fn post(&self, turns: &[ChatTurn], temperature: f64, stream: bool) -> AppResult<reqwest::Response> {
        let payload = UpstreamRequest {
            model: &self.model,
            messages: turns,
            temperature,
            stream,
        };

        debug!(
            url = %self.endpoint,
            turns = turns.len(),
            stream = stream,
            "Sending request to OpenRouter"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.endpoint, error = %e, "Failed to send request to OpenRouter");
                e
            })?;

        let status = response.status();
        debug!(url = %self.endpoint, status = %status, "Received response from OpenRouter");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "OpenRouter returned {}: {}",
                status,
                text.trim()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, turns), fields(model = %self.model))]
    async fn chat_completion(&self, turns: &[ChatTurn], temperature: f64) -> AppResult<Completion> {
        let response = self.post(turns, temperature, false).await?;
        let body = response.bytes().await?;

        let parsed: UpstreamResponse = serde_json::from_slice(&body)
            .map_err(|e| AppError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        parsed.into_completion(&self.model)
    }

    #[instrument(skip(self, turns), fields(model = %self.model))]
    async fn chat_completion_stream(
        &self,
        turns: &[ChatTurn],
        temperature: f64,
    ) -> AppResult<ByteStream> {
        let response = self.post(turns, temperature, true).await?;
        Ok(Box::pin(response.bytes_stream()))
    }
}
