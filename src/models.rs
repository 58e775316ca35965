//! Request and response schemas for the relay API
//!
//! Defaults for optional request fields are applied here, at the boundary,
//! so handlers always see a fully populated request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// System prompt used when the client does not send one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Sampling temperature used when the client does not send one
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
/// Content of the final frame of a successful stream
pub const STREAM_DONE: &str = "[DONE]";

/// Conversation role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

/// Body of `POST /api/chat` and `POST /api/chat/stream`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    #[serde(default)]
    pub messages: Vec<ChatTurn>,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Paths of local documents to inject as context
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Body of a successful `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub message: String,
    pub model: String,
}

/// Payload of one outbound SSE frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StreamChunk {
    Content { content: String },
    Error { error: String },
}

impl StreamChunk {
    pub fn content(content: impl Into<String>) -> Self {
        StreamChunk::Content {
            content: content.into(),
        }
    }

    pub fn done() -> Self {
        Self::content(STREAM_DONE)
    }

    pub fn error(message: impl Into<String>) -> Self {
        StreamChunk::Error {
            error: message.into(),
        }
    }
}
