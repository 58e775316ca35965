//! OpenAPI specification for the relay API

use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    models::{ChatRequest, ChatResponse, ChatTurn, Role, StreamChunk},
    routes::health::{HealthResponse, HealthStatus},
};

/// OpenAPI specification for Studio Relay
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studio Relay API",
        version = "1.0.0",
        description = "Chat relay forwarding conversations, with optional local document context, to OpenRouter"
    ),
    paths(
        crate::routes::chat::chat,
        crate::routes::chat::chat_stream,
        crate::routes::health::health_check
    ),
    components(
        schemas(
            Role,
            ChatTurn,
            ChatRequest,
            ChatResponse,
            StreamChunk,
            ErrorResponse,
            HealthStatus,
            HealthResponse,
        )
    ),
    tags(
        (name = "Chat", description = "Chat relay endpoints"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct RelayApiDoc;
