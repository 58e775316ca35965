//! Chat endpoints
//!
//! `POST /api/chat` returns the whole reply as JSON; `POST /api/chat/stream`
//! relays it token by token as server-sent events.

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::Instrument;

use crate::{
    documents::{self, AssemblyOptions},
    error::{AppError, ErrorResponse},
    models::{ChatRequest, ChatResponse, ChatTurn, StreamChunk},
    proxy::RequestContext,
    streaming::{format_sse_event, relay_stream},
    AppState,
};

/// Parse a request body, applying field defaults
fn parse_request(body: &[u8]) -> Result<ChatRequest, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Run the message assembler for a parsed request
async fn assemble_turns(state: &AppState, request: &ChatRequest) -> Vec<ChatTurn> {
    documents::assemble(
        &request.messages,
        &request.system_prompt,
        &request.documents,
        AssemblyOptions {
            char_budget: state.config.context_char_budget,
            document_root: state.config.document_root.as_deref(),
        },
    )
    .await
}

fn sse_response(body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        body,
    )
        .into_response()
}

/// Handle a non-streaming chat request
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Chat",
    description = "Returns the whole assistant reply. A body that is not a valid chat request is rejected with 400 before any upstream call; upstream and internal failures answer 500.",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Request body is not a valid chat request", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let provider = state.chat_provider.clone();
    let ctx = RequestContext::new(provider.name(), "/api/chat", provider.model());

    let request = parse_request(&body).map_err(|e| {
        ctx.log_error(e.kind(), &e.to_string());
        e
    })?;
    ctx.log_request_start(request.messages.len(), request.documents.len());

    let turns = assemble_turns(&state, &request).await;
    ctx.log_messages_assembled(turns[0].content.chars().count());

    let completion = provider
        .chat_completion(&turns, request.temperature)
        .instrument(ctx.create_span())
        .await
        .map_err(|e| {
            ctx.log_error(e.kind(), &e.to_string());
            e
        })?;

    ctx.log_request_complete(completion.message.chars().count());

    Ok(Json(ChatResponse {
        message: completion.message,
        model: completion.model,
    }))
}

/// Handle a streaming chat request
///
/// Always answers 200 with an event stream; failures arrive as a single
/// `{"error": ...}` frame.
#[utoipa::path(
    post,
    path = "/api/chat/stream",
    tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "SSE stream of `data: {\"content\": ...}` frames ending with `[DONE]`, or one `data: {\"error\": ...}` frame",
         body = StreamChunk, content_type = "text/event-stream")
    )
)]
pub async fn chat_stream(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let provider = state.chat_provider.clone();
    let ctx = RequestContext::new(provider.name(), "/api/chat/stream", provider.model())
        .with_streaming(true);

    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => {
            ctx.log_error(e.kind(), &e.to_string());
            let frame = format_sse_event(&StreamChunk::error(e.to_string()));
            return sse_response(Body::from(frame));
        }
    };
    ctx.log_request_start(request.messages.len(), request.documents.len());

    let turns = assemble_turns(&state, &request).await;
    ctx.log_messages_assembled(turns[0].content.chars().count());

    let temperature = request.temperature;
    let span = ctx.create_span();
    let connect = async move {
        provider
            .chat_completion_stream(&turns, temperature)
            .await
    }
    .instrument(span);

    sse_response(Body::from_stream(relay_stream(connect, ctx)))
}
