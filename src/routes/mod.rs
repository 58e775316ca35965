//! HTTP routes for Studio Relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod docs;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // The frontend is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/chat", post(chat::chat))
        .route("/api/chat/stream", post(chat::chat_stream));

    if state.config.docs_enabled {
        router = router.merge(docs::create_docs_router());
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
