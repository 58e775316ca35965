//! Common test utilities for Studio Relay
//!
//! Builds the real application router against a mock upstream.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use studio_relay::{routes, AppState, Config};

use crate::mocks::{MockOpenRouter, TEST_API_KEY};

/// Test model identifier
pub const TEST_MODEL: &str = "deepseek/deepseek-chat:free";

/// Build a config pointing at `upstream_url`, with extra variables layered on
pub fn test_config(upstream_url: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("OPENROUTER_API_KEY".to_string(), TEST_API_KEY.to_string()),
        ("OPENROUTER_API_URL".to_string(), upstream_url.to_string()),
        ("OPENROUTER_MODEL".to_string(), TEST_MODEL.to_string()),
        ("UPSTREAM_TIMEOUT_SECS".to_string(), "10".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config should load")
}

/// Build a test server for `config`
pub fn server_for(config: Config) -> TestServer {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    TestServer::new(routes::create_router(state)).expect("Failed to create test server")
}

/// Split an SSE body into the JSON payloads of its `data:` frames
pub fn sse_payloads(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter_map(|frame| frame.strip_prefix("data: "))
        .map(|json| serde_json::from_str(json).expect("SSE frame is not JSON"))
        .collect()
}

/// Test harness wiring the real router to a mock OpenRouter
///
/// # Example
///
/// ```ignore
/// let harness = RelayTestHarness::new().await;
/// harness.upstream.mock_completion("hi", "m").await;
/// let response = harness.server.post("/api/chat").json(&body).await;
/// ```
pub struct RelayTestHarness {
    pub server: TestServer,
    pub upstream: MockOpenRouter,
}

impl RelayTestHarness {
    /// Harness with default configuration
    pub async fn new() -> Self {
        Self::with_vars(&[]).await
    }

    /// Harness whose document paths are confined to `root`
    pub async fn with_document_root(root: &Path) -> Self {
        let root = root.to_string_lossy().into_owned();
        Self::with_vars(&[("DOCUMENT_ROOT", root.as_str())]).await
    }

    /// Harness with additional configuration variables
    pub async fn with_vars(extra: &[(&str, &str)]) -> Self {
        let upstream = MockOpenRouter::start().await;
        let server = server_for(test_config(&upstream.uri(), extra));
        Self { server, upstream }
    }
}
