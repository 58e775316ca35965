//! Mock OpenRouter API for testing
//!
//! Provides wiremock-based mocks for `POST /chat/completions` in both
//! non-streaming and SSE streaming modes, plus failure scenarios.
//!
//! # Example
//!
//! ```rust,ignore
//! let upstream = MockOpenRouter::start().await;
//! upstream.mock_completion("hi", "m").await;
//! // Use upstream.uri() as OPENROUTER_API_URL
//! ```

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// API key the test configuration authenticates with
pub const TEST_API_KEY: &str = "test-openrouter-key";

/// Mock OpenRouter server wrapper
pub struct MockOpenRouter {
    server: MockServer,
}

impl MockOpenRouter {
    /// Start a new mock OpenRouter server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Requests the mock has received so far
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Parsed JSON body of the most recent upstream request
    pub async fn last_payload(&self) -> Value {
        let requests = self.received_requests().await;
        let last = requests.last().expect("no upstream request received");
        serde_json::from_slice(&last.body).expect("upstream body is not JSON")
    }

    // =========================================================================
    // Non-streaming
    // =========================================================================

    /// Mock a successful completion with the given reply and model
    pub async fn mock_completion(&self, content: &str, model: &str) {
        self.mock_completion_body(json!({
            "id": "gen-test123",
            "model": model,
            "object": "chat.completion",
            "created": 1706745600,
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
        }))
        .await;
    }

    /// Mock a 200 response with an arbitrary JSON body
    pub async fn mock_completion_body(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(header("Content-Type", "application/json"))
            .and(body_partial_json(json!({"stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Streaming
    // =========================================================================

    /// Mock a streaming completion whose SSE body is exactly `lines`,
    /// each followed by a blank line
    pub async fn mock_stream_lines(&self, lines: &[&str]) {
        let body: String = lines.iter().map(|l| format!("{}\n\n", l)).collect();

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body, "text/event-stream")
                    .insert_header("Cache-Control", "no-cache"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a streaming completion of the given deltas, terminated by `[DONE]`
    pub async fn mock_stream_deltas(&self, deltas: &[&str]) {
        let mut lines: Vec<String> = vec![
            r#"data: {"id":"gen-1","choices":[{"index":0,"delta":{"role":"assistant"}}]}"#
                .to_string(),
        ];
        lines.extend(deltas.iter().map(|d| {
            format!(
                "data: {}",
                json!({"id": "gen-1", "choices": [{"index": 0, "delta": {"content": d}}]})
            )
        }));
        lines.push("data: [DONE]".to_string());

        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        self.mock_stream_lines(&refs).await;
    }

    // =========================================================================
    // Failures
    // =========================================================================

    /// Mock an upstream error status for any chat completion call
    pub async fn mock_error_status(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": message, "code": status}
            })))
            .mount(&self.server)
            .await;
    }
}
