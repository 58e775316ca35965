//! Document context integration tests
//!
//! Documents named in a chat request are read from disk and folded into
//! the system turn sent upstream; unreadable ones are silently dropped.

use std::fs;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{RelayTestHarness, TEST_MODEL};

fn system_content(payload: &Value) -> String {
    assert_eq!(payload["messages"][0]["role"], "system");
    payload["messages"][0]["content"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_documents_injected_into_system_turn() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.md");
    let data = dir.path().join("data.json");
    fs::write(&notes, "# Launch\nShip on Friday.").unwrap();
    fs::write(&data, r#"{"owner":"ops","count":2}"#).unwrap();

    let harness = RelayTestHarness::new().await;
    harness.upstream.mock_completion("Friday.", TEST_MODEL).await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&json!({
            "messages": [{"role": "user", "content": "When do we ship?"}],
            "systemPrompt": "You are a release assistant.",
            "documents": [notes, data]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let payload = harness.upstream.last_payload().await;
    assert_eq!(
        system_content(&payload),
        concat!(
            "You are a release assistant.\n\n",
            "The following documents are provided for reference:\n\n",
            "\n--- DOCUMENT 1 ---\n# Launch\nShip on Friday.",
            "\n",
            "\n--- DOCUMENT 2 ---\n{\n  \"owner\": \"ops\",\n  \"count\": 2\n}",
            "\n\nPlease use this information to inform your responses when relevant."
        )
    );
    assert_eq!(
        payload["messages"][1],
        json!({"role": "user", "content": "When do we ship?"})
    );
}

#[tokio::test]
async fn test_bad_documents_never_fail_the_request() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("diagram.png");
    let kept = dir.path().join("kept.txt");
    fs::write(&image, b"\x89PNG").unwrap();
    fs::write(&kept, "useful").unwrap();

    let harness = RelayTestHarness::new().await;
    harness.upstream.mock_completion("ok", TEST_MODEL).await;

    let response = harness
        .server
        .post("/api/chat")
        .json(&json!({
            "messages": [{"role": "user", "content": "hi"}],
            "documents": [
                dir.path().join("missing.md"),
                image,
                kept
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let system = system_content(&harness.upstream.last_payload().await);
    assert!(system.contains("--- DOCUMENT 1 ---\nuseful"));
    assert!(!system.contains("--- DOCUMENT 2 ---"));
    assert!(!system.contains("Unsupported file type"));
}

#[tokio::test]
async fn test_context_respects_character_budget() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = (0..5)
        .map(|i| {
            let path = dir.path().join(format!("doc{}.txt", i));
            fs::write(&path, "z".repeat(400)).unwrap();
            path
        })
        .collect();

    let harness = RelayTestHarness::with_vars(&[("DOCUMENT_CONTEXT_CHARS", "1000")]).await;
    harness.upstream.mock_completion("ok", TEST_MODEL).await;

    harness
        .server
        .post("/api/chat")
        .json(&json!({
            "messages": [{"role": "user", "content": "summarize"}],
            "systemPrompt": "S",
            "documents": paths
        }))
        .await;

    let system = system_content(&harness.upstream.last_payload().await);
    let context = system
        .strip_prefix("S\n\nThe following documents are provided for reference:\n\n")
        .and_then(|rest| {
            rest.strip_suffix(
                "\n\nPlease use this information to inform your responses when relevant.",
            )
        })
        .unwrap();

    assert!(context.chars().count() <= 1000);
    assert!(context.contains("--- DOCUMENT 1 ---"));
    assert!(context.contains("--- DOCUMENT 2 ---"));
    assert!(context.contains("--- DOCUMENT 3 ---"));
    assert!(context.ends_with("... [TRUNCATED]"));
    assert!(!context.contains("--- DOCUMENT 4 ---"));
}

#[tokio::test]
async fn test_stream_endpoint_also_injects_documents() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "streamed context").unwrap();

    let harness = RelayTestHarness::new().await;
    harness.upstream.mock_stream_deltas(&["ok"]).await;

    harness
        .server
        .post("/api/chat/stream")
        .json(&json!({
            "messages": [{"role": "user", "content": "hi"}],
            "documents": [notes]
        }))
        .await;

    let system = system_content(&harness.upstream.last_payload().await);
    assert!(system.contains("--- DOCUMENT 1 ---\nstreamed context"));
}

#[tokio::test]
async fn test_document_root_rejects_outside_paths() {
    let root = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    fs::write(root.path().join("inside.txt"), "inside text").unwrap();
    let secret = outside.path().join("secret.txt");
    fs::write(&secret, "outside text").unwrap();

    let harness = RelayTestHarness::with_document_root(root.path()).await;
    harness.upstream.mock_completion("ok", TEST_MODEL).await;

    harness
        .server
        .post("/api/chat")
        .json(&json!({
            "messages": [{"role": "user", "content": "hi"}],
            "documents": ["inside.txt", secret, "../escape.txt"]
        }))
        .await;

    let system = system_content(&harness.upstream.last_payload().await);
    assert!(system.contains("inside text"));
    assert!(!system.contains("outside text"));
    assert!(!system.contains("--- DOCUMENT 2 ---"));
}
