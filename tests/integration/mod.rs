//! Integration tests for Studio Relay
//!
//! These tests drive the real router through axum-test with the upstream
//! chat completion API mocked by wiremock.

mod documents;
